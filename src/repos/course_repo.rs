/*
 * Responsibility
 * - courses テーブル向けの CourseRepo trait と SQLx (Postgres) 実装
 * - 一覧系は instructor の公開プロフィール (userName/email) を JOIN で populate する
 * - append_student は 1 文の UPDATE で原子的に行う (service 側で read-modify-write しない)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::{Course, CourseDraft, CoursePatch, InstructorProfile};
use crate::repos::error::RepoError;

/// service が依存する永続化の契約
///
/// - `update` / `delete` / `append_student` は対象不在を `RepoError::NotFound` で返す
/// - `find_by_id` は不在をエラーではなく `None` で返す
/// - 1 レコードに対する各操作は原子的であること (同時 enroll が落ちないこと) は実装側の責務
#[async_trait]
pub trait CourseRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Course>, RepoError>;
    async fn list_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Course>, RepoError>;
    async fn list_by_title(&self, title: &str) -> Result<Vec<Course>, RepoError>;
    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Course>, RepoError>;
    async fn find_by_id(&self, course_id: Uuid) -> Result<Option<Course>, RepoError>;
    async fn create(&self, instructor_id: Uuid, draft: &CourseDraft) -> Result<Course, RepoError>;
    async fn update(&self, course_id: Uuid, patch: &CoursePatch) -> Result<Course, RepoError>;
    async fn delete(&self, course_id: Uuid) -> Result<(), RepoError>;
    async fn append_student(&self, course_id: Uuid, student_id: Uuid)
    -> Result<Course, RepoError>;
}

/// JOIN 付き read 用の row
#[derive(Debug, FromRow)]
struct CourseWithInstructorRow {
    #[sqlx(rename = "courseId")]
    course_id: Uuid,
    title: String,
    description: String,
    price: f64,
    #[sqlx(rename = "instructorId")]
    instructor_id: Uuid,
    #[sqlx(rename = "studentIds")]
    student_ids: Vec<Uuid>,
    #[sqlx(rename = "instructorName")]
    instructor_name: Option<String>,
    #[sqlx(rename = "instructorEmail")]
    instructor_email: String,
}

impl From<CourseWithInstructorRow> for Course {
    fn from(row: CourseWithInstructorRow) -> Self {
        Course {
            id: row.course_id,
            title: row.title,
            description: row.description,
            price: row.price,
            instructor_id: row.instructor_id,
            student_ids: row.student_ids,
            instructor: Some(InstructorProfile {
                username: row.instructor_name,
                email: row.instructor_email,
            }),
        }
    }
}

/// mutation 用の row (profile なし)
#[derive(Debug, FromRow)]
struct CourseRow {
    #[sqlx(rename = "courseId")]
    course_id: Uuid,
    title: String,
    description: String,
    price: f64,
    #[sqlx(rename = "instructorId")]
    instructor_id: Uuid,
    #[sqlx(rename = "studentIds")]
    student_ids: Vec<Uuid>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.course_id,
            title: row.title,
            description: row.description,
            price: row.price,
            instructor_id: row.instructor_id,
            student_ids: row.student_ids,
            instructor: None,
        }
    }
}

#[derive(Clone)]
pub struct PgCourseRepo {
    db: PgPool,
}

impl PgCourseRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        predicate: &str,
        bind: Option<Bind<'_>>,
    ) -> Result<Vec<Course>, RepoError> {
        // 一覧系 4 本は投影/JOIN が同一で WHERE 句だけ違う
        let sql = format!(
            r#"
            SELECT
                c."courseId", c.title, c.description, c.price,
                c."instructorId", c."studentIds",
                u."userName" AS "instructorName",
                u.email      AS "instructorEmail"
            FROM courses c
            JOIN users u ON u."userId" = c."instructorId"
            {predicate}
            "#
        );

        let query = sqlx::query_as::<_, CourseWithInstructorRow>(&sql);
        let query = match bind {
            Some(Bind::Uuid(v)) => query.bind(v),
            Some(Bind::Text(v)) => query.bind(v),
            None => query,
        };

        let rows = query.fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }
}

enum Bind<'a> {
    Uuid(Uuid),
    Text(&'a str),
}

#[async_trait]
impl CourseRepo for PgCourseRepo {
    async fn list_all(&self) -> Result<Vec<Course>, RepoError> {
        self.list_where("", None).await
    }

    async fn list_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Course>, RepoError> {
        self.list_where(r#"WHERE c."instructorId" = $1"#, Some(Bind::Uuid(instructor_id)))
            .await
    }

    async fn list_by_title(&self, title: &str) -> Result<Vec<Course>, RepoError> {
        // 完全一致のみ (部分一致/fuzzy は non-goal)
        self.list_where("WHERE c.title = $1", Some(Bind::Text(title)))
            .await
    }

    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Course>, RepoError> {
        self.list_where(
            r#"WHERE c."studentIds" @> ARRAY[$1]::uuid[]"#,
            Some(Bind::Uuid(student_id)),
        )
        .await
    }

    async fn find_by_id(&self, course_id: Uuid) -> Result<Option<Course>, RepoError> {
        // find_by_id は email だけ populate する (一覧系より狭い投影を意図的に維持)
        let row = sqlx::query_as::<_, CourseWithInstructorRow>(
            r#"
            SELECT
                c."courseId", c.title, c.description, c.price,
                c."instructorId", c."studentIds",
                NULL::text AS "instructorName",
                u.email    AS "instructorEmail"
            FROM courses c
            JOIN users u ON u."userId" = c."instructorId"
            WHERE c."courseId" = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Course::from))
    }

    async fn create(&self, instructor_id: Uuid, draft: &CourseDraft) -> Result<Course, RepoError> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            INSERT INTO courses (title, description, price, "instructorId")
            VALUES ($1, $2, $3, $4)
            RETURNING
                "courseId", title, description, price, "instructorId", "studentIds"
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(instructor_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, course_id: Uuid, patch: &CoursePatch) -> Result<Course, RepoError> {
        // "instructorId" は SET に決して含めない (所有権は作成時に固定)
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            UPDATE courses
            SET
                title       = COALESCE($2, title),
                description = COALESCE($3, description),
                price       = COALESCE($4, price)
            WHERE "courseId" = $1
            RETURNING
                "courseId", title, description, price, "instructorId", "studentIds"
            "#,
        )
        .bind(course_id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, course_id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM courses
            WHERE "courseId" = $1
            "#,
        )
        .bind(course_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn append_student(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<Course, RepoError> {
        // 1 文で「未登録なら append」。同時 enroll 同士が上書きで消え合わない
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            UPDATE courses
            SET "studentIds" = CASE
                WHEN "studentIds" @> ARRAY[$2]::uuid[] THEN "studentIds"
                ELSE array_append("studentIds", $2)
            END
            WHERE "courseId" = $1
            RETURNING
                "courseId", title, description, price, "instructorId", "studentIds"
            "#,
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }
}
