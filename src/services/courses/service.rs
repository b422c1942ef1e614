/*
 * Responsibility
 * - course ユースケースの編成: validate → (存在確認) → policy → repo
 * - update/delete は「存在確認が認可より先」。存在しない course への操作は
 *   actor が誰であっても Forbidden ではなく NotFound になる (固定の契約)
 * - request 間で状態を持たない。course を呼び出しをまたいで保持/キャッシュしない
 */
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Course, CourseDraft, CoursePatch};
use crate::repos::CourseRepo;
use crate::services::courses::error::CourseError;
use crate::services::courses::policy;

#[derive(Clone)]
pub struct CourseService {
    repo: Arc<dyn CourseRepo>,
}

impl CourseService {
    pub fn new(repo: Arc<dyn CourseRepo>) -> Self {
        Self { repo }
    }

    /// 全 course を instructor プロフィール付きで返す。認可チェックなし
    pub async fn list_courses(&self) -> Result<Vec<Course>, CourseError> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn list_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> Result<Vec<Course>, CourseError> {
        Ok(self.repo.list_by_instructor(instructor_id).await?)
    }

    pub async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Course>, CourseError> {
        Ok(self.repo.list_by_student(student_id).await?)
    }

    /// title 完全一致検索 (部分一致は non-goal)
    pub async fn find_by_title(&self, title: &str) -> Result<Vec<Course>, CourseError> {
        Ok(self.repo.list_by_title(title).await?)
    }

    pub async fn find_by_id(&self, course_id: Uuid) -> Result<Option<Course>, CourseError> {
        Ok(self.repo.find_by_id(course_id).await?)
    }

    pub async fn create_course(
        &self,
        actor: &Actor,
        draft: CourseDraft,
    ) -> Result<Course, CourseError> {
        validate_draft(&draft)?;

        if !policy::can_create(actor) {
            return Err(CourseError::forbidden(
                "only an instructor can post a new course",
            ));
        }

        Ok(self.repo.create(actor.id, &draft).await?)
    }

    pub async fn update_course(
        &self,
        actor: &Actor,
        course_id: Uuid,
        patch: CoursePatch,
    ) -> Result<Course, CourseError> {
        validate_patch(&patch)?;

        let course = self
            .repo
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::NotFound { id: course_id })?;

        if !policy::can_mutate(actor, &course) {
            return Err(CourseError::forbidden(
                "only the instructor of this course or an admin can edit it",
            ));
        }

        self.repo
            .update(course_id, &patch)
            .await
            .map_err(|e| CourseError::from_repo(course_id, e))
    }

    pub async fn delete_course(&self, actor: &Actor, course_id: Uuid) -> Result<(), CourseError> {
        let course = self
            .repo
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::NotFound { id: course_id })?;

        if !policy::can_mutate(actor, &course) {
            return Err(CourseError::forbidden(
                "only the instructor of this course or an admin can delete it",
            ));
        }

        self.repo
            .delete(course_id)
            .await
            .map_err(|e| CourseError::from_repo(course_id, e))
    }

    /// student_id を course に登録する。既登録なら何も変えず成功 (冪等)
    ///
    /// student_id は request payload 由来で actor.id と一致するとは限らない。
    /// 第三者 enroll はソース互換でそのまま通すが、監査のため WARN を残す
    pub async fn enroll(
        &self,
        actor: &Actor,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<Course, CourseError> {
        let course = self
            .repo
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::NotFound { id: course_id })?;

        if !policy::can_enroll(actor, &course) {
            return Err(CourseError::forbidden("enrollment not allowed"));
        }

        if student_id != actor.id {
            tracing::warn!(
                actor_id = %actor.id,
                student_id = %student_id,
                course_id = %course_id,
                "enrolling a student id different from the caller"
            );
        }

        // lookup と update の間に course が消えた場合は late NotFound として表に出す
        self.repo
            .append_student(course_id, student_id)
            .await
            .map_err(|e| CourseError::from_repo(course_id, e))
    }
}

fn validate_draft(draft: &CourseDraft) -> Result<(), CourseError> {
    validate_title(&draft.title)?;
    validate_price(draft.price)?;
    Ok(())
}

fn validate_patch(patch: &CoursePatch) -> Result<(), CourseError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), CourseError> {
    if title.trim().is_empty() {
        return Err(CourseError::validation("title", "title is required"));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), CourseError> {
    // NaN も弾く (NaN < 0.0 は false なので明示的に)
    if !price.is_finite() {
        return Err(CourseError::validation("price", "price must be a finite number"));
    }
    if price < 0.0 {
        return Err(CourseError::validation("price", "price must be >= 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::repos::RepoError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// trait 契約どおりに振る舞う in-memory repo
    ///
    /// - mutation 系の戻り値は Pg 実装と同じく instructor プロフィールなし
    /// - append_student は既登録なら no-op
    struct MemCourseRepo {
        courses: Mutex<Vec<Course>>,
    }

    impl MemCourseRepo {
        fn new() -> Self {
            Self {
                courses: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CourseRepo for MemCourseRepo {
        async fn list_all(&self) -> Result<Vec<Course>, RepoError> {
            Ok(self.courses.lock().unwrap().clone())
        }

        async fn list_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Course>, RepoError> {
            Ok(self
                .courses
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.instructor_id == instructor_id)
                .cloned()
                .collect())
        }

        async fn list_by_title(&self, title: &str) -> Result<Vec<Course>, RepoError> {
            Ok(self
                .courses
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.title == title)
                .cloned()
                .collect())
        }

        async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Course>, RepoError> {
            Ok(self
                .courses
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.student_ids.contains(&student_id))
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, course_id: Uuid) -> Result<Option<Course>, RepoError> {
            Ok(self
                .courses
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == course_id)
                .cloned())
        }

        async fn create(
            &self,
            instructor_id: Uuid,
            draft: &CourseDraft,
        ) -> Result<Course, RepoError> {
            let course = Course {
                id: Uuid::new_v4(),
                title: draft.title.clone(),
                description: draft.description.clone(),
                price: draft.price,
                instructor_id,
                student_ids: Vec::new(),
                instructor: None,
            };
            self.courses.lock().unwrap().push(course.clone());
            Ok(course)
        }

        async fn update(&self, course_id: Uuid, patch: &CoursePatch) -> Result<Course, RepoError> {
            let mut courses = self.courses.lock().unwrap();
            let course = courses
                .iter_mut()
                .find(|c| c.id == course_id)
                .ok_or(RepoError::NotFound)?;
            if let Some(title) = &patch.title {
                course.title = title.clone();
            }
            if let Some(description) = &patch.description {
                course.description = description.clone();
            }
            if let Some(price) = patch.price {
                course.price = price;
            }
            Ok(course.clone())
        }

        async fn delete(&self, course_id: Uuid) -> Result<(), RepoError> {
            let mut courses = self.courses.lock().unwrap();
            let before = courses.len();
            courses.retain(|c| c.id != course_id);
            if courses.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }

        async fn append_student(
            &self,
            course_id: Uuid,
            student_id: Uuid,
        ) -> Result<Course, RepoError> {
            let mut courses = self.courses.lock().unwrap();
            let course = courses
                .iter_mut()
                .find(|c| c.id == course_id)
                .ok_or(RepoError::NotFound)?;
            if !course.student_ids.contains(&student_id) {
                course.student_ids.push(student_id);
            }
            Ok(course.clone())
        }
    }

    fn service() -> CourseService {
        CourseService::new(Arc::new(MemCourseRepo::new()))
    }

    fn instructor() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Instructor)
    }

    fn student() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Student)
    }

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Admin)
    }

    fn draft(title: &str, price: f64) -> CourseDraft {
        CourseDraft {
            title: title.to_string(),
            description: String::new(),
            price,
        }
    }

    #[tokio::test]
    async fn instructor_creates_course_owned_by_self() {
        let svc = service();
        let i = instructor();

        let course = svc
            .create_course(&i, draft("Algorithms", 0.0))
            .await
            .unwrap();

        assert_eq!(course.instructor_id, i.id);
        assert!(course.student_ids.is_empty());
        assert_eq!(course.title, "Algorithms");
    }

    #[tokio::test]
    async fn student_cannot_create_course() {
        let svc = service();

        let err = svc
            .create_course(&student(), draft("X", 10.0))
            .await
            .unwrap_err();

        assert!(matches!(err, CourseError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn admin_can_create_course() {
        let svc = service();
        let a = admin();

        let course = svc.create_course(&a, draft("Ops", 5.0)).await.unwrap();
        assert_eq!(course.instructor_id, a.id);
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let svc = service();

        let err = svc
            .create_course(&instructor(), draft("   ", 1.0))
            .await
            .unwrap_err();

        assert!(matches!(err, CourseError::Validation { field: "title", .. }));
    }

    #[tokio::test]
    async fn create_rejects_negative_price() {
        let svc = service();

        let err = svc
            .create_course(&instructor(), draft("X", -1.0))
            .await
            .unwrap_err();

        assert!(matches!(err, CourseError::Validation { field: "price", .. }));
    }

    #[tokio::test]
    async fn non_owner_cannot_update() {
        let svc = service();
        let owner = instructor();
        let course = svc.create_course(&owner, draft("X", 10.0)).await.unwrap();

        let other = instructor();
        let patch = CoursePatch {
            price: Some(5.0),
            ..Default::default()
        };
        let err = svc
            .update_course(&other, course.id, patch)
            .await
            .unwrap_err();

        assert!(matches!(err, CourseError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn owner_and_admin_can_update() {
        let svc = service();
        let owner = instructor();
        let course = svc.create_course(&owner, draft("X", 10.0)).await.unwrap();

        let patch = CoursePatch {
            price: Some(5.0),
            ..Default::default()
        };
        let updated = svc
            .update_course(&owner, course.id, patch)
            .await
            .unwrap();
        assert_eq!(updated.price, 5.0);

        let patch = CoursePatch {
            title: Some("Y".to_string()),
            ..Default::default()
        };
        let updated = svc
            .update_course(&admin(), course.id, patch)
            .await
            .unwrap();
        assert_eq!(updated.title, "Y");
        // 所有権は update では変わらない
        assert_eq!(updated.instructor_id, owner.id);
    }

    #[tokio::test]
    async fn update_missing_course_is_not_found_for_every_actor() {
        let svc = service();
        let missing = Uuid::new_v4();
        let patch = CoursePatch {
            price: Some(5.0),
            ..Default::default()
        };

        for actor in [student(), instructor(), admin()] {
            let err = svc
                .update_course(&actor, missing, patch.clone())
                .await
                .unwrap_err();
            // NotFound が Forbidden より優先される
            assert!(matches!(err, CourseError::NotFound { id } if id == missing));
        }
    }

    #[tokio::test]
    async fn delete_missing_course_is_not_found_for_every_actor() {
        let svc = service();
        let missing = Uuid::new_v4();

        for actor in [student(), instructor(), admin()] {
            let err = svc.delete_course(&actor, missing).await.unwrap_err();
            assert!(matches!(err, CourseError::NotFound { id } if id == missing));
        }
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let svc = service();
        let owner = instructor();
        let course = svc.create_course(&owner, draft("X", 10.0)).await.unwrap();

        let err = svc
            .delete_course(&instructor(), course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CourseError::Forbidden { .. }));

        // course はまだ居る
        assert!(svc.find_by_id(course.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn owner_deletes_course() {
        let svc = service();
        let owner = instructor();
        let course = svc.create_course(&owner, draft("X", 10.0)).await.unwrap();

        svc.delete_course(&owner, course.id).await.unwrap();
        assert!(svc.find_by_id(course.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_id_is_idempotent() {
        let svc = service();
        let course = svc
            .create_course(&instructor(), draft("X", 10.0))
            .await
            .unwrap();

        let a = svc.find_by_id(course.id).await.unwrap();
        let b = svc.find_by_id(course.id).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn enroll_twice_keeps_a_single_entry() {
        let svc = service();
        let s = student();
        let course = svc
            .create_course(&instructor(), draft("X", 10.0))
            .await
            .unwrap();

        svc.enroll(&s, course.id, s.id).await.unwrap();
        svc.enroll(&s, course.id, s.id).await.unwrap();

        let found = svc.find_by_id(course.id).await.unwrap().unwrap();
        assert_eq!(
            found.student_ids.iter().filter(|id| **id == s.id).count(),
            1
        );
    }

    #[tokio::test]
    async fn enrolled_course_appears_in_list_by_student() {
        let svc = service();
        let s = student();
        let course = svc
            .create_course(&instructor(), draft("X", 10.0))
            .await
            .unwrap();

        svc.enroll(&s, course.id, s.id).await.unwrap();

        let courses = svc.list_by_student(s.id).await.unwrap();
        assert!(courses.iter().any(|c| c.id == course.id));
    }

    #[tokio::test]
    async fn enroll_accepts_a_third_party_student_id() {
        let svc = service();
        let caller = student();
        let someone_else = Uuid::new_v4();
        let course = svc
            .create_course(&instructor(), draft("X", 10.0))
            .await
            .unwrap();

        let enrolled = svc.enroll(&caller, course.id, someone_else).await.unwrap();
        assert!(enrolled.student_ids.contains(&someone_else));
    }

    #[tokio::test]
    async fn enroll_missing_course_is_not_found() {
        let svc = service();
        let missing = Uuid::new_v4();
        let s = student();

        let err = svc.enroll(&s, missing, s.id).await.unwrap_err();
        assert!(matches!(err, CourseError::NotFound { id } if id == missing));
    }

    #[tokio::test]
    async fn enrollment_preserves_append_order() {
        let svc = service();
        let course = svc
            .create_course(&instructor(), draft("X", 10.0))
            .await
            .unwrap();

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        svc.enroll(&admin(), course.id, first).await.unwrap();
        svc.enroll(&admin(), course.id, second).await.unwrap();

        let found = svc.find_by_id(course.id).await.unwrap().unwrap();
        assert_eq!(found.student_ids, vec![first, second]);
    }

    #[tokio::test]
    async fn list_by_instructor_filters_by_owner() {
        let svc = service();
        let a = instructor();
        let b = instructor();
        svc.create_course(&a, draft("A1", 1.0)).await.unwrap();
        svc.create_course(&a, draft("A2", 2.0)).await.unwrap();
        svc.create_course(&b, draft("B1", 3.0)).await.unwrap();

        let courses = svc.list_by_instructor(a.id).await.unwrap();
        assert_eq!(courses.len(), 2);
        assert!(courses.iter().all(|c| c.instructor_id == a.id));
    }

    #[tokio::test]
    async fn find_by_title_is_exact_match() {
        let svc = service();
        svc.create_course(&instructor(), draft("Rust", 1.0))
            .await
            .unwrap();
        svc.create_course(&instructor(), draft("Rust 101", 1.0))
            .await
            .unwrap();

        let courses = svc.find_by_title("Rust").await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Rust");
    }

    #[tokio::test]
    async fn update_rejects_invalid_patch_before_lookup() {
        let svc = service();
        let patch = CoursePatch {
            title: Some("  ".to_string()),
            ..Default::default()
        };

        // validate が先なので、存在しない id でも ValidationError になる
        let err = svc
            .update_course(&admin(), Uuid::new_v4(), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, CourseError::Validation { field: "title", .. }));
    }

    #[tokio::test]
    async fn list_courses_returns_empty_on_no_data() {
        let svc = service();
        assert!(svc.list_courses().await.unwrap().is_empty());
    }
}
