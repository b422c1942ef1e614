/*
 * Responsibility
 * - Course entity と作成/更新の入力型
 * - instructor の公開プロフィール投影 (username/email のみ。credential 系は型として持たない)
 */
use uuid::Uuid;

/// instructor の公開プロフィール (read 系でのみ populate される)
///
/// - 一覧系: username + email
/// - find_by_id: email のみ (ソース仕様の狭い投影をそのまま維持)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorProfile {
    pub username: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,

    /// 作成時に actor.id から一度だけ設定。update で再割当てされることはない
    pub instructor_id: Uuid,

    /// 登録順を保持した学生 ID 列。同一学生の重複は invariant として禁止
    pub student_ids: Vec<Uuid>,

    /// mutation 系の戻り値では None (profile は read 系の関心事)
    pub instructor: Option<InstructorProfile>,
}

/// create 入力。instructor_id は draft には含めない (service が actor.id を使う)
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
}

/// update 入力。None のフィールドは据え置き
///
/// instructor の再割当てはこの型で表現できない (request body に居ても DTO 層で落ちる)
#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}
