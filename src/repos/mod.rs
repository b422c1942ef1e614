/*
 * Responsibility
 * - 永続化層の公開ポイント
 * - service は CourseRepo trait だけを見る (Pg 実装は app の配線でのみ触る)
 */
pub mod course_repo;
pub mod error;

pub use course_repo::{CourseRepo, PgCourseRepo};
pub use error::RepoError;
