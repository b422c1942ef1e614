/*
 * Responsibility
 * - core が扱うドメイン型 (Actor / Course) の公開ポイント
 * - transport/persistence の型はここに置かない
 */
pub mod actor;
pub mod course;

pub use actor::{Actor, Role};
pub use course::{Course, CourseDraft, CoursePatch, InstructorProfile};
