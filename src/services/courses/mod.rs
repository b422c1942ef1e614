/*
 * Responsibility
 * - course ユースケースの公開ポイント (service / policy / error)
 */
pub mod error;
pub mod policy;
mod service;

pub use error::CourseError;
pub use service::CourseService;
