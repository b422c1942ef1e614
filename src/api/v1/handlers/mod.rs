pub mod courses;
pub mod health;
