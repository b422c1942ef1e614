/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - courses: CourseService (repo は起動時に注入済み)
 *   - auth: AuthService (access token 検証)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::AuthService, courses::CourseService};

#[derive(Clone)]
pub struct AppState {
    pub courses: CourseService,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(courses: CourseService, auth: Arc<AuthService>) -> Self {
        Self { courses, auth }
    }
}
