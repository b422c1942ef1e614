/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health だけ認証なし。/courses 系はルーター単位で bearer を掛ける
 *   (ソース API と同じく read 系も認証下に置くが、read handler は Actor を使わない)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    courses::{
        create_course, delete_course, enroll, find_by_name, get_course, list_by_instructor,
        list_by_student, list_courses, update_course,
    },
    health::health,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let courses = Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/instructor/{instructor_id}", get(list_by_instructor))
        .route("/courses/findByName/{name}", get(find_by_name))
        .route("/courses/student/{student_id}", get(list_by_student))
        .route("/courses/enroll/{course_id}", post(enroll))
        .route(
            "/courses/{course_id}",
            get(get_course).patch(update_course).delete(delete_course),
        );

    Router::new()
        .route("/health", get(health))
        .merge(middleware::auth::apply(courses, state))
}
