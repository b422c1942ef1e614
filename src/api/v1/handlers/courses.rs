/*
 * Responsibility
 * - /courses 系 handler。DTO ⇔ domain の変換と status code の選択だけを行う
 * - 判断 (validation / 認可 / 存在確認の順序) はすべて CourseService 側
 * - mutation 系は AuthCtx (= 認証済み Actor) を受け取り service に渡す
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::courses::{
            CourseResponse, CreateCourseRequest, EnrollRequest, UpdateCourseRequest,
        },
        extractors::AuthCtx,
    },
    domain::Course,
    error::AppError,
    state::AppState,
};

fn to_responses(courses: Vec<Course>) -> Vec<CourseResponse> {
    courses.into_iter().map(CourseResponse::from).collect()
}

pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = state.courses.list_courses().await?;
    Ok(Json(to_responses(courses)))
}

pub async fn list_by_instructor(
    State(state): State<AppState>,
    Path(instructor_id): Path<Uuid>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = state.courses.list_by_instructor(instructor_id).await?;
    Ok(Json(to_responses(courses)))
}

pub async fn find_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = state.courses.find_by_title(&name).await?;
    Ok(Json(to_responses(courses)))
}

pub async fn list_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = state.courses.list_by_student(student_id).await?;
    Ok(Json(to_responses(courses)))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = state
        .courses
        .find_by_id(course_id)
        .await?
        .ok_or(AppError::not_found("course"))?;

    Ok(Json(course.into()))
}

pub async fn create_course(
    State(state): State<AppState>,
    ctx: AuthCtx,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    let course = state.courses.create_course(&ctx.actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

pub async fn update_course(
    State(state): State<AppState>,
    ctx: AuthCtx,
    Path(course_id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = state
        .courses
        .update_course(&ctx.actor, course_id, req.into())
        .await?;

    Ok(Json(course.into()))
}

pub async fn delete_course(
    State(state): State<AppState>,
    ctx: AuthCtx,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.courses.delete_course(&ctx.actor, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enroll(
    State(state): State<AppState>,
    ctx: AuthCtx,
    Path(course_id): Path<Uuid>,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = state
        .courses
        .enroll(&ctx.actor, course_id, req.user_id)
        .await?;

    Ok(Json(course.into()))
}
