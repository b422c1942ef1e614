/*
 * Responsibility
 * - アプリ共通の ApiError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - CourseError (core の失敗分類) → HTTP への変換。kind ごとに区別可能な応答にする
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::courses::CourseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {message}")]
    Forbidden { message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::Forbidden { message } => (StatusCode::FORBIDDEN, "FORBIDDEN", message),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CourseError> for AppError {
    fn from(e: CourseError) -> Self {
        match e {
            CourseError::Validation { field, message } => {
                AppError::bad_request("VALIDATION", format!("{field}: {message}"))
            }
            CourseError::Forbidden { reason } => AppError::Forbidden {
                message: reason.to_string(),
            },
            CourseError::NotFound { .. } => AppError::not_found("course"),
            CourseError::Persistence(cause) => {
                // 生の repo エラーは応答に出さない。ログにだけ残して 500 に畳む
                tracing::error!(error = ?cause, "course persistence failure");
                AppError::Internal
            }
        }
    }
}
