/*
 * Responsibility
 * - service が上位 (transport adapter) に返す閉じた失敗の分類
 * - repo の生エラーをそのまま外へ流さない (未知の失敗も Persistence に畳む)
 */
use thiserror::Error;
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Error)]
pub enum CourseError {
    /// 入力がビジネスルールに反する (空 title、負の price など)
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    /// actor に要求された操作の権限がない
    #[error("forbidden: {reason}")]
    Forbidden { reason: &'static str },

    /// 参照した course が存在しない
    #[error("course not found: {id}")]
    NotFound { id: Uuid },

    /// 永続化層の失敗。service は retry しない (retry は repo 側 transport の責務)
    #[error("persistence failure")]
    Persistence(#[source] RepoError),
}

impl CourseError {
    pub fn validation(field: &'static str, message: &'static str) -> Self {
        Self::Validation { field, message }
    }

    pub fn forbidden(reason: &'static str) -> Self {
        Self::Forbidden { reason }
    }

    /// id 付き操作の repo エラー変換
    ///
    /// lookup と mutation の間に消えたレコード (late NotFound) もここで NotFound に寄せる
    pub fn from_repo(id: Uuid, e: RepoError) -> Self {
        match e {
            RepoError::NotFound => Self::NotFound { id },
            other => Self::Persistence(other),
        }
    }
}

/// 一覧系 (id を持たない操作) 用。NotFound は一覧系では発生しない
impl From<RepoError> for CourseError {
    fn from(e: RepoError) -> Self {
        Self::Persistence(e)
    }
}
