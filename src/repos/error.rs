/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - update/delete/append_student は対象レコード不在を NotFound として区別する
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),

    #[error("record not found")]
    NotFound,
}
