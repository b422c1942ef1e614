/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型と extractor
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::Actor;
use crate::error::AppError;
use crate::state::AppState;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// core (service) が要求する Actor を運ぶだけの薄い型
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub actor: Actor,
}

/// middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
impl FromRequestParts<AppState> for AuthCtx {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
