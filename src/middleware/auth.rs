//! access token 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を AuthService で検証し、`sub`/`role` から Actor を組む
//! - 認可 (どの course に何をしてよいか) はここではやらない。policy/service 側の責務

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// bearer 必須の範囲に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let courses = api::v1::course_routes();
/// let courses = middleware::auth::apply(courses, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    let actor = match state.auth.verify(token) {
        Ok(actor) => actor,
        Err(err) => {
            tracing::warn!(
                error = ?err,
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx { actor });

    Ok(next.run(req).await)
}
