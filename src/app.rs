/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → 依存生成 (pool/repo/service) → Router 組み立て
 * - Middleware の適用 (CORS / request-id / bearer など)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::PgCourseRepo,
    services::{auth::AuthService, courses::CourseService},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,course_catalog_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");

        // In development, fail fast. In production, keep the server running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .context("bind listener")?;
    axum::serve(listener, app).await.context("serve")?;

    Ok(())
}

/// 依存の組み立て (dependency injection)
///
/// pool はここで 1 度だけ作って repo に渡す。ambient/global な接続状態は持たない
async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    let repo = Arc::new(PgCourseRepo::new(pool));
    let courses = CourseService::new(repo);

    let auth = Arc::new(
        AuthService::new(
            &config.access_jwt_public_key_pem,
            &config.auth_issuer,
            &config.auth_audience,
            config.access_token_leeway_seconds,
        )
        .map_err(|e| anyhow::anyhow!(e))
        .context("build auth service")?,
    );

    Ok(AppState::new(courses, auth))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
