use crate::handlers;
use crate::state::AppState;
use axum::{
    body::Body,
    http::Request,
    routing::{get, patch, post},
    Router,
};
use shared::Config;
use std::path::PathBuf;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use uuid::Uuid;

/// 静的アセットの配信設定
#[derive(Debug, Clone)]
pub struct StaticAssets {
    pub root: PathBuf,
    pub index_file: String,
}

impl StaticAssets {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.static_root.clone(),
            index_file: config.index_file.clone(),
        }
    }
}

/// APIエンドポイントのみのルーター
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(handlers::list_todos))
        .route("/create", post(handlers::create_todo))
        .route(
            "/todo",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
        .with_state(state)
}

/// API + 静的アセット + CORS + リクエストトレース
pub fn app_router(state: AppState, assets: &StaticAssets) -> Router {
    let index = ServeFile::new(assets.root.join(&assets.index_file));
    let files = ServeDir::new(&assets.root).append_index_html_on_directories(false);

    api_router(state)
        .route_service("/", index)
        .fallback_service(files)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}
