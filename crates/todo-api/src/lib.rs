//! HTTP API（axum）
//!
//! `/todos` の CRUD と `/health` を提供します。永続化は `TodoRepository` に委譲し、
//! どのルートにも一致しないリクエストは `{"error": "Route not found"}` の 404 を返します。

use std::sync::Arc;

use axum::{routing::get, Router};
use infrastructure::{InMemoryRepository, TodoRepository};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod error;
pub mod handlers;
pub mod models;

pub use error::ApiError;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryRepository::default()))
    }
}

/// InMemory ストアでルータを構築して返します。
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// 外部から状態を注入できる版
pub fn app_with_state(state: AppState) -> Router {
    use handlers::*;

    Router::new()
        .route("/health", get(health).fallback(route_not_found))
        .route(
            "/todos",
            get(list_todos).post(create_todo).fallback(route_not_found),
        )
        .route(
            "/todos/:id",
            get(get_todo)
                .put(update_todo)
                .delete(delete_todo)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
