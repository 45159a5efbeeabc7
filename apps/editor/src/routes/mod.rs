pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resolver::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Editor session
        .route("/api/session", get(handlers::handle_get_session))
        .route("/api/session/edit", post(handlers::handle_edit))
        .route("/api/session/compile", post(handlers::handle_compile))
        .route("/api/session/save", post(handlers::handle_save))
        .route("/api/session/new", post(handlers::handle_new))
        .route(
            "/api/session/load/:kind/:name",
            post(handlers::handle_load_managed),
        )
        .route("/api/session/load-path", post(handlers::handle_load_path))
        // Document store pass-throughs
        .route("/api/documents/:kind", get(handlers::handle_list_documents))
        .route("/api/files", get(handlers::handle_list_files))
        .route("/api/open-in-editor", post(handlers::handle_open_in_editor))
        // Toolchain
        .route("/api/engines", get(handlers::handle_engines))
        .with_state(state)
}
