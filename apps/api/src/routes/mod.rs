pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::claims::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/claims/:id",
            get(handlers::handle_get_claim).put(handlers::handle_put_claim),
        )
        .route(
            "/api/claims/:id/summarize",
            post(handlers::handle_summarize_claim),
        )
        .route("/api/claims/:id/notes", put(handlers::handle_put_notes))
        .with_state(state)
}
