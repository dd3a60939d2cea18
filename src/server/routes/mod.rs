use crate::server::router::HirelinkState;
use axum::{Router, routing::get};

pub mod handlers;

pub fn router() -> Router<HirelinkState> {
    Router::new()
        .route("/workers", get(handlers::workers_handler))
        .route("/resumes", get(handlers::resumes_handler))
        .route("/healthz", get(handlers::healthz_handler))
}
