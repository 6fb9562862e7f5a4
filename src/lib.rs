pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod transform;
pub mod validation;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::auth::SignatureVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: SignatureVerifier,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/webhook", post(handlers::webhook::receive))
        .layer(from_fn(middleware::request_logger::request_logger_middleware))
        .with_state(state)
}
