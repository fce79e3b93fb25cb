use axum::{
    Router,
    routing::{get, post},
};
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    healthz, readyz,
    recovery::{confirm_reset, request_reset},
    session::{login, logout},
    signup::signup,
    verification::{confirm_code, request_verification_code},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Signup & verification
        .route("/signup", post(signup))
        .route("/verify/request", post(request_verification_code))
        .route("/verify/confirm", post(confirm_code))
        // Password recovery
        .route("/reset/request", post(request_reset))
        .route("/reset/confirm", post(confirm_reset))
        // Session
        .route("/login", post(login))
        .route("/logout", get(logout))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
