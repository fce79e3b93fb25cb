use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::state::AppState;

pub mod recovery;
pub mod session;
pub mod signup;
pub mod verification;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness check, pings the database.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Requester identity for rate limiting. The reverse proxy sets X-Real-IP;
/// without it every client shares one bucket, which fails closed.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_owned()
}
