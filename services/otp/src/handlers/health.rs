use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// `GET /healthz`: the process is up and serving.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: the passcode store answers queries.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.otp_store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = ?e, "otp store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
