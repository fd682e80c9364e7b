use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// OTP service error variants. The `Display` text of the client-facing
/// variants is the literal `error` message returned over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum OtpServiceError {
    #[error("user_id is required")]
    MissingUserId,
    #[error("user_id and code are required")]
    MissingUserIdOrCode,
    #[error("Invalid or expired OTP")]
    InvalidOtp,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for OtpServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingUserId | Self::MissingUserIdOrCode | Self::InvalidOtp => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s are logged here; TraceLayer already records every response status.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, "internal error");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
