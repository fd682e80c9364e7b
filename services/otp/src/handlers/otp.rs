use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};

use crate::error::OtpServiceError;
use crate::state::AppState;
use crate::usecase::otp::{SendOtpInput, SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

/// Non-empty string field, or `None` when absent or blank.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// Treat an unparseable body like an empty one so clients always get the
/// field-level validation message.
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            T::default()
        }
    }
}

// ── POST /otp/send ────────────────────────────────────────────────────────────

#[derive(Default, Deserialize)]
pub struct SendOtpRequest {
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct SendOtpResponse {
    pub message: &'static str,
    pub otp: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    body: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<SendOtpResponse>, OtpServiceError> {
    let body = body_or_default(body);
    let user_id = required(body.user_id).ok_or(OtpServiceError::MissingUserId)?;

    let usecase = SendOtpUseCase {
        otps: state.otp_store(),
        ttl: state.otp_ttl,
    };
    let output = usecase.execute(SendOtpInput { user_id }).await?;

    Ok(Json(SendOtpResponse {
        message: "OTP created",
        otp: output.code,
    }))
}

// ── POST /otp/verify ──────────────────────────────────────────────────────────

#[derive(Default, Deserialize)]
pub struct VerifyOtpRequest {
    pub user_id: Option<String>,
    pub code: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub message: &'static str,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    body: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<VerifyOtpResponse>, OtpServiceError> {
    let body = body_or_default(body);
    let (Some(user_id), Some(code)) = (required(body.user_id), required(body.code)) else {
        return Err(OtpServiceError::MissingUserIdOrCode);
    };

    let usecase = VerifyOtpUseCase {
        otps: state.otp_store(),
    };
    usecase.execute(VerifyOtpInput { user_id, code }).await?;

    Ok(Json(VerifyOtpResponse {
        message: "OTP verified successfully",
    }))
}
