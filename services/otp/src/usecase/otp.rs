use chrono::Duration;
use rand::RngExt;
use tracing::{debug, info};

use crate::domain::repository::OtpRepository;
use crate::domain::types::{OTP_CODE_MAX, OTP_CODE_MIN};
use crate::error::OtpServiceError;

/// Random six-digit numeric code. Not meant to resist prediction.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(OTP_CODE_MIN..=OTP_CODE_MAX).to_string()
}

// ── SendOtp ───────────────────────────────────────────────────────────────────

pub struct SendOtpInput {
    pub user_id: String,
}

#[derive(Debug)]
pub struct SendOtpOutput {
    pub code: String,
}

pub struct SendOtpUseCase<R: OtpRepository> {
    pub otps: R,
    pub ttl: Duration,
}

impl<R: OtpRepository> SendOtpUseCase<R> {
    pub async fn execute(&self, input: SendOtpInput) -> Result<SendOtpOutput, OtpServiceError> {
        let code = generate_code();
        self.otps.issue(&input.user_id, &code, self.ttl).await?;
        // Delivery is stubbed: the code goes back to the caller.
        info!(user_id = %input.user_id, "otp issued");
        Ok(SendOtpOutput { code })
    }
}

// ── VerifyOtp ─────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub user_id: String,
    pub code: String,
}

pub struct VerifyOtpUseCase<R: OtpRepository> {
    pub otps: R,
}

impl<R: OtpRepository> VerifyOtpUseCase<R> {
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<(), OtpServiceError> {
        let verified = self.otps.verify(&input.user_id, &input.code).await?;
        debug!(user_id = %input.user_id, verified, "otp verification");
        if !verified {
            return Err(OtpServiceError::InvalidOtp);
        }
        Ok(())
    }
}
