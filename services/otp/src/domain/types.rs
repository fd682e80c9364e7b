use chrono::{DateTime, Utc};

/// One outstanding passcode bound to a user.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    /// Storage-assigned id, only used to target the row on consume.
    pub id: i64,
    pub user_id: String,
    pub code: String,
    /// Verifiable only while strictly in the future.
    pub expires_at: DateTime<Utc>,
}

/// Default passcode time-to-live in seconds (5 minutes).
pub const OTP_TTL_SECS: i64 = 300;

/// Default period between expired-passcode sweeps, in seconds.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// Inclusive range of generated six-digit codes.
pub const OTP_CODE_MIN: u32 = 100_000;
pub const OTP_CODE_MAX: u32 = 999_999;

/// Upper bound accepted for a configured passcode lifetime (one day).
pub const MAX_OTP_TTL_SECS: i64 = 86_400;
