use std::time::Duration;

use crate::domain::types::{MAX_OTP_TTL_SECS, OTP_TTL_SECS, SWEEP_INTERVAL_SECS};

/// OTP service configuration loaded from environment variables.
#[derive(Debug)]
pub struct OtpConfig {
    /// Database URL (default `sqlite::memory:`). Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port to listen on (default 3001). Env var: `PORT`.
    pub port: u16,
    /// Passcode lifetime in seconds, `0..=86400` (default 300). Env var: `OTP_TTL_SECS`.
    pub otp_ttl_secs: i64,
    /// Seconds between expiry sweeps, non-zero (default 60). Env var: `OTP_SWEEP_INTERVAL_SECS`.
    pub sweep_interval_secs: u64,
}

impl OtpConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite::memory:".to_owned()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            otp_ttl_secs: parse_ttl_secs(std::env::var("OTP_TTL_SECS").ok().as_deref()),
            sweep_interval_secs: parse_sweep_interval_secs(
                std::env::var("OTP_SWEEP_INTERVAL_SECS").ok().as_deref(),
            ),
        }
    }

    pub fn otp_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.otp_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Unparseable or out-of-range values fall back to the default.
fn parse_ttl_secs(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse().ok())
        .filter(|secs| (0..=MAX_OTP_TTL_SECS).contains(secs))
        .unwrap_or(OTP_TTL_SECS)
}

fn parse_sweep_interval_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(SWEEP_INTERVAL_SECS)
}
