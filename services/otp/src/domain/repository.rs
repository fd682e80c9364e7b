#![allow(async_fn_in_trait)]

use chrono::Duration;

use crate::error::OtpServiceError;

/// Persistence for outstanding passcodes.
pub trait OtpRepository: Send + Sync {
    /// Insert a new passcode for `user_id`, valid for `ttl` from now.
    /// Existing codes for the same user are left in place.
    async fn issue(&self, user_id: &str, code: &str, ttl: Duration)
    -> Result<(), OtpServiceError>;

    /// Consume an unexpired passcode matching `(user_id, code)`.
    ///
    /// Returns `true` only for the one caller that deleted the row; concurrent
    /// callers and sweeps racing on the same row observe `false`.
    async fn verify(&self, user_id: &str, code: &str) -> Result<bool, OtpServiceError>;

    /// Delete every passcode whose expiry has passed. Returns the number removed.
    async fn purge_expired(&self) -> Result<u64, OtpServiceError>;
}
