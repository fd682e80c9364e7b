use chrono::Duration;

use crate::store::OtpStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: OtpStore,
    /// Lifetime of newly issued passcodes.
    pub otp_ttl: Duration,
}

impl AppState {
    pub fn otp_store(&self) -> OtpStore {
        self.store.clone()
    }
}
