use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::repository::OtpRepository;
use crate::error::OtpServiceError;
use crate::infra::db::{DbOtpRepository, ensure_schema};
use crate::infra::sweeper::Sweeper;

/// Handle to the passcode store and its background sweeper.
///
/// Clones share the same database and sweeper. The sweeper runs until
/// [`OtpStore::shutdown`] is called or the last clone is dropped.
#[derive(Clone)]
pub struct OtpStore {
    repo: DbOtpRepository,
    sweeper: Arc<Mutex<Option<Sweeper>>>,
}

impl OtpStore {
    /// Ensure the `otps` table exists and start sweeping expired codes every
    /// `sweep_interval`, which must be non-zero.
    pub async fn init(
        db: DatabaseConnection,
        sweep_interval: StdDuration,
    ) -> Result<Self, OtpServiceError> {
        if sweep_interval.is_zero() {
            return Err(anyhow::anyhow!("otp sweep interval must be non-zero").into());
        }
        ensure_schema(&db).await?;
        let repo = DbOtpRepository { db };
        let sweeper = Sweeper::spawn(repo.clone(), sweep_interval);
        Ok(Self {
            repo,
            sweeper: Arc::new(Mutex::new(Some(sweeper))),
        })
    }

    /// Stop the sweeper. Outstanding codes are left in place.
    /// Calls after the first are no-ops.
    pub async fn shutdown(&self) {
        let sweeper = self.sweeper.lock().await.take();
        if let Some(sweeper) = sweeper {
            sweeper.stop().await;
            info!("otp store shut down");
        }
    }

    /// Check that the backing database still answers.
    pub async fn ping(&self) -> Result<(), OtpServiceError> {
        self.repo.ping().await
    }

    /// Current code for `user_id` without consuming it.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn peek_code(&self, user_id: &str) -> Result<Option<String>, OtpServiceError> {
        Ok(self.repo.find_by_user(user_id).await?.map(|otp| otp.code))
    }
}

impl OtpRepository for OtpStore {
    async fn issue(
        &self,
        user_id: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<(), OtpServiceError> {
        self.repo.issue(user_id, code, ttl).await
    }

    async fn verify(&self, user_id: &str, code: &str) -> Result<bool, OtpServiceError> {
        self.repo.verify(user_id, code).await
    }

    async fn purge_expired(&self) -> Result<u64, OtpServiceError> {
        self.repo.purge_expired().await
    }
}
