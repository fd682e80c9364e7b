use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use axum_test::TestServer;
use chrono::{Duration, Utc};

use passcode_otp::domain::repository::OtpRepository;
use passcode_otp::domain::types::OtpRecord;
use passcode_otp::error::OtpServiceError;
use passcode_otp::infra::db::connect;
use passcode_otp::router::build_router;
use passcode_otp::state::AppState;
use passcode_otp::store::OtpStore;

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

pub struct MockOtpRepo {
    pub records: Arc<Mutex<Vec<OtpRecord>>>,
}

impl MockOtpRepo {
    pub fn new(records: Vec<OtpRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the internal record list for post-execution inspection.
    pub fn records_handle(&self) -> Arc<Mutex<Vec<OtpRecord>>> {
        Arc::clone(&self.records)
    }
}

impl OtpRepository for MockOtpRepo {
    async fn issue(
        &self,
        user_id: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<(), OtpServiceError> {
        let mut records = self.records.lock().unwrap();
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        records.push(OtpRecord {
            id,
            user_id: user_id.to_owned(),
            code: code.to_owned(),
            expires_at: Utc::now() + ttl,
        });
        Ok(())
    }

    async fn verify(&self, user_id: &str, code: &str) -> Result<bool, OtpServiceError> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let found = records
            .iter()
            .position(|r| r.user_id == user_id && r.code == code && r.expires_at > now);
        match found {
            Some(idx) => {
                records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn purge_expired(&self) -> Result<u64, OtpServiceError> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.expires_at > now);
        Ok((before - records.len()) as u64)
    }
}

// ── FailingOtpRepo ───────────────────────────────────────────────────────────

/// Repository whose storage is always unavailable.
pub struct FailingOtpRepo;

impl OtpRepository for FailingOtpRepo {
    async fn issue(&self, _: &str, _: &str, _: Duration) -> Result<(), OtpServiceError> {
        Err(anyhow::anyhow!("database is locked").into())
    }

    async fn verify(&self, _: &str, _: &str) -> Result<bool, OtpServiceError> {
        Err(anyhow::anyhow!("database is locked").into())
    }

    async fn purge_expired(&self) -> Result<u64, OtpServiceError> {
        Err(anyhow::anyhow!("database is locked").into())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub const TEST_USER_ID: &str = "test-user";

pub fn test_otp(user_id: &str, code: &str, ttl: Duration) -> OtpRecord {
    OtpRecord {
        id: 1,
        user_id: user_id.to_owned(),
        code: code.to_owned(),
        expires_at: Utc::now() + ttl,
    }
}

pub async fn test_store() -> OtpStore {
    let db = connect("sqlite::memory:").await.unwrap();
    OtpStore::init(db, StdDuration::from_secs(60)).await.unwrap()
}

pub async fn test_server() -> TestServer {
    let state = AppState {
        store: test_store().await,
        otp_ttl: Duration::minutes(5),
    };
    TestServer::new(build_router(state)).unwrap()
}
