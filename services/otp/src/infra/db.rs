use std::time::Duration as StdDuration;

use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tracing::debug;

use passcode_otp_migration::Migrator;
use passcode_otp_schema::otps;

use crate::domain::repository::OtpRepository;
use crate::domain::types::OtpRecord;
use crate::error::OtpServiceError;

/// Lifetime applied to the pooled connection. An in-memory SQLite database
/// lives only as long as its connection, so the pool must never recycle it.
const CONNECTION_LIFETIME: StdDuration = StdDuration::from_secs(60 * 60 * 24 * 365);

/// Open the passcode database. The pool is pinned to a single connection.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    opts.max_connections(1)
        .min_connections(1)
        .idle_timeout(CONNECTION_LIFETIME)
        .max_lifetime(CONNECTION_LIFETIME)
        .sqlx_logging(false);
    Database::connect(opts).await
}

/// Create the `otps` table if it does not exist yet. Safe to call repeatedly.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), OtpServiceError> {
    Migrator::up(db, None)
        .await
        .context("apply otp migrations")?;
    Ok(())
}

// ── OTP repository ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn issue(
        &self,
        user_id: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<(), OtpServiceError> {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .context("otp expiry out of range")?;
        otps::Entity::insert(otps::ActiveModel {
            id: NotSet,
            user_id: Set(user_id.to_owned()),
            code: Set(code.to_owned()),
            expires_at: Set(expires_at.timestamp_millis()),
        })
        .exec(&self.db)
        .await
        .context("insert otp")?;
        Ok(())
    }

    async fn verify(&self, user_id: &str, code: &str) -> Result<bool, OtpServiceError> {
        let consumed = self.consume(user_id, code).await?;
        if let Some(otp) = &consumed {
            debug!(otp_id = otp.id, "otp consumed");
        }
        Ok(consumed.is_some())
    }

    async fn purge_expired(&self) -> Result<u64, OtpServiceError> {
        let now = Utc::now().timestamp_millis();
        let result = otps::Entity::delete_many()
            .filter(otps::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("purge expired otps")?;
        Ok(result.rows_affected)
    }
}

impl DbOtpRepository {
    /// Delete and return one unexpired record matching `(user_id, code)`.
    async fn consume(
        &self,
        user_id: &str,
        code: &str,
    ) -> Result<Option<OtpRecord>, OtpServiceError> {
        let model = self
            .db
            .transaction::<_, Option<otps::Model>, DbErr>(|txn| {
                let user_id = user_id.to_owned();
                let code = code.to_owned();
                Box::pin(async move {
                    // Read the clock only once the connection is ours; waiting
                    // for it must not extend a code's lifetime.
                    let now = Utc::now().timestamp_millis();
                    let Some(model) = otps::Entity::find()
                        .filter(otps::Column::UserId.eq(user_id))
                        .filter(otps::Column::Code.eq(code))
                        .filter(otps::Column::ExpiresAt.gt(now))
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    // Re-check expiry on delete so a sweep or another verifier
                    // that got there first leaves nothing to consume.
                    let result = otps::Entity::delete_many()
                        .filter(otps::Column::Id.eq(model.id))
                        .filter(otps::Column::ExpiresAt.gt(now))
                        .exec(txn)
                        .await?;
                    Ok((result.rows_affected == 1).then_some(model))
                })
            })
            .await
            .context("verify otp")?;
        model.map(otp_from_model).transpose()
    }

    /// First outstanding record for a user, expired or not. Read-only.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn find_by_user(&self, user_id: &str) -> Result<Option<OtpRecord>, OtpServiceError> {
        let model = otps::Entity::find()
            .filter(otps::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find otp by user")?;
        model.map(otp_from_model).transpose()
    }

    pub async fn ping(&self) -> Result<(), OtpServiceError> {
        self.db.ping().await.context("ping otp database")?;
        Ok(())
    }
}

fn otp_from_model(model: otps::Model) -> Result<OtpRecord, OtpServiceError> {
    let expires_at = DateTime::<Utc>::from_timestamp_millis(model.expires_at)
        .with_context(|| format!("otp {} has out-of-range expires_at", model.id))?;
    Ok(OtpRecord {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        expires_at,
    })
}
