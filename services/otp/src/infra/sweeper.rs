use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::domain::repository::OtpRepository;
use crate::infra::db::DbOtpRepository;

/// Background task that purges expired passcodes on a fixed period.
pub struct Sweeper {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn the sweep loop. The first sweep runs one full `every` after spawn.
    ///
    /// # Panics
    ///
    /// Panics if `every` is zero.
    pub fn spawn(repo: DbOtpRepository, every: Duration) -> Self {
        assert!(!every.is_zero(), "otp sweep interval must be non-zero");
        let (stop, mut stopped) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = every.as_millis() as u64, "otp sweeper started");
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => match repo.purge_expired().await {
                        Ok(0) => {}
                        Ok(purged) => debug!(purged, "purged expired otps"),
                        Err(e) => error!(error = ?e, "otp sweep failed"),
                    },
                }
            }
            info!("otp sweeper stopped");
        });
        Self { stop, handle }
    }

    /// Signal the loop to exit and wait for it. An in-flight purge completes first.
    pub async fn stop(self) {
        // Send fails only if the task already exited; joining below reports why.
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            warn!(error = %e, "otp sweeper task ended abnormally");
        }
    }
}
