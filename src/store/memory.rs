// src/store/memory.rs
use super::StoreError;
use crate::config::StoreConfig;
use crate::health::HealthcheckResult;
use crate::metrics::{MetricsCollector, Timer};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Latest result per healthcheck, expired after a TTL by a periodic sweep.
///
/// Expiry is batched: an entry is removed by the first purge pass that sees
/// it older than `ttl`, so a result may be listed for up to
/// `ttl + sweep_interval` after its timestamp.
///
/// Clones share the same results and the same sweep task.
#[derive(Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    sweep_interval: Duration,
    sweeper: Arc<Mutex<Option<Sweeper>>>,
}

struct Shared {
    results: RwLock<HashMap<String, HealthcheckResult>>,
    ttl: Duration,
    metrics: Option<Arc<MetricsCollector>>,
}

struct Sweeper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

// The last store handle going away must not leave the sweep running.
impl Drop for Sweeper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl MemoryStore {
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        Self::build(ttl, sweep_interval, None)
    }

    pub fn from_config(config: &StoreConfig, metrics: Option<Arc<MetricsCollector>>) -> Self {
        Self::build(config.ttl(), config.sweep_interval(), metrics)
    }

    fn build(
        ttl: Duration,
        sweep_interval: Duration,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                results: RwLock::new(HashMap::new()),
                ttl,
                metrics,
            }),
            sweep_interval,
            sweeper: Arc::new(Mutex::new(None)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Spawn the background sweep task on the current tokio runtime.
    ///
    /// The first purge happens one full `sweep_interval` after this call.
    pub async fn start(&self) -> Result<(), StoreError> {
        if self.sweep_interval.is_zero() {
            return Err(StoreError::ZeroSweepInterval);
        }

        let mut sweeper = self.sweeper.lock().await;
        if sweeper.is_some() {
            warn!("Result store sweep already running, ignoring start");
            return Err(StoreError::AlreadyRunning);
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(sweep(
            self.shared.clone(),
            self.sweep_interval,
            cancel.clone(),
        ));
        *sweeper = Some(Sweeper { cancel, handle });

        info!(
            "Started result store with ttl {:?} and sweep interval {:?}",
            self.shared.ttl, self.sweep_interval
        );
        Ok(())
    }

    /// Cancel the sweep task and wait until it has exited.
    ///
    /// Once this returns, no automatic purge touches the store until the
    /// next `start`.
    pub async fn stop(&self) -> Result<(), StoreError> {
        let Some(mut sweeper) = self.sweeper.lock().await.take() else {
            warn!("Result store sweep is not running, ignoring stop");
            return Err(StoreError::NotRunning);
        };

        sweeper.cancel.cancel();
        (&mut sweeper.handle).await?;

        info!("Stopped result store");
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.sweeper.lock().await.is_some()
    }

    /// Record `result` as the latest one for its name, replacing any older
    /// entry.
    pub async fn add(&self, result: HealthcheckResult) {
        let mut results = self.shared.results.write().await;
        results.insert(result.name.clone(), result);

        if let Some(metrics) = &self.shared.metrics {
            metrics.record_add(results.len());
        }
    }

    /// Snapshot of every stored result, in no particular order.
    pub async fn list(&self) -> Vec<HealthcheckResult> {
        self.shared.results.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.shared.results.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove every result older than the TTL. Returns how many were removed.
    pub async fn purge(&self) -> usize {
        self.shared.purge_at(Utc::now()).await
    }

    /// Same as [`purge`](Self::purge), measuring ages against `now`.
    pub async fn purge_at(&self, now: DateTime<Utc>) -> usize {
        self.shared.purge_at(now).await
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default(), None)
    }
}

impl Shared {
    async fn purge_at(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;

        // Held for the whole pass so readers never see a partial purge.
        let mut results = self.results.write().await;
        let timer = Timer::new();
        let before = results.len();

        results.retain(|name, result| {
            let expired = is_expired(result.timestamp, now, ttl);
            if expired {
                info!(name = %name, "expire healthcheck");
            }
            !expired
        });

        let expired = before - results.len();
        if let Some(metrics) = &self.metrics {
            metrics.record_purge(expired, results.len(), timer.elapsed());
        }

        debug!(
            "Purge complete: {} expired, {} remaining",
            expired,
            results.len()
        );
        expired
    }
}

/// A result is expired once its age strictly exceeds the TTL. Timestamps in
/// the future never expire.
fn is_expired(timestamp: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(timestamp)
        .to_std()
        .map(|age| age > ttl)
        .unwrap_or(false)
}

async fn sweep(shared: Arc<Shared>, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!("Result store sweep running every {:?}", period);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Result store sweep shutting down");
                break;
            }
            _ = ticker.tick() => {
                shared.purge_at(Utc::now()).await;
            }
        }
    }
}
