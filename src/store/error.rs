// src/store/error.rs

/// Lifecycle misuse of a [`MemoryStore`](super::MemoryStore).
///
/// Map operations never fail; only `start`/`stop` report errors and none of
/// them leaves the stored results in a different state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Sweep task is already running")]
    AlreadyRunning,

    #[error("Sweep interval must be greater than zero")]
    ZeroSweepInterval,

    #[error("Sweep task is not running")]
    NotRunning,

    #[error("Sweep task terminated abnormally: {0}")]
    SweepTask(#[from] tokio::task::JoinError),
}
