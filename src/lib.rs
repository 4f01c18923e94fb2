// src/lib.rs
pub mod config;
pub mod health;
pub mod metrics;
pub mod store;

pub use health::HealthcheckResult;
pub use store::{MemoryStore, StoreError};
