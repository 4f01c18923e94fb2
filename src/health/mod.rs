// src/health/mod.rs
mod result;

pub use result::HealthcheckResult;
