// src/health/result.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a single healthcheck execution.
///
/// Produced by the healthcheck runners and retained by the store until a
/// newer result with the same `name` arrives or the result expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthcheckResult {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub success: bool,
    #[serde(rename = "healthcheck-timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub duration_ms: u64,
}

impl HealthcheckResult {
    pub fn new(name: impl Into<String>, success: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            summary: String::new(),
            labels: BTreeMap::new(),
            success,
            timestamp,
            message: String::new(),
            duration_ms: 0,
        }
    }

    pub fn success(name: impl Into<String>) -> Self {
        Self::new(name, true, Utc::now())
    }

    pub fn failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut result = Self::new(name, false, Utc::now());
        result.message = message.into();
        result
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_carries_message() {
        let result = HealthcheckResult::failure("dns-check", "NXDOMAIN");
        assert!(!result.success);
        assert_eq!(result.message, "NXDOMAIN");
    }

    #[test]
    fn serializes_timestamp_under_exporter_key() {
        let result = HealthcheckResult::success("http-check")
            .with_summary("GET /health")
            .with_label("env", "prod");
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("healthcheck-timestamp").is_some());
        assert_eq!(json["labels"]["env"], "prod");
        assert_eq!(json["summary"], "GET /health");
    }
}
