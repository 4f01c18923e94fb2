// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(&contents, is_yaml(path))?;
    config.validate()?;
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse_config(contents: &str, yaml: bool) -> Result<Config> {
    let config = if yaml {
        serde_yaml::from_str(contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(contents).context("Failed to parse JSON config")?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = parse_config("{}", true).unwrap();
        assert_eq!(config.store.ttl(), Duration::from_secs(120));
        assert_eq!(config.store.sweep_interval(), Duration::from_secs(30));
        assert!(config.metrics.enabled);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = parse_config(r#"{"store": {"ttl_secs": 10}}"#, false).unwrap();
        assert_eq!(config.store.ttl_secs, 10);
        assert_eq!(config.store.sweep_interval_secs, 30);
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        let config = parse_config("store:\n  sweep_interval_secs: 0\n", true).unwrap();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn loads_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "store:\n  ttl_secs: 60\n  sweep_interval_secs: 5\nmetrics:\n  enabled: false"
        )
        .unwrap();

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.store.ttl(), Duration::from_secs(60));
        assert_eq!(config.store.sweep_interval(), Duration::from_secs(5));
        assert!(!config.metrics.enabled);
    }

    #[tokio::test]
    async fn invalid_file_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"store": {{"ttl_secs": 0}}}}"#).unwrap();

        assert!(load_config(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        assert!(load_config("/nonexistent/store.yaml").await.is_err());
    }
}
