//! Client configuration: defaults, optional JSON file, then CLI/env overrides.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use glyco_core::PREDICT_PATH;

/// Where uvicorn serves the prediction app by default.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    pub predict_path: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: PREDICT_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Apply explicit overrides on top of whatever was loaded.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self
    }
}

/// Load a config file. Missing keys keep their defaults.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<ClientConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let config: ClientConfig = serde_json::from_str(&data).context("parse config json")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let path = Path::new("target/test_glyco_config.json");
        fs::create_dir_all("target").unwrap();
        fs::write(path, r#"{ "base_url": "http://10.0.0.5:8000" }"#).unwrap();

        let config = load_config(path).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.predict_path, PREDICT_PATH);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<ClientConfig>(r#"{ "base": "x" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn overrides_win() {
        let config = ClientConfig::default().with_overrides(Some("http://svc".into()), Some(5));
        assert_eq!(config.base_url, "http://svc");
        assert_eq!(config.timeout_secs, 5);

        let untouched = ClientConfig::default().with_overrides(None, None);
        assert_eq!(untouched, ClientConfig::default());
    }
}
