//! Service configuration.
//!
//! One JSON file covering the two tunable components: the bridge's wait
//! bound and the transactional runner's failure policy. Every field has a
//! default, so an absent or partial file still yields a usable
//! configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bridge::DEFAULT_TIMEOUT_MS;
use crate::transaction::FailurePolicy;

/// Top-level config.json shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub transaction: FailurePolicy,
}

/// Invocation bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Maximum wait for host-thread completion before the bridge reports a
    /// timeout, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BridgeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Path to config.json in the platform config directory.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("host-bridge")
        .join("config.json")
}

impl ServiceConfig {
    /// Read the default config file, falling back to defaults if it is
    /// missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load_from(&config_path())
    }

    /// Read a specific config file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        read_json_file(path).unwrap_or_default()
    }

    /// Write this configuration as pretty JSON, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, contents)
    }
}

/// Read a JSON file and deserialize it, warning on anything but a missing
/// file.
fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {}", path.display(), e);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::FailureKind;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.bridge.timeout_ms, 10_000);
        assert_eq!(config.bridge.timeout(), Duration::from_secs(10));
        assert!(config.transaction.suppress_warnings);
        assert!(!config.transaction.resolve_errors);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"bridge":{"timeoutMs":2500}}"#).unwrap();
        assert_eq!(config.bridge.timeout_ms, 2500);
        assert!(config.transaction.suppress_warnings);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config.bridge.timeout_ms, 10_000);
    }

    #[test]
    fn test_malformed_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = ServiceConfig::load_from(&path);
        assert_eq!(config.bridge.timeout_ms, 10_000);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = ServiceConfig::default();
        config.bridge.timeout_ms = 5000;
        config.transaction = config.transaction.ignore_error("wall.overlap");
        config.save_to(&path).unwrap();

        let loaded = ServiceConfig::load_from(&path);
        assert_eq!(loaded.bridge.timeout_ms, 5000);
        assert!(loaded
            .transaction
            .ignored_errors
            .contains(&FailureKind::new("wall.overlap")));
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let json = serde_json::to_string(&ServiceConfig::default()).unwrap();
        assert!(json.contains("\"timeoutMs\""));
        assert!(json.contains("\"suppressWarnings\""));
        assert!(json.contains("\"resolveErrors\""));
    }
}
