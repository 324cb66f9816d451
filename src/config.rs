use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_agent_id() -> String {
    "default_agent".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("complaints.json")
}

/// Construction-time settings for a [`crate::ComplaintLedger`].
///
/// One ledger instance per backing path; the ledger assumes it is the sole
/// writer of that file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_agent_id")]
    pub agent_id: String,
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            agent_id: default_agent_id(),
            storage_path: default_storage_path(),
        }
    }
}

impl LedgerConfig {
    pub fn new(agent_id: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            agent_id: agent_id.into(),
            storage_path: storage_path.into(),
        }
    }

    /// Load settings from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_values() {
        let config = LedgerConfig::default();
        assert_eq!(config.agent_id, "default_agent");
        assert_eq!(config.storage_path, PathBuf::from("complaints.json"));
    }

    #[test]
    fn loads_partial_toml_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vigil.toml");
        fs::write(&path, "agent_id = \"agent_007\"\n").unwrap();

        let config = LedgerConfig::from_path(&path).unwrap();
        assert_eq!(config.agent_id, "agent_007");
        assert_eq!(config.storage_path, PathBuf::from("complaints.json"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = LedgerConfig::from_path(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vigil.toml");
        fs::write(&path, "agent_id = [not toml").unwrap();
        assert!(LedgerConfig::from_path(&path).is_err());
    }
}
