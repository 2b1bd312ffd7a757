use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::ClassifyOptions;

/// Project-level configuration loaded from `.envsift.toml`.
///
/// All fields are optional and default to empty: with no config file the
/// classifier runs purely on the bundled dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Explicit variable-name to hosts mappings.
    ///
    /// An override always wins over dataset-driven detection. An entry
    /// with an empty host list marks the variable as a secret that must
    /// never be forwarded.
    #[serde(default)]
    pub overrides: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Creates a default configuration with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from an `.envsift.toml` file.
    ///
    /// Returns the default configuration if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_toml(path, &content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Converts this configuration into classifier options.
    #[must_use]
    pub fn to_classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            overrides: self.overrides.clone(),
        }
    }
}

fn parse_toml(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors that can occur when reading or parsing an `.envsift.toml`
/// configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Path to the config file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid TOML or unexpected values.
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Path to the config file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Returns the file path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for clearer failure messages")]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn default_config_has_no_overrides() {
        let config = Config::default();
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn from_toml_parses_override_table() {
        let config = Config::from_toml(
            r#"
            [overrides]
            MY_INTERNAL_TOKEN = ["api.internal.example.com"]
            BLOCKED_KEY = []
        "#,
        )
        .unwrap();

        assert_eq!(config.overrides["MY_INTERNAL_TOKEN"], vec!["api.internal.example.com"]);
        assert!(config.overrides["BLOCKED_KEY"].is_empty());
    }

    #[test]
    fn from_toml_returns_defaults_for_empty_string() {
        let config = Config::from_toml("").unwrap();
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn from_toml_rejects_malformed_toml_syntax() {
        assert!(Config::from_toml("this is { not valid toml").is_err());
    }

    #[test]
    fn from_toml_rejects_non_array_override_value() {
        assert!(Config::from_toml("[overrides]\nX = \"host\"").is_err());
    }

    #[test]
    fn load_returns_default_config_when_file_not_found() {
        let config = Config::load(Path::new("/nonexistent/path/.envsift.toml")).unwrap();
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn load_parses_existing_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[overrides]\nX_TOKEN = [\"x.example.com\"]").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.overrides["X_TOKEN"], vec!["x.example.com"]);
    }

    #[test]
    fn to_classify_options_carries_overrides() {
        let mut config = Config::new();
        config.overrides.insert("A".to_string(), vec!["a.example.com".to_string()]);

        let options = config.to_classify_options();
        assert_eq!(options.overrides["A"], vec!["a.example.com"]);
    }

    #[test]
    fn config_error_includes_path_in_display() {
        let error = ConfigError::Read {
            path: PathBuf::from("/etc/envsift.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert!(error.to_string().contains("/etc/envsift.toml"));
        assert_eq!(error.path(), Path::new("/etc/envsift.toml"));
    }
}
