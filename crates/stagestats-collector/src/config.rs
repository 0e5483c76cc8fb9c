//! Configuration for a collector run
//!
//! The configuration is a flat TOML file of string values. Its key set must
//! exactly equal [`CANONICAL_KEYS`] — a missing key and an unexpected key
//! both halt the run with the same diagnostic enumerating the full canonical
//! set, before any connection is attempted.

use crate::error::{CollectorError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// The exact key set a configuration file must define. The proxy values may
/// be empty strings, but the keys must be present.
pub const CANONICAL_KEYS: [&str; 8] = [
    "database_url",
    "database_username",
    "database_password",
    "platform_url",
    "platform_token",
    "proxy_host",
    "proxy_username",
    "proxy_password",
];

/// Validated collector configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_username: String,
    pub database_password: String,
    pub platform_url: String,
    pub platform_token: String,
    pub proxy_host: String,
    pub proxy_username: String,
    pub proxy_password: String,
}

impl Config {
    /// Load and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CollectorError::Configuration(format!(
                "could not read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&raw, &path.display().to_string())
    }

    /// Parse and validate configuration file contents.
    pub fn from_toml_str(raw: &str, origin: &str) -> Result<Self> {
        let mut values: BTreeMap<String, String> = toml::from_str(raw).map_err(|e| {
            CollectorError::Configuration(format!(
                "configuration file '{}' is not a flat table of strings: {}",
                origin, e
            ))
        })?;

        let expected: BTreeSet<&str> = CANONICAL_KEYS.into_iter().collect();
        let actual: BTreeSet<&str> = values.keys().map(String::as_str).collect();
        if actual != expected {
            return Err(CollectorError::Configuration(format!(
                "invalid configuration file '{}': expected exactly the keys [{}]",
                origin,
                CANONICAL_KEYS.join(", ")
            )));
        }

        let mut take = |key: &str| values.remove(key).unwrap_or_default();

        Ok(Self {
            database_url: take("database_url"),
            database_username: take("database_username"),
            database_password: take("database_password"),
            platform_url: take("platform_url"),
            platform_token: take("platform_token"),
            proxy_host: take("proxy_host"),
            proxy_username: take("proxy_username"),
            proxy_password: take("proxy_password"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
database_url = "postgres://localhost/stats"
database_username = "collector"
database_password = "secret"
platform_url = "https://platform.example.com/data"
platform_token = "token-123"
proxy_host = ""
proxy_username = ""
proxy_password = ""
"#;

    #[test]
    fn parses_a_valid_configuration() {
        let config = Config::from_toml_str(VALID, "test").unwrap();

        assert_eq!(config.database_url, "postgres://localhost/stats");
        assert_eq!(config.database_username, "collector");
        assert_eq!(config.platform_token, "token-123");
        assert_eq!(config.proxy_host, "");
    }

    #[test]
    fn rejects_a_missing_key_listing_the_canonical_set() {
        let raw = VALID.replace("platform_token = \"token-123\"\n", "");
        let err = Config::from_toml_str(&raw, "test").unwrap_err();

        let message = err.to_string();
        for key in CANONICAL_KEYS {
            assert!(message.contains(key), "diagnostic should name '{}'", key);
        }
    }

    #[test]
    fn rejects_an_extra_key_with_the_same_diagnostic() {
        let raw = format!("{}\nextra_key = \"surprise\"\n", VALID);
        let missing = Config::from_toml_str(&VALID.replace("proxy_host = \"\"\n", ""), "test")
            .unwrap_err()
            .to_string();
        let extra = Config::from_toml_str(&raw, "test").unwrap_err().to_string();

        assert_eq!(missing, extra);
        for key in CANONICAL_KEYS {
            assert!(extra.contains(key));
        }
    }

    #[test]
    fn rejects_a_missing_file_naming_the_path() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();

        assert!(matches!(err, CollectorError::Configuration(_)));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn loads_from_a_real_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.database_password, "secret");
    }

    #[test]
    fn sample_configuration_stays_valid() {
        let sample = include_str!("../../../collector.sample.toml");
        Config::from_toml_str(sample, "collector.sample.toml").unwrap();
    }
}
