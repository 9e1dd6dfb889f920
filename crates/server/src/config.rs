//! Runtime configuration.
//!
//! Values come from the environment, with defaults for local runs:
//!
//! | Variable | Default |
//! |---|---|
//! | `REPO_RECS_DATA_DIR` | `data/repos` |
//! | `REPO_RECS_LINK_HOST` | `github.com` |
//! | `REPO_RECS_LIMIT` | `10` |

use std::path::PathBuf;

use pipeline::DEFAULT_LINK_HOST;
use thiserror::Error;

pub const DATA_DIR_VAR: &str = "REPO_RECS_DATA_DIR";
pub const LINK_HOST_VAR: &str = "REPO_RECS_LINK_HOST";
pub const LIMIT_VAR: &str = "REPO_RECS_LIMIT";

pub const DEFAULT_DATA_DIR: &str = "data/repos";
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding repos.dat and relationships.dat
    pub data_dir: PathBuf,
    /// Host used when building repository links
    pub link_host: String,
    /// Recommendations per request when the caller doesn't say
    pub default_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            link_host: DEFAULT_LINK_HOST.to_string(),
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(dir) = get(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(host) = get(LINK_HOST_VAR) {
            config.set_link_host(&host)?;
        }

        if let Some(raw) = get(LIMIT_VAR) {
            let limit = raw.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
                key: LIMIT_VAR,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            if limit == 0 {
                return Err(ConfigError::Invalid {
                    key: LIMIT_VAR,
                    value: raw,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.default_limit = limit;
        }

        Ok(config)
    }

    /// Replace the link host, rejecting anything that isn't a bare host
    pub fn set_link_host(&mut self, raw: &str) -> Result<(), ConfigError> {
        let host = raw.trim().trim_end_matches('/');
        if host.contains("://") || host.is_empty() {
            return Err(ConfigError::Invalid {
                key: LINK_HOST_VAR,
                value: raw.to_string(),
                reason: "expected a bare host such as github.com".to_string(),
            });
        }
        self.link_host = host.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.link_host, "github.com");
        assert_eq!(config.default_limit, 10);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/srv/recs"),
            (LINK_HOST_VAR, "git.example.org/"),
            (LIMIT_VAR, "25"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/recs"));
        assert_eq!(config.link_host, "git.example.org");
        assert_eq!(config.default_limit, 25);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[(LIMIT_VAR, "  ")])).unwrap();
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_set_link_host() {
        let mut config = Config::default();

        config.set_link_host(" git.example.org/ ").unwrap();
        assert_eq!(config.link_host, "git.example.org");

        for bad in ["https://git.example.org", "", "/", "  "] {
            assert!(matches!(
                config.set_link_host(bad),
                Err(ConfigError::Invalid { key: LINK_HOST_VAR, .. })
            ));
        }
        assert_eq!(config.link_host, "git.example.org");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(LIMIT_VAR, "ten")])),
            Err(ConfigError::Invalid { key: LIMIT_VAR, .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(LIMIT_VAR, "0")])),
            Err(ConfigError::Invalid { key: LIMIT_VAR, .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(LINK_HOST_VAR, "https://github.com")])),
            Err(ConfigError::Invalid { key: LINK_HOST_VAR, .. })
        ));
    }
}
