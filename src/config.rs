use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "OdontoVision";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Value of `ODONTO_DB_PATH` that selects a throwaway in-memory database.
pub const IN_MEMORY_DB: &str = ":memory:";

pub const ENV_BIND_ADDR: &str = "ODONTO_BIND_ADDR";
pub const ENV_DB_PATH: &str = "ODONTO_DB_PATH";
pub const ENV_REQUEST_TIMEOUT: &str = "ODONTO_REQUEST_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "odontovision_lib=info,tower_http=warn".to_string()
}

/// Get the application data directory.
/// ~/OdontoVision/ on all platforms, falling back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the clinic database file.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("clinica.db")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {value} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration. Built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` runs against an in-memory database.
    pub database_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: ENV_BIND_ADDR,
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let database_path = match lookup(ENV_DB_PATH) {
            Some(p) if p == IN_MEMORY_DB => None,
            Some(p) if p.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    var: ENV_DB_PATH,
                    value: p,
                    reason: "path is empty".into(),
                })
            }
            Some(p) => Some(PathBuf::from(p)),
            None => Some(default_database_path()),
        };

        let request_timeout = match lookup(ENV_REQUEST_TIMEOUT) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: ENV_REQUEST_TIMEOUT,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: ENV_REQUEST_TIMEOUT,
                        value: raw,
                        reason: "must be at least 1 second".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let log_filter = lookup("RUST_LOG").unwrap_or_else(default_log_filter);

        Ok(Self {
            bind_addr,
            database_path,
            request_timeout,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.database_path, Some(default_database_path()));
        assert_eq!(config.log_filter, default_log_filter());
    }

    #[test]
    fn memory_marker_selects_in_memory_database() {
        let config = config_from(&[(ENV_DB_PATH, ":memory:")]).unwrap();
        assert!(config.database_path.is_none());
    }

    #[test]
    fn explicit_values_are_used() {
        let config = config_from(&[
            (ENV_BIND_ADDR, "0.0.0.0:9000"),
            (ENV_DB_PATH, "/tmp/clinic.db"),
            (ENV_REQUEST_TIMEOUT, "5"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/clinic.db")));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn rejects_bad_bind_address() {
        let err = config_from(&[(ENV_BIND_ADDR, "not-an-addr")]).unwrap_err();
        assert!(err.to_string().contains(ENV_BIND_ADDR));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(config_from(&[(ENV_REQUEST_TIMEOUT, "0")]).is_err());
        assert!(config_from(&[(ENV_REQUEST_TIMEOUT, "abc")]).is_err());
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with(APP_NAME));
        assert!(default_database_path().ends_with("clinica.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
