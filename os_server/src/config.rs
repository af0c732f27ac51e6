//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use open_swiss::coordinator::RollbackPolicy;
use open_swiss::storage::StorageConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Token used when `ADMIN_TOKEN` is unset
pub const DEFAULT_ADMIN_TOKEN: &str = "admin123";

const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Location of the tournament and registration records
    pub storage: StorageConfig,
    /// Bearer token required on admin routes
    pub admin_token: String,
    /// What submit and reject undo when a queue write fails
    pub rollback_policy: RollbackPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// CLI overrides win over `SERVER_BIND` and `DATA_DIR`.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        data_dir_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match std::env::var("SERVER_BIND") {
                Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                    var: "SERVER_BIND".to_string(),
                    reason: format!("{value:?} is not an IP:PORT address"),
                })?,
                Err(_) => DEFAULT_BIND,
            },
        };

        let data_dir = data_dir_override
            .or_else(|| std::env::var("DATA_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| StorageConfig::default().data_dir().to_path_buf());

        let admin_token = std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| {
            log::warn!("ADMIN_TOKEN not set, using the default token; set it before exposing the server");
            DEFAULT_ADMIN_TOKEN.to_string()
        });

        let rollback_policy = match std::env::var("ROLLBACK_POLICY") {
            Ok(value) => parse_rollback_policy(&value)?,
            Err(_) => RollbackPolicy::default(),
        };

        Ok(ServerConfig {
            bind,
            storage: StorageConfig::new(data_dir),
            admin_token,
            rollback_policy,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_token.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "ADMIN_TOKEN".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.storage.data_dir().as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "DATA_DIR".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_rollback_policy(value: &str) -> Result<RollbackPolicy, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "uniform" => Ok(RollbackPolicy::Uniform),
        "accept-only" | "accept_only" => Ok(RollbackPolicy::AcceptOnly),
        other => Err(ConfigError::Invalid {
            var: "ROLLBACK_POLICY".to_string(),
            reason: format!("{other:?} is not one of: uniform, accept-only"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            bind: DEFAULT_BIND,
            storage: StorageConfig::default(),
            admin_token: "secret".to_string(),
            rollback_policy: RollbackPolicy::Uniform,
        }
    }

    #[test]
    fn test_default_bind_address() {
        assert_eq!(DEFAULT_BIND.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let bind: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let config = ServerConfig::from_env(Some(bind), Some(PathBuf::from("/tmp/swiss"))).unwrap();

        assert_eq!(config.bind, bind);
        assert_eq!(config.storage.data_dir(), PathBuf::from("/tmp/swiss"));
    }

    #[test]
    fn test_parse_rollback_policy() {
        assert_eq!(parse_rollback_policy("uniform").unwrap(), RollbackPolicy::Uniform);
        assert_eq!(
            parse_rollback_policy(" Accept-Only ").unwrap(),
            RollbackPolicy::AcceptOnly
        );

        let err = parse_rollback_policy("sometimes").unwrap_err();
        assert!(err.to_string().contains("ROLLBACK_POLICY"));
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_token() {
        let mut config = config();
        config.admin_token = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "ADMIN_TOKEN"));
    }

    #[test]
    fn test_validation_rejects_empty_data_dir() {
        let mut config = config();
        config.storage = StorageConfig::new("");

        assert!(config.validate().is_err());
    }
}
