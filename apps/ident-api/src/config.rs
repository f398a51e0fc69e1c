//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                | Default                          |
//! |-------------------------|----------------------------------|
//! | `IDENT_BIND`            | `0.0.0.0`                        |
//! | `IDENT_PORT`            | `8000`                           |
//! | `IDENT_DB_PATH`         | `<platform data dir>/ident.db`   |
//! | `IDENT_MAX_CONNECTIONS` | `5`                              |

use directories::ProjectDirs;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address to listen on
    pub bind: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub max_connections: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            bind: lookup("IDENT_BIND")
                .unwrap_or_else(|| "0.0.0.0".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("IDENT_BIND".to_string()))?,

            port: lookup("IDENT_PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("IDENT_PORT".to_string()))?,

            db_path: match lookup("IDENT_DB_PATH") {
                Some(path) if !path.trim().is_empty() => PathBuf::from(path),
                Some(_) => return Err(ConfigError::InvalidValue("IDENT_DB_PATH".to_string())),
                None => default_db_path()?,
            },

            max_connections: lookup("IDENT_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("IDENT_MAX_CONNECTIONS".to_string()))?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("IDENT_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Platform data directory:
/// - **macOS**: `~/Library/Application Support/com.ident.ident/ident.db`
/// - **Windows**: `%APPDATA%\ident\ident\data\ident.db`
/// - **Linux**: `~/.local/share/ident/ident.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "ident", "ident").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("ident.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine a data directory; set IDENT_DB_PATH")]
    NoDataDir,
}
