//! Configuration settings for the greetd client.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{IpcError, IpcResult};
use crate::protocol::DEFAULT_MAX_MESSAGE_SIZE;
use crate::socket::socket_path_from_env;

/// Main configuration structure for the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub socket: SocketConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Socket configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocketConfig {
    /// Path to the greetd socket. Falls back to `$GREETD_SOCK` when unset.
    pub path: Option<PathBuf>,
}

/// Limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum response size in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Socket read/write timeout in seconds, 0 to wait forever.
    #[serde(default)]
    pub socket_timeout_seconds: u64,
}

/// Security configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// UIDs the greetd process may run as. Empty skips the check.
    #[serde(default)]
    pub allowed_peer_uids: Vec<u32>,
}

fn default_max_message_size() -> usize {
    DEFAULT_MAX_MESSAGE_SIZE
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            socket_timeout_seconds: 0,
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> IpcResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| IpcError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| IpcError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn parse(content: &str) -> IpcResult<Self> {
        let settings: Settings = toml::from_str(content).map_err(|e| IpcError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// The socket to connect to: the configured path, else `$GREETD_SOCK`.
    pub fn socket_path(&self) -> IpcResult<PathBuf> {
        match &self.socket.path {
            Some(path) => Ok(path.clone()),
            None => socket_path_from_env(),
        }
    }

    /// Transport deadline, if one is configured.
    pub fn socket_timeout(&self) -> Option<Duration> {
        match self.limits.socket_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Validate the settings.
    fn validate(&self) -> IpcResult<()> {
        if self.limits.max_message_size == 0 {
            return Err(IpcError::Config {
                message: "max_message_size must be greater than zero".to_string(),
            });
        }

        if let Some(path) = &self.socket.path {
            if path.as_os_str().is_empty() {
                return Err(IpcError::Config {
                    message: "socket.path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}
