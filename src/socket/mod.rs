//! Unix socket client module.
//!
//! Connects to greetd and exchanges frames with it. Locating the socket
//! follows greetd's convention of exporting its path in `GREETD_SOCK`.

mod async_client;
mod client;

use std::path::PathBuf;

use crate::error::{IpcError, IpcResult};

pub use async_client::AsyncClient;
pub use client::Client;

/// Environment variable greetd sets for the greeter it spawns.
pub const SOCKET_ENV_VAR: &str = "GREETD_SOCK";

/// Read the greetd socket path from the environment.
pub fn socket_path_from_env() -> IpcResult<PathBuf> {
    match std::env::var_os(SOCKET_ENV_VAR) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Err(IpcError::Config {
            message: format!("environment variable {} is not set", SOCKET_ENV_VAR),
        }),
    }
}
