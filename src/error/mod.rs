//! Error types for the greetd IPC client.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
