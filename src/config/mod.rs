//! Configuration module for the greetd client.
//!
//! Handles loading and validating client configuration from TOML files.

mod settings;

pub use settings::*;
