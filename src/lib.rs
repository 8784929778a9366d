//! greetd IPC client library
//!
//! A greeter talks to greetd over a Unix socket with length-prefixed JSON
//! frames, one request and one response at a time. This crate provides the
//! typed messages and codec ([`protocol`]), blocking and tokio clients
//! ([`socket`]), and a driver that keeps a login attempt on the legal
//! request sequence ([`session`]).
//!
//! ```ignore
//! use greetd_ipc::{Client, Request, Response};
//!
//! let mut client = Client::connect_env()?;
//! match client.send(&Request::create_session("alice"))? {
//!     Response::Success => { /* no authentication needed */ }
//!     Response::AuthMessage { auth_message, .. } => println!("{}", auth_message),
//!     Response::Error { description, .. } => eprintln!("{}", description),
//! }
//! ```

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod socket;

pub use error::{IpcError, IpcResult};
pub use protocol::{AuthMessageType, ErrorType, Request, Response};
pub use session::{LoginSession, SessionState};
pub use socket::{AsyncClient, Client};
