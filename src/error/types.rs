//! Error types for the greetd IPC client.

use thiserror::Error;

use crate::protocol::{RequestType, ResponseType};
use crate::session::SessionState;

/// Main error type for the client.
///
/// Only library-level failures end up here. A greetd `error` response is a
/// successfully decoded [`Response`](crate::protocol::Response) and is returned
/// as a value by [`Client::send`](crate::socket::Client::send).
#[derive(Error, Debug)]
pub enum IpcError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O errors on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended or stalled before a full frame was exchanged.
    #[error("Transport error: {kind}")]
    Transport { kind: TransportErrorKind },

    /// A request could not be encoded to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A response frame could not be decoded.
    #[error("Deserialization error: {kind}")]
    Deserialization { kind: DeserializationErrorKind },

    /// Framing limits or session flow violations.
    #[error("Protocol error: {kind}")]
    Protocol { kind: ProtocolErrorKind },

    /// Peer credential errors.
    #[error("Authentication error: {kind}")]
    Auth { kind: AuthErrorKind },
}

/// Transport error kinds.
#[derive(Error, Debug)]
pub enum TransportErrorKind {
    #[error("Connection closed after {received} of {expected} bytes")]
    ConnectionClosed { expected: usize, received: usize },

    #[error("Connection timed out")]
    Timeout,
}

/// Deserialization error kinds.
#[derive(Error, Debug)]
pub enum DeserializationErrorKind {
    #[error("Empty payload")]
    EmptyPayload,

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// Protocol error kinds.
#[derive(Error, Debug)]
pub enum ProtocolErrorKind {
    #[error("Message too large: {size} bytes exceeds maximum of {max} bytes")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Request '{request}' is not allowed in state {state}")]
    IllegalRequest {
        state: SessionState,
        request: RequestType,
    },

    #[error("Unexpected '{response}' response in state {state}")]
    UnexpectedResponse {
        state: SessionState,
        response: ResponseType,
    },
}

/// Peer credential error kinds.
#[derive(Error, Debug)]
pub enum AuthErrorKind {
    #[error("Unauthorized peer: UID {uid} not in allowed list")]
    UnauthorizedPeer { uid: u32 },

    #[error("Failed to read peer credentials: {message}")]
    PeerCredentials { message: String },
}

impl IpcError {
    /// True for failures of the underlying stream, as opposed to codec or
    /// flow errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, IpcError::Io(_) | IpcError::Transport { .. })
    }

    /// True if a transport deadline expired.
    pub fn is_timeout(&self) -> bool {
        match self {
            IpcError::Transport {
                kind: TransportErrorKind::Timeout,
            } => true,
            IpcError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

/// Result type alias for client operations.
pub type IpcResult<T> = Result<T, IpcError>;
