//! Response types received from greetd.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminator of a [`Response`], as it appears in the `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Success,
    Error,
    AuthMessage,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Success => "success",
            ResponseType::Error => "error",
            ResponseType::AuthMessage => "auth_message",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of error reported by greetd.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Authentication failed, most likely because of wrong credentials.
    /// Not fatal: the greeter may start over with a new `create_session`.
    #[serde(rename = "auth_error")]
    Auth,

    /// A general error. See the description for details.
    #[default]
    Error,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Auth => "auth_error",
            ErrorType::Error => "error",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorType::Auth)
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an authentication message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMessageType {
    /// A question whose answer may be echoed back to the user.
    Visible,
    /// A question whose answer must be hidden, such as a password.
    Secret,
    /// Informative message, not a question.
    Info,
    /// Error message, not a question.
    Error,
}

impl AuthMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMessageType::Visible => "visible",
            AuthMessageType::Secret => "secret",
            AuthMessageType::Info => "info",
            AuthMessageType::Error => "error",
        }
    }

    /// Whether the greeter has to supply a non-empty answer.
    pub fn expects_answer(&self) -> bool {
        matches!(self, AuthMessageType::Visible | AuthMessageType::Secret)
    }
}

impl fmt::Display for AuthMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response from greetd.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// The request succeeded.
    Success,

    /// The request failed.
    Error {
        #[serde(default)]
        error_type: ErrorType,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        description: String,
    },

    /// An auth message must be answered with `post_auth_message_response` or
    /// the session cancelled. greetd may send any number of these, and a
    /// greeter should not assume anything about their order or count.
    ///
    /// A missing `auth_message_type` decodes to `None` and is handled like an
    /// informative message.
    AuthMessage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth_message_type: Option<AuthMessageType>,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        auth_message: String,
    },
}

impl Response {
    pub fn error(error_type: ErrorType, description: impl Into<String>) -> Self {
        Response::Error {
            error_type,
            description: description.into(),
        }
    }

    pub fn auth_message(auth_message_type: AuthMessageType, auth_message: impl Into<String>) -> Self {
        Response::AuthMessage {
            auth_message_type: Some(auth_message_type),
            auth_message: auth_message.into(),
        }
    }

    pub fn kind(&self) -> ResponseType {
        match self {
            Response::Success => ResponseType::Success,
            Response::Error { .. } => ResponseType::Error,
            Response::AuthMessage { .. } => ResponseType::AuthMessage,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success)
    }
}
