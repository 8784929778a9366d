//! Guarded session driver.

use tracing::{debug, warn};

use super::SessionState;
use crate::error::{IpcError, IpcResult, ProtocolErrorKind};
use crate::protocol::{Request, Response};

/// One synchronous request/response round trip with greetd.
///
/// Implemented by [`Client`](crate::socket::Client); tests implement it with
/// scripted peers.
pub trait Exchange {
    fn exchange(&mut self, request: &Request) -> IpcResult<Response>;
}

/// Drives one login attempt and keeps the greeter on the legal path.
///
/// Requests that the current state does not permit are rejected before
/// anything is written. Any library error leaves the session terminated,
/// since the connection can no longer be trusted to be in lockstep.
///
/// # Example
///
/// ```ignore
/// let mut client = Client::connect_env()?;
/// let mut session = LoginSession::new(&mut client);
///
/// let mut response = session.create("alice")?;
/// while let Response::AuthMessage { auth_message_type, auth_message } = &response {
///     let answer = prompt_user(*auth_message_type, auth_message);
///     response = session.answer(answer)?;
/// }
///
/// if response.is_success() {
///     session.start(["sway"], Vec::<String>::new())?;
/// }
/// ```
pub struct LoginSession<'a, T: Exchange> {
    transport: &'a mut T,
    state: SessionState,
}

impl<'a, T: Exchange> LoginSession<'a, T> {
    pub fn new(transport: &'a mut T) -> Self {
        Self {
            transport,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send `request` if the current state allows it, then advance.
    pub fn send(&mut self, request: &Request) -> IpcResult<Response> {
        if !self.state.permits(request) {
            return Err(IpcError::Protocol {
                kind: ProtocolErrorKind::IllegalRequest {
                    state: self.state,
                    request: request.kind(),
                },
            });
        }

        let response = match self.transport.exchange(request) {
            Ok(response) => response,
            Err(e) => {
                self.state = SessionState::Terminated;
                return Err(e);
            }
        };

        let previous = self.state;
        match self.state.advance(request, &response) {
            Ok(next) => {
                debug!(from = %previous, to = %next, response_type = %response.kind(), "Session advanced");
                self.state = next;
                Ok(response)
            }
            Err(e) => {
                warn!(state = %previous, response_type = %response.kind(), "Peer broke the session protocol");
                self.state = SessionState::Terminated;
                Err(e)
            }
        }
    }

    /// Create a session for `username`.
    pub fn create(&mut self, username: impl Into<String>) -> IpcResult<Response> {
        self.send(&Request::create_session(username))
    }

    /// Answer the outstanding auth message.
    pub fn answer(&mut self, response: Option<String>) -> IpcResult<Response> {
        self.send(&Request::post_auth_message_response(response))
    }

    /// Start the authenticated session.
    pub fn start<C, E>(&mut self, cmd: C, env: E) -> IpcResult<Response>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        self.send(&Request::start_session(cmd, env))
    }

    /// Abandon the session.
    pub fn cancel(&mut self) -> IpcResult<Response> {
        self.send(&Request::cancel_session())
    }
}
