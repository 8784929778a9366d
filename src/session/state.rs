//! Session state machine.

use std::fmt;

use crate::error::{IpcError, IpcResult, ProtocolErrorKind};
use crate::protocol::{AuthMessageType, Request, Response};

/// Where a login attempt stands, as seen by the greeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session has been created yet.
    Idle,
    /// An auth message of the given type is waiting for an answer. `None`
    /// when greetd did not say, which is treated as informative.
    AwaitingAuth(Option<AuthMessageType>),
    /// Authentication succeeded; the session can be started or cancelled.
    Ready,
    /// The attempt is over. Only a new `create_session` is accepted.
    Terminated,
}

impl SessionState {
    /// Whether `request` may be sent in this state.
    pub fn permits(&self, request: &Request) -> bool {
        match (self, request) {
            (SessionState::Idle | SessionState::Terminated, Request::CreateSession { .. }) => true,
            (SessionState::AwaitingAuth(kind), Request::PostAuthMessageResponse { response }) => {
                !kind.is_some_and(|k| k.expects_answer())
                    || response.as_deref().is_some_and(|r| !r.is_empty())
            }
            (SessionState::Ready, Request::StartSession { .. }) => true,
            (SessionState::AwaitingAuth(_) | SessionState::Ready, Request::CancelSession) => true,
            _ => false,
        }
    }

    /// The state after `request` was answered with `response`.
    pub fn advance(self, request: &Request, response: &Response) -> IpcResult<SessionState> {
        if !self.permits(request) {
            return Err(IpcError::Protocol {
                kind: ProtocolErrorKind::IllegalRequest {
                    state: self,
                    request: request.kind(),
                },
            });
        }

        let next = match request {
            Request::CreateSession { .. } | Request::PostAuthMessageResponse { .. } => {
                match response {
                    Response::Success => SessionState::Ready,
                    Response::AuthMessage {
                        auth_message_type, ..
                    } => SessionState::AwaitingAuth(*auth_message_type),
                    Response::Error { .. } => SessionState::Terminated,
                }
            }
            Request::CancelSession => match response {
                Response::Success => SessionState::Terminated,
                other => {
                    return Err(IpcError::Protocol {
                        kind: ProtocolErrorKind::UnexpectedResponse {
                            state: self,
                            response: other.kind(),
                        },
                    })
                }
            },
            // The connection has served its purpose whatever greetd says.
            Request::StartSession { .. } => SessionState::Terminated,
        };

        Ok(next)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::AwaitingAuth(Some(kind)) => write!(f, "awaiting_auth({})", kind),
            SessionState::AwaitingAuth(None) => f.write_str("awaiting_auth"),
            SessionState::Ready => f.write_str("ready"),
            SessionState::Terminated => f.write_str("terminated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ErrorType;

    fn secret_prompt() -> Response {
        Response::auth_message(AuthMessageType::Secret, "Password:")
    }

    #[test]
    fn test_create_session_transitions() {
        let create = Request::create_session("user");

        assert_eq!(
            SessionState::Idle.advance(&create, &Response::Success).unwrap(),
            SessionState::Ready
        );
        assert_eq!(
            SessionState::Idle.advance(&create, &secret_prompt()).unwrap(),
            SessionState::AwaitingAuth(Some(AuthMessageType::Secret))
        );
        assert_eq!(
            SessionState::Idle
                .advance(&create, &Response::error(ErrorType::Auth, "no"))
                .unwrap(),
            SessionState::Terminated
        );
    }

    #[test]
    fn test_restart_after_termination() {
        let create = Request::create_session("user");
        assert!(SessionState::Terminated.permits(&create));
        assert!(!SessionState::Ready.permits(&create));
        assert!(!SessionState::AwaitingAuth(Some(AuthMessageType::Info)).permits(&create));
    }

    #[test]
    fn test_prompts_need_non_empty_answers() {
        let empty = Request::post_auth_message_response(Some(String::new()));
        let absent = Request::post_auth_message_response(None);
        let answer = Request::post_auth_message_response(Some("hunter2".into()));

        for kind in [AuthMessageType::Visible, AuthMessageType::Secret] {
            let state = SessionState::AwaitingAuth(Some(kind));
            assert!(!state.permits(&empty));
            assert!(!state.permits(&absent));
            assert!(state.permits(&answer));
        }

        for kind in [AuthMessageType::Info, AuthMessageType::Error] {
            let state = SessionState::AwaitingAuth(Some(kind));
            assert!(state.permits(&empty));
            assert!(state.permits(&absent));
        }
    }

    #[test]
    fn test_untyped_auth_message_is_informative() {
        let untyped = Response::AuthMessage {
            auth_message_type: None,
            auth_message: "Hello".to_string(),
        };
        let state = SessionState::Idle
            .advance(&Request::create_session("user"), &untyped)
            .unwrap();
        assert_eq!(state, SessionState::AwaitingAuth(None));
        assert_eq!(state.to_string(), "awaiting_auth");

        assert!(state.permits(&Request::post_auth_message_response(None)));
        assert!(state.permits(&Request::post_auth_message_response(Some(String::new()))));
        assert_eq!(
            state
                .advance(&Request::post_auth_message_response(None), &Response::Success)
                .unwrap(),
            SessionState::Ready
        );
    }

    #[test]
    fn test_chained_auth_messages() {
        let answer = Request::post_auth_message_response(Some("123456".into()));
        let state = SessionState::AwaitingAuth(Some(AuthMessageType::Secret));

        let state = state
            .advance(
                &answer,
                &Response::auth_message(AuthMessageType::Visible, "OTP:"),
            )
            .unwrap();
        assert_eq!(state, SessionState::AwaitingAuth(Some(AuthMessageType::Visible)));

        let state = state
            .advance(&answer, &Response::auth_message(AuthMessageType::Info, "Welcome"))
            .unwrap();
        let state = state
            .advance(&Request::post_auth_message_response(None), &Response::Success)
            .unwrap();
        assert_eq!(state, SessionState::Ready);
    }

    #[test]
    fn test_cancel_requires_success_ack() {
        let cancel = Request::cancel_session();
        let state = SessionState::AwaitingAuth(Some(AuthMessageType::Secret));

        assert_eq!(
            state.advance(&cancel, &Response::Success).unwrap(),
            SessionState::Terminated
        );
        assert_eq!(
            SessionState::Ready.advance(&cancel, &Response::Success).unwrap(),
            SessionState::Terminated
        );

        let err = state.advance(&cancel, &secret_prompt()).unwrap_err();
        assert!(matches!(
            err,
            IpcError::Protocol {
                kind: ProtocolErrorKind::UnexpectedResponse { .. }
            }
        ));
    }

    #[test]
    fn test_start_session_always_terminates() {
        let start = Request::start_session(["/usr/bin/session"], Vec::<String>::new());

        for response in [Response::Success, Response::error(ErrorType::Error, "exec failed")] {
            assert_eq!(
                SessionState::Ready.advance(&start, &response).unwrap(),
                SessionState::Terminated
            );
        }
    }

    #[test]
    fn test_illegal_requests() {
        let start = Request::start_session(["sh"], Vec::<String>::new());
        let cancel = Request::cancel_session();
        let answer = Request::post_auth_message_response(Some("x".into()));

        assert!(!SessionState::Idle.permits(&start));
        assert!(!SessionState::Idle.permits(&cancel));
        assert!(!SessionState::Idle.permits(&answer));
        assert!(!SessionState::Ready.permits(&answer));
        assert!(!SessionState::AwaitingAuth(Some(AuthMessageType::Secret)).permits(&start));
        assert!(!SessionState::Terminated.permits(&cancel));
        assert!(!SessionState::Terminated.permits(&start));

        let err = SessionState::Idle
            .advance(&start, &Response::Success)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Protocol error: Request 'start_session' is not allowed in state idle"
        );
    }
}
