//! Request types sent by a greeter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminator of a [`Request`], as it appears in the `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    CreateSession,
    PostAuthMessageResponse,
    StartSession,
    CancelSession,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::CreateSession => "create_session",
            RequestType::PostAuthMessageResponse => "post_auth_message_response",
            RequestType::StartSession => "start_session",
            RequestType::CancelSession => "cancel_session",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to greetd.
///
/// Each variant carries only the keys greetd reads for it, so irrelevant keys
/// never reach the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Creates a session and starts a login attempt for `username`.
    ///
    /// The session is ready to be started if greetd answers with success.
    CreateSession { username: String },

    /// Answers the outstanding auth message.
    ///
    /// Informative messages (`info`, `error`) do not need an answer, so
    /// `response` may be `None`.
    PostAuthMessageResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },

    /// Starts the authenticated session with `cmd`, adding `env` (`KEY=VALUE`)
    /// on top of the environment set up by PAM.
    ///
    /// The session starts once the greeter process exits.
    StartSession {
        #[serde(default)]
        cmd: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        env: Vec<String>,
    },

    /// Cancels the session that is currently being configured.
    CancelSession,
}

impl Request {
    pub fn create_session(username: impl Into<String>) -> Self {
        Request::CreateSession {
            username: username.into(),
        }
    }

    pub fn post_auth_message_response(response: Option<String>) -> Self {
        Request::PostAuthMessageResponse { response }
    }

    pub fn start_session<C, E>(cmd: C, env: E) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Request::StartSession {
            cmd: cmd.into_iter().map(Into::into).collect(),
            env: env.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cancel_session() -> Self {
        Request::CancelSession
    }

    pub fn kind(&self) -> RequestType {
        match self {
            Request::CreateSession { .. } => RequestType::CreateSession,
            Request::PostAuthMessageResponse { .. } => RequestType::PostAuthMessageResponse,
            Request::StartSession { .. } => RequestType::StartSession,
            Request::CancelSession => RequestType::CancelSession,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn to_value(request: &Request) -> Value {
        serde_json::to_value(request).unwrap()
    }

    #[test]
    fn test_create_session_omits_other_keys() {
        let value = to_value(&Request::create_session("me"));
        assert_eq!(value, json!({"type": "create_session", "username": "me"}));
    }

    #[test]
    fn test_create_session_keeps_unicode_and_empty_usernames() {
        assert_eq!(
            to_value(&Request::create_session("一些文字"))["username"],
            "一些文字"
        );
        assert_eq!(to_value(&Request::create_session(""))["username"], "");
    }

    #[test]
    fn test_post_auth_message_response() {
        let value = to_value(&Request::post_auth_message_response(Some("ютф-8?".into())));
        assert_eq!(
            value,
            json!({"type": "post_auth_message_response", "response": "ютф-8?"})
        );

        let value = to_value(&Request::post_auth_message_response(None));
        assert_eq!(value, json!({"type": "post_auth_message_response"}));
    }

    #[test]
    fn test_start_session_omits_empty_env() {
        let value = to_value(&Request::start_session(["/usr/bin/session"], Vec::<String>::new()));
        assert_eq!(
            value,
            json!({"type": "start_session", "cmd": ["/usr/bin/session"]})
        );

        let value = to_value(&Request::start_session(["Hyprland"], ["HOME=/home/cutie"]));
        assert_eq!(
            value,
            json!({"type": "start_session", "cmd": ["Hyprland"], "env": ["HOME=/home/cutie"]})
        );
    }

    #[test]
    fn test_cancel_session() {
        assert_eq!(
            to_value(&Request::cancel_session()),
            json!({"type": "cancel_session"})
        );
    }

    #[test]
    fn test_request_parses_back() {
        let requests = [
            Request::create_session("user"),
            Request::post_auth_message_response(Some("hunter2".into())),
            Request::post_auth_message_response(None),
            Request::start_session(["sway", "--unsupported-gpu"], ["XDG_SESSION_TYPE=wayland"]),
            Request::cancel_session(),
        ];

        for request in requests {
            let json = serde_json::to_string(&request).unwrap();
            let parsed: Request = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, request, "{}", json);
        }
    }

    #[test]
    fn test_kind_matches_type_key() {
        let request = Request::start_session(["sh"], Vec::<String>::new());
        assert_eq!(request.kind(), RequestType::StartSession);
        assert_eq!(to_value(&request)["type"], request.kind().as_str());
    }
}
