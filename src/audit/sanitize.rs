//! Request sanitization for logging.
//!
//! Removes secrets from requests before they are written to the log.

use serde_json::Value;

use crate::protocol::Request;

const REDACTED: &str = "[REDACTED]";

/// Sanitize a request for logging.
///
/// This function:
/// 1. Redacts the answer to an auth message, which is usually a password
/// 2. Redacts the value of every `KEY=VALUE` environment entry, keeping the key
pub fn sanitize_request(request: &Request) -> Value {
    let mut value = match serde_json::to_value(request) {
        Ok(value) => value,
        Err(_) => return Value::String(request.kind().to_string()),
    };

    if let Some(map) = value.as_object_mut() {
        if map.contains_key("response") {
            map.insert("response".to_string(), Value::String(REDACTED.to_string()));
        }

        if let Some(Value::Array(env)) = map.get_mut("env") {
            for entry in env.iter_mut() {
                if let Value::String(s) = entry {
                    *s = redact_env_entry(s);
                }
            }
        }
    }

    value
}

fn redact_env_entry(entry: &str) -> String {
    match entry.split_once('=') {
        Some((key, _)) => format!("{}={}", key, REDACTED),
        None => REDACTED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_auth_answer() {
        let request = Request::post_auth_message_response(Some("super_secret_123".into()));
        let sanitized = sanitize_request(&request);
        assert_eq!(sanitized["type"], "post_auth_message_response");
        assert_eq!(sanitized["response"], "[REDACTED]");
        assert!(!sanitized.to_string().contains("super_secret_123"));
    }

    #[test]
    fn test_missing_answer_stays_missing() {
        let sanitized = sanitize_request(&Request::post_auth_message_response(None));
        assert_eq!(sanitized, json!({"type": "post_auth_message_response"}));
    }

    #[test]
    fn test_sanitize_env_values() {
        let request = Request::start_session(
            ["sway"],
            ["XDG_SESSION_TYPE=wayland", "TOKEN=abc=def", "BARE"],
        );
        let sanitized = sanitize_request(&request);
        assert_eq!(sanitized["cmd"], json!(["sway"]));
        assert_eq!(
            sanitized["env"],
            json!(["XDG_SESSION_TYPE=[REDACTED]", "TOKEN=[REDACTED]", "[REDACTED]"])
        );
    }

    #[test]
    fn test_username_preserved() {
        let sanitized = sanitize_request(&Request::create_session("alice"));
        assert_eq!(sanitized, json!({"type": "create_session", "username": "alice"}));
    }
}
