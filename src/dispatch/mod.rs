//! Request Dispatcher
//! Mission: Uniform, credentialed access to the console backend API

pub mod client;

pub use client::{ApiClient, Whoami};

use serde::{Deserialize, Serialize};

/// Uniform response wrapper served to callers of this gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Dispatch failures. One calling convention for every caller: a `Result`
/// carrying either the decoded payload or one of these, never both an
/// envelope check and a catch.
#[derive(Debug)]
pub enum DispatchError {
    /// Non-2xx response; message is server-provided when available.
    Status { status: u16, message: String },
    /// Network-level failure before a response was read.
    Transport(String),
    /// The response body did not decode to the expected shape.
    Decode(String),
}

impl DispatchError {
    /// True when the backend rejected the credential itself.
    pub fn is_auth(&self) -> bool {
        matches!(self, DispatchError::Status { status: 401, .. })
    }

    pub fn message(&self) -> &str {
        match self {
            DispatchError::Status { message, .. } => message,
            DispatchError::Transport(message) => message,
            DispatchError::Decode(message) => message,
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Status { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            DispatchError::Transport(message) => write!(f, "Transport error: {message}"),
            DispatchError::Decode(message) => write!(f, "Decode error: {message}"),
        }
    }
}

impl std::error::Error for DispatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_only_for_401() {
        let unauthorized = DispatchError::Status {
            status: 401,
            message: "expired".to_string(),
        };
        assert!(unauthorized.is_auth());

        let forbidden = DispatchError::Status {
            status: 403,
            message: "wrong role".to_string(),
        };
        assert!(!forbidden.is_auth());

        assert!(!DispatchError::Transport("refused".to_string()).is_auth());
    }

    #[test]
    fn test_envelope_serialization_omits_empty_fields() {
        let envelope = Envelope::<()>::message("Session terminated");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Session terminated");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_error_display_carries_message() {
        let err = DispatchError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error 503: maintenance");
        assert_eq!(err.message(), "maintenance");
    }
}
