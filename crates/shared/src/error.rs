use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire shape of every application-level failure: `{success: false, message?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    pub fn silent() -> Self {
        Self {
            success: false,
            message: None,
        }
    }
}

/// The backend answered, but declined the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} rejected: {}", .message.as_deref().unwrap_or("no message given"))]
pub struct Rejection {
    pub operation: &'static str,
    pub message: Option<String>,
}

impl Rejection {
    pub fn new(operation: &'static str, message: Option<String>) -> Self {
        Self {
            operation,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// The server's message, or `fallback` when it gave none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

impl From<Rejection> for ApiFailure {
    fn from(value: Rejection) -> Self {
        Self {
            success: false,
            message: value.message,
        }
    }
}
