use reqwest::StatusCode;
use shared::error::Rejection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered HTTP {status} without a readable body")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("{endpoint} returned an unreadable payload: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("invalid gateway url: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        self.rejection().is_some()
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
