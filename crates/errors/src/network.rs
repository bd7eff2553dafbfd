//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidUrl(_) => {
                Some("Check `store.base_url` in the config file or the --base-url flag.")
            }
            Self::Timeout { .. } | Self::RequestFailed(_) => {
                Some("Check network connectivity to the object store and retry.")
            }
            Self::ClientBuild(_) => Some("Check TLS and proxy settings in the environment."),
            Self::HttpError { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::RequestFailed(_))
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::RequestFailed(_) => "network.request_failed",
            Self::ClientBuild(_) => "network.client_build",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::HttpError { .. } => "network.http_error",
        };
        Some(code)
    }
}
