//! Input discovery and loading error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum InputError {
    #[error("input path not found: {path}")]
    PathNotFound { path: String },

    #[error("failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("no input files selected")]
    NothingSelected,
}

impl UserFacingError for InputError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PathNotFound { .. } => Some("Pass existing files or directories to `verify`."),
            Self::NothingSelected => {
                Some("Check the --states filter; file names must start with a state code like `WV_`.")
            }
            Self::ReadFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::PathNotFound { .. } => "input.path_not_found",
            Self::ReadFailed { .. } => "input.read_failed",
            Self::NothingSelected => "input.nothing_selected",
        };
        Some(code)
    }
}
