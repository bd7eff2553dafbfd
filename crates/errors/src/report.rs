//! Report persistence error types

use std::borrow::Cow;
use std::path::Path;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to create output directory {path}: {message}")]
    CreateDirFailed { path: String, message: String },

    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("failed to serialize report: {message}")]
    SerializeFailed { message: String },
}

impl ReportError {
    /// Convert an `io::Error` raised while writing `path`
    #[must_use]
    pub fn from_io_with_path(err: &std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => Self::WriteFailed {
                path: path.display().to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl UserFacingError for ReportError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CreateDirFailed { .. } | Self::PermissionDenied { .. } => {
                Some("Choose a writable directory with --output-dir.")
            }
            Self::WriteFailed { .. } => Some("Check free disk space in the output directory."),
            Self::SerializeFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::CreateDirFailed { .. } => "report.create_dir_failed",
            Self::PermissionDenied { .. } => "report.permission_denied",
            Self::WriteFailed { .. } => "report.write_failed",
            Self::SerializeFailed { .. } => "report.serialize_failed",
        };
        Some(code)
    }
}
