//! CLI error handling

use std::fmt;

use docaudit_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(docaudit_errors::ConfigError),
    /// Error raised by a library crate
    Run(docaudit_errors::Error),
    /// Interrupted by the user
    Cancelled,
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Cancelled | CliError::Run(docaudit_errors::Error::Cancelled) => 130,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Run(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Cancelled => write!(f, "Interrupted"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Run(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Cancelled => None,
        }
    }
}

impl From<docaudit_errors::ConfigError> for CliError {
    fn from(e: docaudit_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<docaudit_errors::Error> for CliError {
    fn from(e: docaudit_errors::Error) -> Self {
        match e {
            docaudit_errors::Error::Config(config) => CliError::Config(config),
            docaudit_errors::Error::Cancelled => CliError::Cancelled,
            other => CliError::Run(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docaudit_errors::{InputError, ReportError};

    #[test]
    fn test_cancelled_maps_to_130() {
        let err = CliError::from(docaudit_errors::Error::Cancelled);
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_run_error_includes_code_and_hint() {
        let err = CliError::from(docaudit_errors::Error::from(ReportError::PermissionDenied {
            path: "/out".to_string(),
        }));
        let text = err.to_string();
        assert!(text.contains("Code: report.permission_denied"));
        assert!(text.contains("Hint:"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_input_error_exit_code() {
        let err = CliError::from(docaudit_errors::Error::from(InputError::NothingSelected));
        assert_eq!(err.exit_code(), 1);
    }
}
