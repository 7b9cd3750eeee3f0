use thiserror::Error;

/// Unified error type for roboversion operations
#[derive(Error, Debug)]
pub enum RoboversionError {
    #[error("'{0}' is not a PEP440-compliant version string")]
    MalformedVersion(String),

    #[error("Conflicting prerelease: only one of alpha, beta or release candidate may be set")]
    ConflictingPrerelease,

    #[error("Invalid version field: {0}")]
    InvalidField(String),

    #[error("'{0}' is not a valid local version identifier")]
    InvalidLocal(String),

    #[error("Cannot bump the prerelease of a version without one")]
    NoPrereleaseSet,

    #[error("Argument conflict: {0}")]
    ArgumentConflict(String),

    #[error("Local version identifiers cannot be bumped")]
    LocalNotBumpable,

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("History access failed: {0}")]
    History(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in roboversion
pub type Result<T> = std::result::Result<T, RoboversionError>;

impl RoboversionError {
    /// Create an invalid-field error with context
    pub fn invalid_field(msg: impl Into<String>) -> Self {
        RoboversionError::InvalidField(msg.into())
    }

    /// Create an argument-conflict error with context
    pub fn argument_conflict(msg: impl Into<String>) -> Self {
        RoboversionError::ArgumentConflict(msg.into())
    }

    /// Create a history-access error with context
    pub fn history(msg: impl Into<String>) -> Self {
        RoboversionError::History(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RoboversionError::Config(msg.into())
    }

    /// Whether the error came from the version-control collaborator
    pub fn is_history_failure(&self) -> bool {
        matches!(self, RoboversionError::Git(_) | RoboversionError::History(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_version_carries_input() {
        let err = RoboversionError::MalformedVersion("1.x".to_string());
        assert_eq!(
            err.to_string(),
            "'1.x' is not a PEP440-compliant version string"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RoboversionError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        assert!(!err.is_history_failure());
    }

    #[test]
    fn test_history_failures() {
        assert!(RoboversionError::history("exit status 128").is_history_failure());

        let git_err = git2::Error::from_str("bad revision");
        let err: RoboversionError = git_err.into();
        assert!(err.is_history_failure());
        assert!(err.to_string().starts_with("Git operation failed"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (RoboversionError::invalid_field("x"), "Invalid version field"),
            (RoboversionError::argument_conflict("x"), "Argument conflict"),
            (RoboversionError::history("x"), "History access failed"),
            (RoboversionError::config("x"), "Configuration error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
