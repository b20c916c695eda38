//! Server error types with enhanced context and recovery suggestions.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Comprehensive error type for server operations with detailed context and recovery suggestions.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Server configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind to the specified address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Runtime server error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] tonic::transport::Error),

    /// Reflection service registration error.
    #[error("Reflection registration error: {0}")]
    Reflection(#[source] tonic_reflection::server::Error),
}

impl ServerError {
    /// Returns a unique error code for this error type.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "E001",
            Self::Bind { .. } => "E002",
            Self::Runtime(_) => "E003",
            Self::Reflection(_) => "E004",
        }
    }

    /// Determines if this error is potentially recoverable.
    ///
    /// Recoverable errors are those that might succeed if retried or
    /// if the environment changes (e.g., different port, wait for resource).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfig(_) | Self::Reflection(_) => false, // Need manual intervention
            Self::Bind { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::PermissionDenied
                    | io::ErrorKind::AddrInUse
                    | io::ErrorKind::AddrNotAvailable
            ), // Can retry
            Self::Runtime(_) => false, // Transport failures need investigation
        }
    }

    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => {
                Some("Check your configuration and ensure all required fields are set correctly")
            }
            Self::Bind { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Try using a port above 1024 or run with appropriate privileges")
                }
                io::ErrorKind::AddrInUse => Some(
                    "The port is already in use. Try a different port or stop the conflicting service",
                ),
                io::ErrorKind::AddrNotAvailable => {
                    Some("The address is not available. Check network interface configuration")
                }
                _ => Some("Check network configuration and firewall settings"),
            },
            Self::Runtime(_) => Some("Check network configuration and inspect preceding log output"),
            Self::Reflection(_) => {
                Some("The compiled file descriptor set is incomplete. Rebuild the workspace")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind_error(kind: io::ErrorKind) -> ServerError {
        ServerError::Bind {
            address: "127.0.0.1:50051".to_string(),
            source: io::Error::new(kind, "test"),
        }
    }

    #[test]
    fn error_codes_are_unique() {
        let config_err = ServerError::InvalidConfig("test".to_string());
        let bind_err = bind_error(io::ErrorKind::AddrInUse);

        let codes = [config_err.error_code(), bind_err.error_code()];

        // Ensure all codes are unique
        for i in 0..codes.len() {
            for j in i + 1..codes.len() {
                assert_ne!(codes[i], codes[j], "Error codes must be unique");
            }
        }
    }

    #[test]
    fn recoverable_errors_have_suggestions() {
        let bind_err = bind_error(io::ErrorKind::PermissionDenied);

        assert!(bind_err.is_recoverable());
        assert!(bind_err.suggestion().is_some());
    }

    #[test]
    fn unexpected_bind_failures_are_not_recoverable() {
        let bind_err = bind_error(io::ErrorKind::UnexpectedEof);

        assert!(!bind_err.is_recoverable());
        assert!(bind_err.suggestion().is_some());
    }

    #[test]
    fn non_recoverable_errors_may_have_suggestions() {
        let config_err = ServerError::InvalidConfig("invalid field".to_string());

        assert!(!config_err.is_recoverable());
        assert!(config_err.suggestion().is_some()); // Still helpful for user
    }
}
