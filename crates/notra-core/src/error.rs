//! Common error type definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// This type is commonly used as a source error in structured error types,
/// providing a way to wrap any error that implements the standard `Error` trait
/// while maintaining Send and Sync bounds for multi-threaded contexts.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur in gateway operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed.
    InvalidInput,
    /// Caller credential is missing or not in the allow-list.
    Unauthenticated,
    /// Provider could not be reached or refused the request.
    ProviderUnavailable,
    /// Provider call exceeded the configured deadline.
    ProviderTimeout,
    /// Provider output could not be parsed into the expected value.
    ProviderInvalidResponse,
    /// Configuration error.
    Configuration,
    /// Internal service error.
    Internal,
}

/// A structured error type for gateway operations.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new unauthenticated error.
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated)
    }

    /// Creates a new provider unavailable error.
    pub fn provider_unavailable() -> Self {
        Self::new(ErrorKind::ProviderUnavailable)
    }

    /// Creates a new provider timeout error.
    pub fn provider_timeout() -> Self {
        Self::new(ErrorKind::ProviderTimeout)
    }

    /// Creates a new provider invalid response error.
    pub fn provider_invalid_response() -> Self {
        Self::new(ErrorKind::ProviderInvalidResponse)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new internal error.
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns true if the error was caused by the caller.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidInput | ErrorKind::Unauthenticated)
    }

    /// Returns true if the error originates on the server side.
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns true if the error came from a provider call.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ProviderUnavailable
                | ErrorKind::ProviderTimeout
                | ErrorKind::ProviderInvalidResponse
        )
    }

    /// Returns true if retrying the operation could succeed.
    ///
    /// The gateway itself never retries; this classification is for callers
    /// that implement their own retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ProviderUnavailable | ErrorKind::ProviderTimeout
        )
    }

    /// Returns a suggested delay before retrying, if the error is retryable.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self.kind {
            ErrorKind::ProviderUnavailable => Some(Duration::from_secs(1)),
            ErrorKind::ProviderTimeout => Some(Duration::from_secs(2)),
            _ => None,
        }
    }

    /// Returns true if the error is an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        self.kind == ErrorKind::Unauthenticated
    }

    /// Returns true if the error is a timeout.
    pub fn is_timeout_error(&self) -> bool {
        self.kind == ErrorKind::ProviderTimeout
    }
}
