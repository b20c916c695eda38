//! Per-item results of batch processing.

use notra_core::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};

use super::request::NoteRequest;

/// Outcome of a single provider call.
///
/// A failed call is data, not an error: the batch as a whole still
/// succeeds and carries the failure in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderResult {
    /// The provider produced content.
    Success {
        /// Generated content.
        value: String,
    },
    /// The provider call failed.
    Failure {
        /// Classification of the failure.
        kind: ErrorKind,
        /// Human-readable description.
        message: String,
    },
}

impl ProviderResult {
    /// Whether this result carries content.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether this result carries a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Generated content, if the call succeeded.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Success { value } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Failure classification, if the call failed.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Failure description, if the call failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl From<Result<String>> for ProviderResult {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(value) => Self::Success { value },
            Err(error) => Self::Failure {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }
}

/// Result of processing one batch item, keyed by the item's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteOutcome {
    /// Identifier of the originating item.
    pub id: String,
    /// Label of the originating item.
    pub label: String,
    /// What the provider call produced.
    pub result: ProviderResult,
}

impl NoteOutcome {
    /// Creates a successful outcome.
    pub fn success(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            result: ProviderResult::Success {
                value: value.into(),
            },
        }
    }

    /// Creates a failed outcome from an error.
    pub fn failure(id: impl Into<String>, label: impl Into<String>, error: &Error) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            result: ProviderResult::Failure {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }

    /// Creates an outcome from an item and the result of its provider call.
    pub fn from_result(item: NoteRequest, result: Result<String>) -> Self {
        Self {
            id: item.id,
            label: item.label,
            result: result.into(),
        }
    }

    /// Whether the item's provider call succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}
