//! Mapping from domain errors to gRPC status codes.

use notra_core::{Error, ErrorKind};
use tonic::{Code, Status};

/// Wire code for each error kind.
///
/// The mapping is part of the API contract and must stay stable.
pub fn kind_to_code(kind: ErrorKind) -> Code {
    match kind {
        ErrorKind::InvalidInput => Code::InvalidArgument,
        ErrorKind::Unauthenticated => Code::Unauthenticated,
        ErrorKind::ProviderUnavailable => Code::Unavailable,
        ErrorKind::ProviderTimeout => Code::DeadlineExceeded,
        ErrorKind::ProviderInvalidResponse | ErrorKind::Configuration | ErrorKind::Internal => {
            Code::Internal
        }
    }
}

/// Converts a domain error into a gRPC status.
pub fn error_to_status(error: &Error) -> Status {
    Status::new(kind_to_code(error.kind()), error.to_string())
}

/// Builds a status for an escalated item failure.
pub fn failure_status(kind: ErrorKind, message: impl Into<String>) -> Status {
    Status::new(kind_to_code(kind), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_code_mapping() {
        assert_eq!(kind_to_code(ErrorKind::InvalidInput), Code::InvalidArgument);
        assert_eq!(kind_to_code(ErrorKind::Unauthenticated), Code::Unauthenticated);
        assert_eq!(kind_to_code(ErrorKind::ProviderUnavailable), Code::Unavailable);
        assert_eq!(kind_to_code(ErrorKind::ProviderTimeout), Code::DeadlineExceeded);
        assert_eq!(kind_to_code(ErrorKind::ProviderInvalidResponse), Code::Internal);
        assert_eq!(kind_to_code(ErrorKind::Configuration), Code::Internal);
        assert_eq!(kind_to_code(ErrorKind::Internal), Code::Internal);
    }

    #[test]
    fn test_error_to_status_carries_message() {
        let error = Error::invalid_input().with_message("duplicate item id: a");
        let status = error_to_status(&error);

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "InvalidInput: duplicate item id: a");
    }
}
