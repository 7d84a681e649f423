//! Backend response error taxonomy.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced while validating or reading a backend response.
///
/// Only [`BackendError::ParseFailure`], [`BackendError::TransportFailure`] and
/// [`BackendError::ApiFailure`] are produced by
/// [`BackendResponse::check`](crate::BackendResponse::check). The remaining
/// variants describe per-field outcomes that callers may choose to log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The response body is not valid JSON.
    #[error("failed to parse response body, error message {message}")]
    ParseFailure {
        /// Diagnostic from the JSON parser.
        message: String,
    },

    /// The HTTP status code is outside the 2xx range.
    #[error("unexpected http response code: {status_code}")]
    TransportFailure {
        /// Status code reported by the transport.
        status_code: i64,
    },

    /// The API-level `status` field is present and non-zero.
    #[error("API error: {status}, description: {description}")]
    ApiFailure {
        /// Value of the `status` field.
        status: i64,
        /// Value of the `description` field, empty when absent.
        description: String,
    },

    /// A field is missing or does not have the expected JSON type.
    #[error("field {path} is absent or not {expected}")]
    FieldAbsentOrMismatched {
        /// Pointer that was looked up.
        path: String,
        /// Expected JSON kind.
        expected: &'static str,
    },

    /// Computed plugin digest does not equal the declared digest.
    #[error("plugin digest mismatch: declared {declared}, computed {computed}")]
    IntegrityMismatch {
        /// Digest declared by the backend.
        declared: String,
        /// Digest computed over the delivered source.
        computed: String,
    },

    /// A path is not a syntactically valid JSON pointer.
    #[error("invalid JSON pointer: {0:?}")]
    InvalidPointer(String),
}

impl BackendError {
    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ParseFailure { .. } => ErrorKind::ParseFailure,
            Self::TransportFailure { .. } => ErrorKind::TransportFailure,
            Self::ApiFailure { .. } => ErrorKind::ApiFailure,
            Self::FieldAbsentOrMismatched { .. } => ErrorKind::FieldAbsentOrMismatched,
            Self::IntegrityMismatch { .. } => ErrorKind::IntegrityMismatch,
            Self::InvalidPointer(_) => ErrorKind::InvalidPointer,
        }
    }
}

/// Error classification, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`BackendError::ParseFailure`].
    ParseFailure,
    /// See [`BackendError::TransportFailure`].
    TransportFailure,
    /// See [`BackendError::ApiFailure`].
    ApiFailure,
    /// See [`BackendError::FieldAbsentOrMismatched`].
    FieldAbsentOrMismatched,
    /// See [`BackendError::IntegrityMismatch`].
    IntegrityMismatch,
    /// See [`BackendError::InvalidPointer`].
    InvalidPointer,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ParseFailure => "parse_failure",
            Self::TransportFailure => "transport_failure",
            Self::ApiFailure => "api_failure",
            Self::FieldAbsentOrMismatched => "field_absent_or_mismatched",
            Self::IntegrityMismatch => "integrity_mismatch",
            Self::InvalidPointer => "invalid_pointer",
        };
        f.write_str(name)
    }
}

/// Result type for backend response operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_payload() {
        let err = BackendError::ApiFailure {
            status: 403,
            description: "app_id not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 403, description: app_id not found");
        assert_eq!(err.kind(), ErrorKind::ApiFailure);

        let err = BackendError::TransportFailure { status_code: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(ErrorKind::ParseFailure.to_string(), "parse_failure");
        assert_eq!(
            serde_json::to_string(&ErrorKind::IntegrityMismatch).unwrap(),
            "\"integrity_mismatch\""
        );
    }
}
