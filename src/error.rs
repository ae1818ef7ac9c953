//! Error types for source reading, header configuration and validation.

use thiserror::Error;

/// Message used when an underlying failure carries no description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors while fetching the document at an address.
#[derive(Debug, Error)]
pub enum FetchError {
    // IO errors (exit code 3)
    /// The address is not `-`, not a URL and not an existing path.
    #[error("input file {address} does not exist")]
    NotFound { address: String },

    /// Opening or draining the source failed.
    #[error("cannot read {address}: {message}")]
    ReadFailure { address: String, message: String },

    // Parse errors (exit code 2)
    #[error("{label} at {address} is not valid JSON: {source}")]
    ParseFailure {
        address: String,
        label: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Returns the stable identifier of this error kind.
    pub fn name(&self) -> &'static str {
        match self {
            FetchError::NotFound { .. } => "DriverInputFileDoesNotExist",
            FetchError::ReadFailure { .. } => "MiscReadError",
            FetchError::ParseFailure { .. } => "JSONParseError",
        }
    }

    /// Returns the address the failing fetch was made for.
    pub fn address(&self) -> &str {
        match self {
            FetchError::NotFound { address }
            | FetchError::ReadFailure { address, .. }
            | FetchError::ParseFailure { address, .. } => address,
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FetchError::NotFound { .. } | FetchError::ReadFailure { .. } => 3,
            FetchError::ParseFailure { .. } => 2,
        }
    }
}

/// Errors in the HTTP header configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("could not parse HTTP header \"{line}\": expected \"Name: Value\"")]
    Malformed { line: String },
}

impl HeaderError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors during validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Fetch(e) => e.exit_code(),
            ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_failure(address: &str) -> FetchError {
        let source = serde_json::from_str::<serde_json::Value>("{type:}").unwrap_err();
        FetchError::ParseFailure {
            address: address.into(),
            label: "JSON Schema".into(),
            source,
        }
    }

    #[test]
    fn fetch_error_names() {
        let err = FetchError::NotFound {
            address: "missing.json".into(),
        };
        assert_eq!(err.name(), "DriverInputFileDoesNotExist");

        let err = FetchError::ReadFailure {
            address: "-".into(),
            message: UNKNOWN_ERROR.into(),
        };
        assert_eq!(err.name(), "MiscReadError");

        assert_eq!(parse_failure("a.json").name(), "JSONParseError");
    }

    #[test]
    fn fetch_error_exit_codes() {
        let err = FetchError::NotFound {
            address: "missing.json".into(),
        };
        assert_eq!(err.exit_code(), 3);

        let err = FetchError::ReadFailure {
            address: "https://example.com/a.json".into(),
            message: "connection reset".into(),
        };
        assert_eq!(err.exit_code(), 3);

        assert_eq!(parse_failure("a.json").exit_code(), 2);
    }

    #[test]
    fn fetch_error_keeps_address() {
        assert_eq!(parse_failure("schemas/a.json").address(), "schemas/a.json");
        let err = FetchError::ReadFailure {
            address: "-".into(),
            message: "broken pipe".into(),
        };
        assert_eq!(err.address(), "-");
        assert_eq!(err.to_string(), "cannot read -: broken pipe");
    }

    #[test]
    fn parse_failure_display_names_label() {
        let msg = parse_failure("b.json").to_string();
        assert!(msg.starts_with("JSON Schema at b.json is not valid JSON"));
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::Invalid {
            errors: vec![SchemaError {
                path: "/id".into(),
                message: "missing required field".into(),
            }],
        };
        assert_eq!(err.exit_code(), 1);

        let err = ValidateError::from(FetchError::NotFound {
            address: "x.json".into(),
        });
        assert_eq!(err.exit_code(), 3);

        let err = ValidateError::InvalidSchema {
            message: "bad".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn schema_error_display() {
        let err = SchemaError {
            path: "/buyer/email".into(),
            message: "expected string, got number".into(),
        };
        assert_eq!(err.to_string(), "/buyer/email: expected string, got number");
    }
}
