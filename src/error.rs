use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the Azure image adapter and its collaborators.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Precondition(String),

    #[error("operation not supported: {0}")]
    Unsupported(String),

    #[error("authentication failure (HTTP {status}) {code}: {message}")]
    Authentication {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Azure API returned error status {status} {code}: {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation was cancelled")]
    Cancelled,
}

impl CloudError {
    /// The catalog endpoint answered with nothing we could read. Every cause is
    /// reported as a forbidden access.
    pub fn illegal_access() -> Self {
        CloudError::Authentication {
            status: 403,
            code: "Illegal Access".to_string(),
            message: "Illegal access to requested resource".to_string(),
        }
    }

    pub fn no_context() -> Self {
        CloudError::Config("No context was specified for this request".to_string())
    }

    pub fn not_supported() -> Self {
        CloudError::Unsupported("Not currently supported".to_string())
    }
}

#[test]
fn test_illegal_access_is_forbidden() {
    match CloudError::illegal_access() {
        CloudError::Authentication { status, code, .. } => {
            assert_eq!(status, 403);
            assert_eq!(code, "Illegal Access");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
