// realco-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Message fragments (lowercase) that mark a driver failure as transient.
///
/// Matching is a case-insensitive substring test against the error text. Transport
/// timeouts and refused connects from the HTTP client are mapped structurally in
/// `From<reqwest::Error>`, not through this list.
pub const RETRYABLE_MESSAGE_FRAGMENTS: [&str; 6] = [
    "econnreset",
    "etimedout",
    "network",
    "temporarily unavailable",
    "invalid session",
    "session has been closed",
];

pub const MOCK_MODE_MESSAGE: &str = "Databricks is not configured (running in mock mode).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Timeout,
    TransientConnection,
    Query,
    MockMode,
}

impl ErrorCategory {
    #[inline]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Timeout | Self::TransientConnection)
    }
}

/// Failures raised while talking to the warehouse (or refusing to).
///
/// Variants are `Clone` so a single connect attempt can report the same failure to
/// every caller that was waiting on it.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum WarehouseError {
    #[error("{0}")]
    #[diagnostic(
        code(realco::infra::configuration),
        help("Set DATABRICKS_HOST, DATABRICKS_HTTP_PATH and DATABRICKS_TOKEN, and the DATABRICKS_TABLE_* overrides.")
    )]
    Configuration(String),

    #[error("{label} timed out after {timeout_ms}ms.")]
    #[diagnostic(code(realco::infra::timeout))]
    Timeout { label: String, timeout_ms: u64 },

    #[error("{0}")]
    #[diagnostic(
        code(realco::infra::transient),
        help("The connection was reset or the session expired; the query can be retried.")
    )]
    TransientConnection(String),

    #[error("{0}")]
    #[diagnostic(code(realco::infra::query))]
    Query(String),

    #[error("{}", MOCK_MODE_MESSAGE)]
    #[diagnostic(
        code(realco::infra::mock_mode),
        help("Only the probe query and SHOW/DESCRIBE statements are answered without live credentials.")
    )]
    MockMode,
}

impl WarehouseError {
    /// Classify a raw driver message into the transient or the query bucket.
    pub fn from_driver_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_retryable_message(&message) {
            Self::TransientConnection(message)
        } else {
            Self::Query(message)
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn timeout(label: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            label: label.into(),
            timeout_ms,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::TransientConnection(_) => ErrorCategory::TransientConnection,
            Self::Query(_) => ErrorCategory::Query,
            Self::MockMode => ErrorCategory::MockMode,
        }
    }

    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<reqwest::Error> for WarehouseError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest hides the io kind behind its Display chain, flatten it first
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }

        if err.is_timeout() || err.is_connect() {
            Self::TransientConnection(message)
        } else {
            Self::from_driver_message(message)
        }
    }
}

pub fn is_retryable_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RETRYABLE_MESSAGE_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(realco::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- JSON ---
    #[error("JSON Error: {0}")]
    #[diagnostic(code(realco::infra::json))]
    Json(#[from] serde_json::Error),
}
