//! Error types for moneyview-core
//!
//! Failures at the edges of the engine (fetching, cache decoding, store
//! access, subscriber callbacks) are reported through [`CoreError`]. None of
//! them is fatal: callers log them and keep the last good state.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No data source configured
    NotConfigured,
    /// Source URL rejected
    InvalidSourceUrl,
    /// Network or HTTP failure
    FetchFailed,
    /// Response body had an unexpected shape
    UnexpectedPayload,
    /// Cached rows could not be decoded
    CacheCorrupt,
    /// Key-value store failure
    StoreError,
    /// A state subscriber failed
    SubscriberFailed,
    /// Selection refers to something that does not exist
    InvalidSelection,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotConfigured => write!(f, "NOT_CONFIGURED"),
            ErrorCode::InvalidSourceUrl => write!(f, "INVALID_SOURCE_URL"),
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::UnexpectedPayload => write!(f, "UNEXPECTED_PAYLOAD"),
            ErrorCode::CacheCorrupt => write!(f, "CACHE_CORRUPT"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
            ErrorCode::SubscriberFailed => write!(f, "SUBSCRIBER_FAILED"),
            ErrorCode::InvalidSelection => write!(f, "INVALID_SELECTION"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for moneyview-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No data source configured")]
    NotConfigured,

    #[error("Invalid source URL: {url}")]
    InvalidSourceUrl { url: String, expected_prefix: String },

    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },

    #[error("Unexpected payload: {message}")]
    UnexpectedPayload { message: String },

    #[error("Cache corrupt: {message}")]
    CacheCorrupt { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Subscriber failed: {message}")]
    SubscriberFailed { message: String },

    #[error("Invalid selection: {value}")]
    InvalidSelection { value: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotConfigured => ErrorCode::NotConfigured,
            CoreError::InvalidSourceUrl { .. } => ErrorCode::InvalidSourceUrl,
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::UnexpectedPayload { .. } => ErrorCode::UnexpectedPayload,
            CoreError::CacheCorrupt { .. } => ErrorCode::CacheCorrupt,
            CoreError::StoreError { .. } => ErrorCode::StoreError,
            CoreError::SubscriberFailed { .. } => ErrorCode::SubscriberFailed,
            CoreError::InvalidSelection { .. } => ErrorCode::InvalidSelection,
            CoreError::IoError(_) => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotConfigured => ErrorSeverity::Info,
            CoreError::InvalidSourceUrl { .. } => ErrorSeverity::Warning,
            CoreError::FetchFailed { .. } => ErrorSeverity::Warning,
            CoreError::UnexpectedPayload { .. } => ErrorSeverity::Warning,
            CoreError::CacheCorrupt { .. } => ErrorSeverity::Warning,
            CoreError::StoreError { .. } => ErrorSeverity::Error,
            CoreError::SubscriberFailed { .. } => ErrorSeverity::Error,
            CoreError::InvalidSelection { .. } => ErrorSeverity::Info,
            CoreError::IoError(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(
            self.code(),
            self.to_string(),
        );

        match self {
            CoreError::NotConfigured => {
                details = details.with_suggestion(
                    "Open /setup and enter the URL of your sheet web app.".to_string()
                );
            }
            CoreError::InvalidSourceUrl { expected_prefix, .. } => {
                details = details.with_suggestion(format!(
                    "The URL must start with '{}'.", expected_prefix
                ));
            }
            CoreError::FetchFailed { message } => {
                details = details.with_detail(serde_json::json!({ "fetch_message": message }));
                details = details.with_suggestion(
                    "Check your network connection and the sheet URL.".to_string()
                );
                details = details.with_suggestion(
                    "The dashboard keeps showing the last cached data.".to_string()
                );
            }
            CoreError::UnexpectedPayload { message } => {
                details = details.with_detail(serde_json::json!({ "payload_message": message }));
                details = details.with_suggestion(
                    "The endpoint must return {\"status\": \"success\", \"data\": [...]} or a bare array.".to_string()
                );
            }
            CoreError::CacheCorrupt { .. } => {
                details = details.with_suggestion(
                    "The cache is ignored; a refresh will rewrite it.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => log::warn!(
                target: "moneyview::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
            ErrorSeverity::Error => log::error!(
                target: "moneyview::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "moneyview::error",
            "WARNING: {} - Operation: {} - Context: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotConfigured.to_string(), "NOT_CONFIGURED");
        assert_eq!(ErrorCode::FetchFailed.to_string(), "FETCH_FAILED");
        assert_eq!(ErrorCode::CacheCorrupt.to_string(), "CACHE_CORRUPT");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::FetchFailed { message: "timeout".to_string() };
        assert_eq!(error.code(), ErrorCode::FetchFailed);
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = CoreError::StoreError { message: "disk full".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Error);
        assert_eq!(CoreError::NotConfigured.code(), ErrorCode::NotConfigured);
    }

    #[test]
    fn test_io_error_conversion() {
        let error: CoreError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(error.code(), ErrorCode::IoError);
    }

    #[test]
    fn test_fetch_failed_details() {
        let error = CoreError::FetchFailed { message: "HTTP 500".to_string() };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::FetchFailed);
        assert!(details.details.is_some());
        assert_eq!(details.suggestions.len(), 2);
        assert!(details.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_invalid_url_suggestion_names_prefix() {
        let error = CoreError::InvalidSourceUrl {
            url: "https://example.com".to_string(),
            expected_prefix: "https://script.google.com".to_string(),
        };
        let details = error.to_details();
        assert!(details.suggestions[0].contains("https://script.google.com"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("refresh")
            .with_data("ticket", serde_json::json!(3));

        assert_eq!(context.operation, "refresh");
        assert_eq!(context.data["ticket"], 3);
    }
}
