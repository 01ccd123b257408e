//! Error types for the Task Store clients.

use thiserror::Error;

/// Task Store operation errors
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Connection error (network, DNS, timeout, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request could not be completed for another transport reason
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error text returned by the API
        message: String,
    },

    /// Authentication or authorization error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// No item with the given id
    #[error("Item not found: {0}")]
    NotFound(String),

    /// No category satisfied the selector
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client misconfiguration (missing token, bad base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure injected by a test double
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl TaskStoreError {
    /// Classify a non-success status from the API
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => TaskStoreError::Auth(message),
            404 => TaskStoreError::NotFound(message),
            _ => TaskStoreError::Status { status, message },
        }
    }
}

impl From<reqwest::Error> for TaskStoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            TaskStoreError::Connection(e.to_string())
        } else if e.is_decode() {
            TaskStoreError::InvalidResponse(e.to_string())
        } else if e.is_status() {
            match e.status() {
                Some(status) => TaskStoreError::from_status(status.as_u16(), e.to_string()),
                None => TaskStoreError::Http(e.to_string()),
            }
        } else {
            TaskStoreError::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TaskStoreError {
    fn from(e: serde_json::Error) -> Self {
        TaskStoreError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(TaskStoreError::from_status(401, "no"), TaskStoreError::Auth(_)));
        assert!(matches!(TaskStoreError::from_status(404, "gone"), TaskStoreError::NotFound(_)));
        assert!(matches!(
            TaskStoreError::from_status(500, "boom"),
            TaskStoreError::Status { status: 500, .. }
        ));
    }
}
