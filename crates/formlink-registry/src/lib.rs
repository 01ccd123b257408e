//! Formlink Registry Layer
//!
//! Registry implementations and the Registry Matcher that links a Form 471 to
//! its establishing Form 470.
//!
//! # Architecture
//!
//! This crate provides implementations of the `Registry` trait from `formlink-domain`
//! and the [`RegistryMatcher`] that turns registry answers into a
//! [`MatchResult`](formlink_domain::MatchResult).
//!
//! # Registries
//!
//! - `MockRegistry`: Deterministic mock for testing
//! - `UsacRegistry`: USAC Open Data (Socrata) integration
//!
//! # Examples
//!
//! ```
//! use formlink_registry::{MockRegistry, RegistryMatcher};
//! use formlink_domain::{ExtractedForm, FormType};
//!
//! # tokio_test_runtime(async {
//! let mut registry = MockRegistry::default();
//! registry.add_record("251043327", "http://x/y.pdf");
//!
//! let matcher = RegistryMatcher::new(registry);
//! let form = ExtractedForm::new("251043327", FormType::Form471).unwrap();
//! let result = matcher.match_form(&form).await;
//! assert_eq!(result.form470_url(), Some("http://x/y.pdf"));
//! # });
//! # fn tokio_test_runtime<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod matcher;
pub mod usac;

use formlink_domain::traits::Registry;
use formlink_domain::RegistryRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use matcher::RegistryMatcher;
pub use usac::UsacRegistry;

/// Errors that can occur during registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Registry answered with a non-success status
    #[error("API error: {0}")]
    Status(u16),

    /// Invalid response body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Search key is not a digit string
    #[error("Invalid search key: {0}")]
    InvalidKey(String),
}

/// Mock registry for deterministic testing
///
/// Returns pre-configured records without making any network calls.
///
/// # Examples
///
/// ```
/// use formlink_registry::MockRegistry;
///
/// let mut registry = MockRegistry::default();
/// registry.add_record("250001122", "http://x/y.pdf");
/// registry.add_error("250009999");
/// assert_eq!(registry.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    records: Arc<Mutex<HashMap<String, Vec<RegistryRecord>>>>,
    errors: Arc<Mutex<HashMap<String, u16>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockRegistry {
    /// Create an empty registry (every lookup returns zero records)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record with a document URL for the given application number
    pub fn add_record(&mut self, application_number: impl Into<String>, url: impl Into<String>) {
        let application_number = application_number.into();
        let record = RegistryRecord {
            application_number: Some(application_number.clone()),
            document_url: Some(url.into()),
        };
        self.push(application_number, record);
    }

    /// Add a record that carries no document URL
    pub fn add_record_without_url(&mut self, application_number: impl Into<String>) {
        let application_number = application_number.into();
        let record = RegistryRecord {
            application_number: Some(application_number.clone()),
            document_url: None,
        };
        self.push(application_number, record);
    }

    /// Configure lookups for `application_number` to fail with HTTP 500
    pub fn add_error(&mut self, application_number: impl Into<String>) {
        self.add_status_error(application_number, 500);
    }

    /// Configure lookups for `application_number` to fail with the given status
    pub fn add_status_error(&mut self, application_number: impl Into<String>, status: u16) {
        lock(&self.errors).insert(application_number.into(), status);
    }

    /// Number of lookups made
    pub fn call_count(&self) -> usize {
        lock(&self.queries).len()
    }

    /// Keys looked up, in order
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }

    fn push(&mut self, application_number: String, record: RegistryRecord) {
        lock(&self.records)
            .entry(application_number)
            .or_default()
            .push(record);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock only means another test thread panicked
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Registry for MockRegistry {
    type Error = RegistryError;

    async fn find_by_application_number(
        &self,
        application_number: &str,
    ) -> Result<Vec<RegistryRecord>, Self::Error> {
        lock(&self.queries).push(application_number.to_string());

        if let Some(status) = lock(&self.errors).get(application_number) {
            return Err(RegistryError::Status(*status));
        }

        Ok(lock(&self.records)
            .get(application_number)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_registry_default_is_empty() {
        let registry = MockRegistry::new();
        let records = registry.find_by_application_number("1").await.unwrap();
        assert!(records.is_empty());
        assert_eq!(registry.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_registry_records_and_errors() {
        let mut registry = MockRegistry::new();
        registry.add_record("1", "http://x/1.pdf");
        registry.add_status_error("2", 503);

        let records = registry.find_by_application_number("1").await.unwrap();
        assert_eq!(records[0].document_url.as_deref(), Some("http://x/1.pdf"));

        let err = registry.find_by_application_number("2").await.unwrap_err();
        assert!(matches!(err, RegistryError::Status(503)));
        assert_eq!(registry.queries(), vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_registry_clone_shares_state() {
        let registry1 = MockRegistry::new();
        let registry2 = registry1.clone();

        registry1.find_by_application_number("7").await.unwrap();

        assert_eq!(registry1.call_count(), 1);
        assert_eq!(registry2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_registry_survives_poisoned_lock() {
        let registry = MockRegistry::new();
        let shared = registry.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.queries.lock().unwrap();
            panic!("panic while holding the lock");
        })
        .join();
        assert!(registry.queries.is_poisoned());

        registry.find_by_application_number("1").await.unwrap();
        assert_eq!(registry.call_count(), 1);
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(RegistryError::Status(503).to_string(), "API error: 503");
    }
}
