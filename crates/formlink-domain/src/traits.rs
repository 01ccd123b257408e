//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates. All calls are awaited
//! one at a time by the watcher, so implementations need not be `Send`.

#![allow(async_fn_in_trait)]

use crate::{CategorySelector, ChildRecord, RegistryRecord, WorkItem};
use std::fmt;

/// Trait for reading and mutating work items
///
/// Implemented by the infrastructure layer (formlink-tasks)
pub trait TaskStore {
    /// Error type for store operations
    type Error: fmt::Display;

    /// List every item currently in the selected category
    async fn list_items_in_category(
        &self,
        category: &CategorySelector,
    ) -> Result<Vec<WorkItem>, Self::Error>;

    /// Get a work item with its attachments
    async fn get_item(&self, id: &str) -> Result<WorkItem, Self::Error>;

    /// Move an item into the selected category
    async fn move_item_to_category(
        &self,
        id: &str,
        category: &CategorySelector,
    ) -> Result<(), Self::Error>;

    /// Append an audit note to an item
    async fn add_audit_note(&self, id: &str, text: &str) -> Result<(), Self::Error>;

    /// Mark an item completed or not
    async fn set_completed(&self, id: &str, completed: bool) -> Result<(), Self::Error>;

    /// Create a child record under an item, returning the child's id
    async fn create_child_record(
        &self,
        parent_id: &str,
        record: &ChildRecord,
    ) -> Result<String, Self::Error>;

    /// Create a new item directly in the selected category, returning its id
    async fn create_item_in_category(
        &self,
        category: &CategorySelector,
        name: &str,
        notes: &str,
    ) -> Result<String, Self::Error>;
}

/// Failure to fetch document bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The host answered with a non-success status code
    Status(u16),

    /// The request never produced a response (DNS, connect, timeout, ...)
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "HTTP status {}", code),
            FetchError::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Trait for downloading document bytes from a URL
///
/// Implemented by the application layer (formlink-watcher)
pub trait DocumentFetcher {
    /// Fetch the bytes served at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Trait for the open-data registry of filings
///
/// Implemented by the infrastructure layer (formlink-registry)
pub trait Registry {
    /// Error type for registry operations
    type Error: fmt::Display;

    /// Records whose application number equals `application_number` exactly
    async fn find_by_application_number(
        &self,
        application_number: &str,
    ) -> Result<Vec<RegistryRecord>, Self::Error>;
}

/// Trait for turning document bytes into text
///
/// Implemented by the infrastructure layer (formlink-extractor)
pub trait TextDecoder {
    /// Error type for decoding
    type Error: fmt::Display;

    /// Decode the full text of a document
    fn decode(&self, bytes: &[u8]) -> Result<String, Self::Error>;
}
