//! Formlink Task Store clients
//!
//! Implementations of the `TaskStore` trait: an Asana REST client and an
//! in-memory store for tests and dry runs.
//!
//! # Example
//!
//! ```no_run
//! use formlink_tasks::{AsanaTaskStore, DEFAULT_BASE_URL};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), formlink_tasks::TaskStoreError> {
//! let store = AsanaTaskStore::new(DEFAULT_BASE_URL, "token", "1200000000000000", Duration::from_secs(30))?;
//! assert_eq!(store.project_id(), "1200000000000000");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod asana;
mod error;
mod memory;
mod wire;

pub use asana::{AsanaTaskStore, DEFAULT_BASE_URL};
pub use error::TaskStoreError;
pub use memory::InMemoryTaskStore;
