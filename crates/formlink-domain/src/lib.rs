//! Formlink Domain Layer
//!
//! Core domain model for linking a Form 471 filing to its establishing Form 470.
//! Like every domain crate in this workspace it has ZERO external dependencies:
//! it defines the values that flow through the pipeline and the trait seams
//! behind which the infrastructure crates live.
//!
//! ## Key Concepts
//!
//! - **WorkItem**: a tracked task in the external Task Store, with attachments and notes
//! - **Document**: the bytes of a located filing plus where they came from
//! - **ExtractedForm**: identifying fields parsed out of a filing's text
//! - **MatchResult**: outcome of a registry lookup for the originating Form 470
//! - **WorkflowState / WorkflowOutcome**: the review workflow an item moves through
//!
//! ## Architecture
//!
//! ```text
//! TaskStore → DocumentFetcher → TextDecoder → Extractor → Registry → TaskStore
//! ```
//!
//! Infrastructure implementations of the traits in [`traits`] live in the
//! `formlink-tasks`, `formlink-registry` and `formlink-extractor` crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod document;
pub mod form;
pub mod matching;
pub mod traits;
pub mod work_item;
pub mod workflow;

// Re-exports for convenience
pub use category::{CategorySelector, WorkflowCategory};
pub use document::{Document, DocumentSource};
pub use form::{ExtractedForm, FormType, UNKNOWN_ENTITY};
pub use matching::{MatchResult, RegistryRecord};
pub use work_item::{Attachment, ChildRecord, WorkItem};
pub use workflow::{WorkflowOutcome, WorkflowState};
