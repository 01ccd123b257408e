//! Formlink Extractor
//!
//! Parses unstructured filing text into a structured [`ExtractedForm`](formlink_domain::ExtractedForm).
//!
//! # Overview
//!
//! Each field is read through a prioritized [`RuleChain`]: the most specific
//! labelled pattern first, looser fallbacks after it. Fields are independent,
//! so a missing Form 470 reference never invalidates the record, while a
//! missing application number means there is no record at all.
//!
//! # Architecture
//!
//! ```text
//! PDF bytes → PdfTextDecoder → text → FieldExtractor → ExtractedForm
//! ```
//!
//! # Rules
//!
//! | Field | Rules, in priority order |
//! |-------|--------------------------|
//! | Application number | `Application Number` label, standalone 9-digit run |
//! | Billed entity name | `Billed Entity Name` label (rest of line) |
//! | Establishing Form 470 | `Establishing FCC Form 470` label, `Establishing…Form 470`, standalone 15-digit run |
//!
//! # Example Usage
//!
//! ```
//! use formlink_extractor::{FieldExtractor, ExtractorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = FieldExtractor::new(ExtractorConfig::default())?;
//!
//! let text = "FCC Form 471\n\
//!             Application Number: 251043327\n\
//!             Billed Entity Name: Springfield School District\n\
//!             Establishing FCC Form 470: 123456789012345";
//!
//! let form = extractor.extract(text).expect("application number present");
//! assert_eq!(form.establishing_form470_number(), Some("123456789012345"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod decoder;
mod error;
mod extractor;
pub mod rules;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use decoder::{PdfTextDecoder, Utf8TextDecoder};
pub use error::ExtractorError;
pub use extractor::FieldExtractor;
pub use rules::{ExtractionRule, FormField, RuleChain, RuleMatch};
