//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document bytes could not be decoded to text
    #[error("PDF decode error: {0}")]
    PdfDecode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
