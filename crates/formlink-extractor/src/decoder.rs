//! Document-to-text decoders

use crate::error::ExtractorError;
use formlink_domain::traits::TextDecoder;
use std::panic::{self, AssertUnwindSafe};

/// Decodes the text layer of digital PDFs using the pdf-extract crate
///
/// Scanned, image-only PDFs decode to little or no text; no OCR is attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextDecoder;

impl TextDecoder for PdfTextDecoder {
    type Error = ExtractorError;

    fn decode(&self, bytes: &[u8]) -> Result<String, Self::Error> {
        // pdf-extract panics on some malformed inputs instead of returning Err
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractorError::PdfDecode(e.to_string())),
            Err(_) => Err(ExtractorError::PdfDecode(
                "PDF parser aborted on malformed input".to_string(),
            )),
        }
    }
}

/// Treats document bytes as UTF-8 text, replacing invalid sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8TextDecoder;

impl TextDecoder for Utf8TextDecoder {
    type Error = ExtractorError;

    fn decode(&self, bytes: &[u8]) -> Result<String, Self::Error> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
