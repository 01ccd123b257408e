//! Core Field Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::rules::{APPLICATION_NUMBER_CHAIN, BILLED_ENTITY_CHAIN, ESTABLISHING_FORM470_CHAIN};
use formlink_domain::traits::TextDecoder;
use formlink_domain::{ExtractedForm, FormType};
use tracing::{debug, info, warn};

/// Parses filing text into an [`ExtractedForm`]
///
/// # Examples
///
/// ```
/// use formlink_extractor::FieldExtractor;
/// use formlink_domain::FormType;
///
/// let extractor = FieldExtractor::default();
/// let form = extractor
///     .extract("FCC Form 471\nApplication Number: 251043327")
///     .unwrap();
///
/// assert_eq!(form.form_type(), FormType::Form471);
/// assert_eq!(form.application_number(), "251043327");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    config: ExtractorConfig,
}

impl FieldExtractor {
    /// Create a new extractor
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self { config })
    }

    /// Get the active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Classify the filing type from its text
    pub fn classify(&self, text: &str) -> FormType {
        let lower = text.to_lowercase();
        let bare = self.config.bare_digit_markers;

        if lower.contains("form 471") || (bare && lower.contains("471")) {
            FormType::Form471
        } else if lower.contains("form 470") || (bare && lower.contains("470")) {
            FormType::Form470
        } else {
            FormType::Unknown
        }
    }

    /// Extract identifying fields from filing text
    ///
    /// Returns `None` when no application number can be found; nothing else
    /// about a filing is usable without it.
    pub fn extract(&self, text: &str) -> Option<ExtractedForm> {
        let text = self.bounded(text);
        info!("Extracting form fields from {} characters of text", text.len());

        let form_type = self.classify(text);
        debug!("Form type: {}", form_type);

        let application = match APPLICATION_NUMBER_CHAIN.first_match(text) {
            Some(hit) => hit,
            None => {
                warn!("No application number found");
                return None;
            }
        };
        debug!(
            "Application number {} via rule '{}'",
            application.value, application.rule
        );

        let mut form = ExtractedForm::new(application.value, form_type)?;

        match BILLED_ENTITY_CHAIN.first_match(text) {
            Some(entity) => form = form.with_billed_entity_name(entity.value),
            None => debug!("Billed entity name not found"),
        }

        if form.is_form471() {
            match ESTABLISHING_FORM470_CHAIN.first_match(text) {
                Some(hit) => {
                    debug!(
                        "Establishing Form 470 number {} via rule '{}'",
                        hit.value, hit.rule
                    );
                    form = form.with_establishing_form470_number(hit.value);
                }
                None => warn!("No Establishing FCC Form 470 number found in Form 471"),
            }
        }

        info!(
            "Extracted form {} (type {}, entity '{}')",
            form.application_number(),
            form.form_type(),
            form.billed_entity_name()
        );
        Some(form)
    }

    /// Decode document bytes and extract fields from the text
    pub fn extract_bytes<D>(
        &self,
        decoder: &D,
        bytes: &[u8],
    ) -> Result<Option<ExtractedForm>, ExtractorError>
    where
        D: TextDecoder,
    {
        let text = decoder
            .decode(bytes)
            .map_err(|e| ExtractorError::PdfDecode(e.to_string()))?;
        Ok(self.extract(&text))
    }

    /// Truncate text to the configured maximum on a char boundary
    fn bounded<'a>(&self, text: &'a str) -> &'a str {
        let max = self.config.max_text_length;
        if text.len() <= max {
            return text;
        }
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        warn!("Text truncated from {} to {} bytes", text.len(), end);
        &text[..end]
    }
}
