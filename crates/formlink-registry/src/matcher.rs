//! Registry Matcher: picks the search key and interprets registry answers

use formlink_domain::traits::Registry;
use formlink_domain::{ExtractedForm, MatchResult};
use tracing::{info, warn};

/// Diagnostic used when a form offers no key to search with
pub const NO_SEARCH_KEY: &str = "No search number found";

/// Links an extracted form to its Form 470 through a [`Registry`]
pub struct RegistryMatcher<R> {
    registry: R,
}

impl<R> RegistryMatcher<R>
where
    R: Registry,
{
    /// Create a matcher over the given registry
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Get a reference to the underlying registry
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Key to query the registry with
    ///
    /// A Form 471 that cites an establishing Form 470 is searched by that
    /// number; anything else falls back to its own application number.
    pub fn search_key(form: &ExtractedForm) -> Option<&str> {
        let key = match form.establishing_form470_number() {
            Some(number) if form.is_form471() => number,
            _ => form.application_number(),
        };
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// Look up the Form 470 for an extracted form
    ///
    /// Never fails: transport problems and empty records come back as a
    /// `MatchResult` carrying an error, while zero records is a plain
    /// "not found" with no error.
    pub async fn match_form(&self, form: &ExtractedForm) -> MatchResult {
        let key = match Self::search_key(form) {
            Some(key) => key.to_string(),
            None => {
                warn!("{}", NO_SEARCH_KEY);
                return MatchResult::failed(None, NO_SEARCH_KEY);
            }
        };

        if form.establishing_form470_number().is_some() {
            info!("Searching registry by Establishing FCC Form 470 number {}", key);
        } else {
            info!("No establishing Form 470 number, searching by application number {}", key);
        }

        let records = match self.registry.find_by_application_number(&key).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Registry lookup for {} failed: {}", key, e);
                return MatchResult::failed(Some(key), e.to_string());
            }
        };

        let Some(first) = records.first() else {
            info!("No Form 470 found for {}", key);
            return MatchResult::not_found(key);
        };

        match first.document_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                info!("Found Form 470 for {}: {}", key, url);
                MatchResult::found(key, url)
            }
            _ => {
                warn!("Form 470 record for {} has no document URL", key);
                MatchResult::failed(Some(key), "No URL in record")
            }
        }
    }
}
