//! Registry lookup results

/// A record returned by the open-data registry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryRecord {
    /// The record's application number
    pub application_number: Option<String>,

    /// Link to the filing's PDF, when the registry has one
    pub document_url: Option<String>,
}

/// Outcome of matching an extracted form against the registry
///
/// Fields are private so that `found` can only be true alongside a non-empty
/// URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    found: bool,
    form470_url: Option<String>,
    search_key: Option<String>,
    error: Option<String>,
}

impl MatchResult {
    /// A successful match
    ///
    /// An empty URL is downgraded to a failed match with "No URL in record".
    ///
    /// # Examples
    ///
    /// ```
    /// use formlink_domain::MatchResult;
    ///
    /// let result = MatchResult::found("123", "http://x/y.pdf");
    /// assert!(result.is_found());
    /// assert_eq!(result.form470_url(), Some("http://x/y.pdf"));
    ///
    /// let empty = MatchResult::found("123", "");
    /// assert!(!empty.is_found());
    /// assert_eq!(empty.error(), Some("No URL in record"));
    /// ```
    pub fn found(search_key: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        if url.trim().is_empty() {
            return Self::failed(Some(search_key.into()), "No URL in record");
        }
        Self {
            found: true,
            form470_url: Some(url),
            search_key: Some(search_key.into()),
            error: None,
        }
    }

    /// The registry answered but holds no matching record
    pub fn not_found(search_key: impl Into<String>) -> Self {
        Self {
            found: false,
            form470_url: None,
            search_key: Some(search_key.into()),
            error: None,
        }
    }

    /// The lookup could not produce an answer
    pub fn failed(search_key: Option<String>, error: impl Into<String>) -> Self {
        Self {
            found: false,
            form470_url: None,
            search_key,
            error: Some(error.into()),
        }
    }

    /// Whether a Form 470 with a document URL was found
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// URL of the matched Form 470
    pub fn form470_url(&self) -> Option<&str> {
        self.form470_url.as_deref()
    }

    /// Key the registry was queried with
    pub fn search_key(&self) -> Option<&str> {
        self.search_key.as_deref()
    }

    /// Diagnostic for failed lookups
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_has_no_error() {
        let result = MatchResult::not_found("42");
        assert!(!result.is_found());
        assert_eq!(result.search_key(), Some("42"));
        assert!(result.error().is_none());
        assert!(result.form470_url().is_none());
    }

    #[test]
    fn test_failed_keeps_search_key() {
        let result = MatchResult::failed(Some("42".into()), "API error: 500");
        assert!(!result.is_found());
        assert_eq!(result.search_key(), Some("42"));
        assert_eq!(result.error(), Some("API error: 500"));
    }

    #[test]
    fn test_whitespace_url_is_not_a_match() {
        let result = MatchResult::found("42", "   ");
        assert!(!result.is_found());
        assert!(result.form470_url().is_none());
    }
}
