//! Extracted form records

use std::fmt;

/// Entity name used when a filing does not carry a "Billed Entity Name"
pub const UNKNOWN_ENTITY: &str = "Unknown";

/// Filing type detected in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormType {
    /// FCC Form 471 (funding request)
    Form471,

    /// FCC Form 470 (competitive bidding)
    Form470,

    /// Neither marker found
    Unknown,
}

impl FormType {
    /// Short code used in audit notes and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Form471 => "471",
            FormType::Form470 => "470",
            FormType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifying fields parsed from a filing
///
/// A record only exists once an application number has been found, so every
/// `ExtractedForm` carries `application_number` and `form_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedForm {
    application_number: String,
    form_type: FormType,
    billed_entity_name: String,
    establishing_form470_number: Option<String>,
}

impl ExtractedForm {
    /// Create a record from a required application number
    ///
    /// Returns `None` unless the application number is a non-empty run of
    /// ASCII digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use formlink_domain::{ExtractedForm, FormType};
    ///
    /// let form = ExtractedForm::new("251043327", FormType::Form471).unwrap();
    /// assert_eq!(form.billed_entity_name(), "Unknown");
    /// assert!(ExtractedForm::new("", FormType::Form471).is_none());
    /// assert!(ExtractedForm::new("ABC-12", FormType::Form471).is_none());
    /// ```
    pub fn new(application_number: impl Into<String>, form_type: FormType) -> Option<Self> {
        let application_number = application_number.into();
        if application_number.is_empty() || !application_number.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            application_number,
            form_type,
            billed_entity_name: UNKNOWN_ENTITY.to_string(),
            establishing_form470_number: None,
        })
    }

    /// Set the billed entity name; blank names keep the "Unknown" default
    pub fn with_billed_entity_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            self.billed_entity_name = trimmed.to_string();
        }
        self
    }

    /// Set the establishing Form 470 number
    ///
    /// Ignored unless the record is a Form 471, the only filing that cites one.
    pub fn with_establishing_form470_number(mut self, number: impl Into<String>) -> Self {
        if self.form_type == FormType::Form471 {
            let number = number.into();
            if !number.is_empty() {
                self.establishing_form470_number = Some(number);
            }
        }
        self
    }

    /// Application number of the filing itself
    pub fn application_number(&self) -> &str {
        &self.application_number
    }

    /// Detected filing type
    pub fn form_type(&self) -> FormType {
        self.form_type
    }

    /// Billed entity name, "Unknown" when absent
    pub fn billed_entity_name(&self) -> &str {
        &self.billed_entity_name
    }

    /// Establishing Form 470 number cited by a Form 471
    pub fn establishing_form470_number(&self) -> Option<&str> {
        self.establishing_form470_number.as_deref()
    }

    /// Whether the record is a Form 471
    pub fn is_form471(&self) -> bool {
        self.form_type == FormType::Form471
    }
}
