//! Prioritized extraction rules
//!
//! Each field is read through a [`RuleChain`]: an ordered list of patterns
//! tried from the most specific to the loosest. The first rule that matches
//! wins and the chain reports which rule produced the value.

use regex::Regex;
use std::sync::LazyLock;

/// Form field a rule extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// The filing's own application number
    ApplicationNumber,
    /// Name of the billed entity
    BilledEntityName,
    /// Form 470 number cited by a Form 471
    EstablishingForm470Number,
}

/// A single pattern that can yield a field value
///
/// The pattern's first capture group is the value.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    /// Rule name used in logs
    pub name: &'static str,
    /// Field the rule targets
    pub field: FormField,
    /// Lower runs first
    pub priority: u8,
    /// Pattern with one capture group
    pub pattern: Regex,
}

impl ExtractionRule {
    /// Create a rule from an already compiled pattern
    pub fn new(name: &'static str, field: FormField, priority: u8, pattern: Regex) -> Self {
        Self {
            name,
            field,
            priority,
            pattern,
        }
    }

    /// First capture of this rule in `text`, trimmed, if non-empty
    pub fn apply(&self, text: &str) -> Option<String> {
        let captures = self.pattern.captures(text)?;
        let value = captures.get(1)?.as_str().trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// A value produced by a rule chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Name of the rule that matched
    pub rule: &'static str,
    /// Extracted value
    pub value: String,
}

/// Rules for one field, evaluated in priority order
#[derive(Debug, Clone)]
pub struct RuleChain {
    field: FormField,
    rules: Vec<ExtractionRule>,
}

impl RuleChain {
    /// Build a chain; rules for other fields are dropped and the rest sorted by priority
    pub fn new(field: FormField, rules: Vec<ExtractionRule>) -> Self {
        let mut rules: Vec<ExtractionRule> =
            rules.into_iter().filter(|r| r.field == field).collect();
        rules.sort_by_key(|r| r.priority);
        Self { field, rules }
    }

    /// Field this chain extracts
    pub fn field(&self) -> FormField {
        self.field
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// First match in priority order
    pub fn first_match(&self, text: &str) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| {
            rule.apply(text).map(|value| RuleMatch {
                rule: rule.name,
                value,
            })
        })
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in extraction pattern must compile")
}

/// Application number: labelled field, then any standalone 9-digit run
pub static APPLICATION_NUMBER_CHAIN: LazyLock<RuleChain> = LazyLock::new(|| {
    RuleChain::new(
        FormField::ApplicationNumber,
        vec![
            ExtractionRule::new(
                "labelled_application_number",
                FormField::ApplicationNumber,
                0,
                compile(r"(?i)Application Number[:\s]*([0-9]+)"),
            ),
            ExtractionRule::new(
                "nine_digit_run",
                FormField::ApplicationNumber,
                1,
                compile(r"\b([0-9]{9})\b"),
            ),
        ],
    )
});

/// Billed entity name: rest of the labelled line
pub static BILLED_ENTITY_CHAIN: LazyLock<RuleChain> = LazyLock::new(|| {
    RuleChain::new(
        FormField::BilledEntityName,
        vec![ExtractionRule::new(
            "labelled_billed_entity",
            FormField::BilledEntityName,
            0,
            compile(r"(?i)Billed Entity Name[:\s]*([^\n]+)"),
        )],
    )
});

/// Establishing Form 470 number: exact label, loose label, then any 15-digit run
pub static ESTABLISHING_FORM470_CHAIN: LazyLock<RuleChain> = LazyLock::new(|| {
    RuleChain::new(
        FormField::EstablishingForm470Number,
        vec![
            ExtractionRule::new(
                "labelled_establishing_fcc_form470",
                FormField::EstablishingForm470Number,
                0,
                compile(r"(?i)Establishing FCC Form 470[:\s]*([0-9]+)"),
            ),
            ExtractionRule::new(
                "loose_establishing_form470",
                FormField::EstablishingForm470Number,
                1,
                compile(r"(?i)Establishing.*Form 470[:\s]*([0-9]+)"),
            ),
            ExtractionRule::new(
                "fifteen_digit_run",
                FormField::EstablishingForm470Number,
                2,
                compile(r"\b([0-9]{15})\b"),
            ),
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_sorts_by_priority() {
        let chain = RuleChain::new(
            FormField::ApplicationNumber,
            vec![
                ExtractionRule::new("loose", FormField::ApplicationNumber, 5, compile(r"(\d+)")),
                ExtractionRule::new("strict", FormField::ApplicationNumber, 1, compile(r"No\.(\d+)")),
            ],
        );
        let names: Vec<_> = chain.rules().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["strict", "loose"]);

        let hit = chain.first_match("ref 77 No.12").unwrap();
        assert_eq!(hit.rule, "strict");
        assert_eq!(hit.value, "12");
    }

    #[test]
    fn test_chain_drops_rules_for_other_fields() {
        let chain = RuleChain::new(
            FormField::BilledEntityName,
            vec![ExtractionRule::new("digits", FormField::ApplicationNumber, 0, compile(r"(\d+)"))],
        );
        assert!(chain.rules().is_empty());
        assert!(chain.first_match("123").is_none());
    }

    #[test]
    fn test_application_number_label_beats_nine_digits() {
        let text = "Ref 999999999\nApplication Number: 251043327";
        let hit = APPLICATION_NUMBER_CHAIN.first_match(text).unwrap();
        assert_eq!(hit.rule, "labelled_application_number");
        assert_eq!(hit.value, "251043327");
    }

    #[test]
    fn test_nine_digit_run_must_be_standalone() {
        assert!(APPLICATION_NUMBER_CHAIN.first_match("id 1234567890").is_none());
        let hit = APPLICATION_NUMBER_CHAIN.first_match("id 123456789.").unwrap();
        assert_eq!(hit.rule, "nine_digit_run");
        assert_eq!(hit.value, "123456789");
    }

    #[test]
    fn test_billed_entity_takes_rest_of_line() {
        let hit = BILLED_ENTITY_CHAIN
            .first_match("Billed Entity Name: Springfield School District  \nNext: x")
            .unwrap();
        assert_eq!(hit.value, "Springfield School District");
    }

    #[test]
    fn test_establishing_tiers() {
        let exact = ESTABLISHING_FORM470_CHAIN
            .first_match("Establishing FCC Form 470: 230001234")
            .unwrap();
        assert_eq!(exact.rule, "labelled_establishing_fcc_form470");
        assert_eq!(exact.value, "230001234");

        let loose = ESTABLISHING_FORM470_CHAIN
            .first_match("ESTABLISHING the Form 470 230005678")
            .unwrap();
        assert_eq!(loose.rule, "loose_establishing_form470");
        assert_eq!(loose.value, "230005678");

        let run = ESTABLISHING_FORM470_CHAIN
            .first_match("cited 123456789012345 elsewhere")
            .unwrap();
        assert_eq!(run.rule, "fifteen_digit_run");
    }
}
