//! End-to-end tests for the Field Extractor

#[cfg(test)]
mod tests {
    use crate::{FieldExtractor, Utf8TextDecoder};
    use formlink_domain::FormType;
    use proptest::prelude::*;

    const CERTIFIED_471: &str = "\
USAC FCC FORM 471 APPLICATION
Funding Year: 2025
Application Number: 251043327
Billed Entity Name: Springfield Unified School District
Billed Entity Number: 123456
Establishing FCC Form 470: 250001122
Category of Service: Category 1
";

    #[test]
    fn test_certified_471_document() {
        let form = FieldExtractor::default().extract(CERTIFIED_471).unwrap();

        assert_eq!(form.form_type(), FormType::Form471);
        assert_eq!(form.application_number(), "251043327");
        assert_eq!(form.billed_entity_name(), "Springfield Unified School District");
        assert_eq!(form.establishing_form470_number(), Some("250001122"));
    }

    #[test]
    fn test_application_number_and_form_marker() {
        let text = "Form 471 summary\nApplication Number: 251043327";
        let form = FieldExtractor::default().extract(text).unwrap();
        assert_eq!(form.form_type(), FormType::Form471);
        assert_eq!(form.application_number(), "251043327");
    }

    #[test]
    fn test_fifteen_digit_establishing_number() {
        let text = "Form 471\nApplication Number: 251043327\nEstablishing FCC Form 470: 123456789012345";
        let form = FieldExtractor::default().extract(text).unwrap();
        assert_eq!(form.establishing_form470_number(), Some("123456789012345"));
    }

    #[test]
    fn test_fallback_nine_digit_application_number() {
        let text = "FCC Form 471 receipt for 251043327 (certified)";
        let form = FieldExtractor::default().extract(text).unwrap();
        assert_eq!(form.application_number(), "251043327");
    }

    #[test]
    fn test_label_followed_by_newline_reads_next_line() {
        let text = "Form 471\nApplication Number:\n251043327\nBilled Entity Name:\nLincoln County Library";
        let form = FieldExtractor::default().extract(text).unwrap();
        assert_eq!(form.application_number(), "251043327");
        assert_eq!(form.billed_entity_name(), "Lincoln County Library");
    }

    #[test]
    fn test_non_ascii_digits_in_label_fall_through_to_ascii_run() {
        // Arabic-Indic digits after the label are not an application number
        let text = "Form 471\nApplication Number: \u{0662}\u{0665}\u{0661}\nReceipt 251043327";
        let form = FieldExtractor::default().extract(text).unwrap();
        assert_eq!(form.application_number(), "251043327");
    }

    #[test]
    fn test_only_non_ascii_digits_yields_nothing() {
        let text = "Form 471\nApplication Number: \u{0662}\u{0665}\u{0661}\u{0660}\u{0664}\u{0663}\u{0663}\u{0662}\u{0667}";
        assert!(FieldExtractor::default().extract(text).is_none());
    }

    #[test]
    fn test_extract_bytes_through_decoder() {
        let form = FieldExtractor::default()
            .extract_bytes(&Utf8TextDecoder, CERTIFIED_471.as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(form.application_number(), "251043327");
    }

    proptest! {
        #[test]
        fn prop_labelled_application_number_is_extracted(n in 100_000_000u64..1_000_000_000u64) {
            let text = format!("FCC Form 471\nApplication Number: {}\n", n);
            let form = FieldExtractor::default().extract(&text).unwrap();
            prop_assert_eq!(form.application_number(), n.to_string());
            prop_assert_eq!(form.form_type(), FormType::Form471);
        }

        #[test]
        fn prop_text_without_digits_yields_nothing(text in "[a-zA-Z :\n]{0,200}") {
            prop_assert!(FieldExtractor::default().extract(&text).is_none());
        }
    }
}
