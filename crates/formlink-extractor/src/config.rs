//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Configuration for the Field Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum text length (bytes) scanned by the rules; longer text is truncated
    pub max_text_length: usize,

    /// Treat the bare digits "471" / "470" anywhere in the text as a form marker
    ///
    /// Matches historical behaviour; it misclassifies documents that merely
    /// contain those digits, so it can be turned off to require "Form 471" /
    /// "Form 470".
    pub bare_digit_markers: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: 2_000_000,
            bare_digit_markers: true,
        }
    }
}

impl ExtractorConfig {
    /// Strict preset: only explicit "Form 471" / "Form 470" markers classify a filing
    pub fn strict() -> Self {
        Self {
            bare_digit_markers: false,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.bare_digit_markers);
    }

    #[test]
    fn test_strict_config() {
        let config = ExtractorConfig::strict();
        assert!(config.validate().is_ok());
        assert!(!config.bare_digit_markers);
    }

    #[test]
    fn test_invalid_max_text_length() {
        let config = ExtractorConfig {
            max_text_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_missing_marker_flag_defaults_on() {
        let config = ExtractorConfig::from_toml("max_text_length = 1000").unwrap();
        assert_eq!(config.max_text_length, 1000);
        assert!(config.bare_digit_markers);
    }

    #[test]
    fn test_toml_partial_table_keeps_length_default() {
        let config = ExtractorConfig::from_toml("bare_digit_markers = false").unwrap();
        assert_eq!(config.max_text_length, ExtractorConfig::default().max_text_length);
        assert!(!config.bare_digit_markers);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config.max_text_length, parsed.max_text_length);
        assert_eq!(config.bare_digit_markers, parsed.bare_digit_markers);
    }
}
