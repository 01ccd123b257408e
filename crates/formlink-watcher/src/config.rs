//! Configuration for the watcher
//!
//! Loaded from an optional TOML file, then overridden from the environment.

use formlink_domain::{CategorySelector, WorkflowCategory};
use formlink_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Asana connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AsanaSettings {
    /// Personal access token
    pub access_token: Option<String>,

    /// Project whose sections hold the workflow
    pub project_id: Option<String>,

    /// API root, defaults to the public Asana API
    pub base_url: Option<String>,
}

/// Registry settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Dataset endpoint, defaults to the public Form 470 dataset
    pub endpoint: Option<String>,

    /// Socrata app token
    pub app_token: Option<String>,
}

/// TOML form of a [`CategorySelector`]
///
/// ```toml
/// backlog = { exact = "QA" }
/// processing = { keywords = ["qa", "processing"] }
/// issues = { id = "1203456789" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorConfig {
    /// Stable category identifier
    Id(String),
    /// Case-insensitive full name
    Exact(String),
    /// Case-insensitive name fragments, all required
    Keywords(Vec<String>),
}

impl From<&SelectorConfig> for CategorySelector {
    fn from(config: &SelectorConfig) -> Self {
        match config {
            SelectorConfig::Id(id) => CategorySelector::Id(id.clone()),
            SelectorConfig::Exact(name) => CategorySelector::Exact(name.clone()),
            SelectorConfig::Keywords(keywords) => CategorySelector::Keywords(keywords.clone()),
        }
    }
}

/// Where each workflow category lives in the Task Store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Items awaiting processing
    pub backlog: SelectorConfig,
    /// Items being processed
    pub processing: SelectorConfig,
    /// Items needing manual follow-up
    pub manual_followup: SelectorConfig,
    /// Items with issues
    pub issues: SelectorConfig,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let keywords = |words: &[&str]| {
            SelectorConfig::Keywords(words.iter().map(|w| w.to_string()).collect())
        };
        Self {
            backlog: SelectorConfig::Exact("qa".to_string()),
            processing: keywords(&["qa", "processing"]),
            manual_followup: keywords(&["qa", "manual follow-up"]),
            issues: keywords(&["qa", "issues"]),
        }
    }
}

impl CategoryConfig {
    /// Selector for a workflow category
    pub fn selector(&self, category: WorkflowCategory) -> CategorySelector {
        let config = match category {
            WorkflowCategory::Backlog => &self.backlog,
            WorkflowCategory::Processing => &self.processing,
            WorkflowCategory::ManualFollowup => &self.manual_followup,
            WorkflowCategory::Issues => &self.issues,
        };
        config.into()
    }

    /// Whether a category name is one of the terminal categories
    pub fn is_terminal_name(&self, name: &str) -> bool {
        [WorkflowCategory::ManualFollowup, WorkflowCategory::Issues]
            .into_iter()
            .any(|c| self.selector(c).matches_name(name))
    }
}

/// Configuration for the watcher service
///
/// # Examples
///
/// ```
/// use formlink_watcher::WatcherConfig;
/// use std::time::Duration;
///
/// let config = WatcherConfig::default();
/// assert_eq!(config.poll_interval(), Duration::from_secs(60));
/// assert!(!config.dry_run);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Pause between the end of one tick and the start of the next
    pub poll_interval_secs: u64,

    /// Directory downloaded documents are written to
    pub storage_dir: PathBuf,

    /// Timeout for every outbound HTTP request
    pub http_timeout_secs: u64,

    /// Log commands instead of applying them
    pub dry_run: bool,

    /// Task Store connection
    pub asana: AsanaSettings,

    /// Registry connection
    pub registry: RegistrySettings,

    /// Category selectors
    pub categories: CategoryConfig,

    /// Field Extractor tuning
    pub extractor: ExtractorConfig,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            storage_dir: std::env::temp_dir().join("formlink_pdfs"),
            http_timeout_secs: 30,
            dry_run: false,
            asana: AsanaSettings::default(),
            registry: RegistrySettings::default(),
            categories: CategoryConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl WatcherConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    ///
    /// Recognized keys: `ASANA_API_KEY`, `ASANA_PROJECT_ID`,
    /// `TEMP_DOWNLOAD_DIR`, `USAC_APP_TOKEN`, `FORMLINK_POLL_INTERVAL_SECS`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = lookup("ASANA_API_KEY") {
            self.asana.access_token = Some(token);
        }
        if let Some(project) = lookup("ASANA_PROJECT_ID") {
            self.asana.project_id = Some(project);
        }
        if let Some(dir) = lookup("TEMP_DOWNLOAD_DIR") {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(token) = lookup("USAC_APP_TOKEN") {
            self.registry.app_token = Some(token);
        }
        if let Some(interval) = lookup("FORMLINK_POLL_INTERVAL_SECS") {
            self.poll_interval_secs =
                interval.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: "poll_interval_secs".to_string(),
                    reason: format!("'{}' is not a number of seconds", interval),
                })?;
        }
        Ok(())
    }

    /// Check that the configuration can drive a live watcher
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asana.access_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(ConfigError::MissingField("asana.access_token".to_string()));
        }
        if self.asana.project_id.as_deref().map_or(true, |p| p.trim().is_empty()) {
            return Err(ConfigError::MissingField("asana.project_id".to_string()));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http_timeout_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        self.extractor
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "extractor".to_string(),
                reason,
            })
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = WatcherConfig::default();
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(config.storage_dir.ends_with("formlink_pdfs"));
        assert_eq!(
            config.categories.selector(WorkflowCategory::Backlog),
            CategorySelector::Exact("qa".into())
        );
    }

    #[test]
    fn test_default_selectors_match_board_names() {
        let categories = CategoryConfig::default();
        assert!(categories
            .selector(WorkflowCategory::ManualFollowup)
            .matches_name("QA – Manual Follow-up Required"));
        assert!(categories.is_terminal_name("QA – Issues"));
        assert!(!categories.is_terminal_name("QA"));
        assert!(!categories.is_terminal_name("QA – Processing"));
    }

    #[test]
    fn test_parse_toml_with_selectors() {
        let toml = r#"
            poll_interval_secs = 15
            dry_run = true

            [asana]
            access_token = "tok"
            project_id = "900"

            [categories]
            backlog = { id = "1203" }
            issues = { keywords = ["review", "issues"] }
        "#;
        let config = WatcherConfig::from_toml(toml).unwrap();
        assert_eq!(config.poll_interval_secs, 15);
        assert!(config.dry_run);
        assert_eq!(
            config.categories.selector(WorkflowCategory::Backlog),
            CategorySelector::Id("1203".into())
        );
        assert_eq!(
            config.categories.selector(WorkflowCategory::Processing),
            CategorySelector::keywords(["qa", "processing"])
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_extractor_table() {
        let config = WatcherConfig::from_toml("[extractor]\nbare_digit_markers = false\n").unwrap();
        assert!(!config.extractor.bare_digit_markers);
        assert_eq!(config.extractor.max_text_length, 2_000_000);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = WatcherConfig::default();
        config
            .apply_overrides(env(&[
                ("ASANA_API_KEY", "secret"),
                ("ASANA_PROJECT_ID", "900"),
                ("TEMP_DOWNLOAD_DIR", "/var/tmp/pdfs"),
                ("USAC_APP_TOKEN", ""),
                ("FORMLINK_POLL_INTERVAL_SECS", "5"),
            ]))
            .unwrap();

        assert_eq!(config.asana.access_token.as_deref(), Some("secret"));
        assert_eq!(config.storage_dir, PathBuf::from("/var/tmp/pdfs"));
        assert!(config.registry.app_token.is_none());
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_bad_interval_override() {
        let mut config = WatcherConfig::default();
        let result = config.apply_overrides(env(&[("FORMLINK_POLL_INTERVAL_SECS", "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_requires_credentials() {
        let mut config = WatcherConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(f)) if f == "asana.access_token"));

        config.asana.access_token = Some("tok".into());
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(f)) if f == "asana.project_id"));

        config.asana.project_id = Some("900".into());
        config.poll_interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "http_timeout_secs = 10\n").unwrap();

        let config = WatcherConfig::from_file(&path).unwrap();
        assert_eq!(config.http_timeout_secs, 10);
        assert!(WatcherConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
