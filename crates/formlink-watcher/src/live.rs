//! Production wiring: Asana, HTTP downloads, USAC Open Data, pdf-extract

use crate::config::WatcherConfig;
use crate::error::WatcherError;
use crate::executor::CommandExecutor;
use crate::locator::{DocumentLocator, HttpFetcher};
use crate::pipeline::Pipeline;
use formlink_extractor::{FieldExtractor, PdfTextDecoder};
use formlink_registry::usac::DEFAULT_ENDPOINT;
use formlink_registry::{RegistryMatcher, UsacRegistry};
use formlink_tasks::{AsanaTaskStore, DEFAULT_BASE_URL};

/// Pipeline against the real external services
pub type LivePipeline = Pipeline<AsanaTaskStore, HttpFetcher, UsacRegistry, PdfTextDecoder>;

/// Build the Asana Task Store described by `config`
pub fn asana_store(config: &WatcherConfig) -> Result<AsanaTaskStore, WatcherError> {
    config.validate()?;
    let asana = &config.asana;
    AsanaTaskStore::new(
        asana.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
        asana.access_token.as_deref().unwrap_or_default(),
        asana.project_id.as_deref().unwrap_or_default(),
        config.http_timeout(),
    )
    .map_err(|e| WatcherError::Setup(e.to_string()))
}

impl LivePipeline {
    /// Assemble the production pipeline from configuration
    pub fn from_config(config: &WatcherConfig) -> Result<Self, WatcherError> {
        let store = asana_store(config)?;

        let fetcher =
            HttpFetcher::new(config.http_timeout()).map_err(|e| WatcherError::Setup(e.to_string()))?;

        let mut registry = UsacRegistry::new(
            config.registry.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
            config.http_timeout(),
        )
        .map_err(|e| WatcherError::Setup(e.to_string()))?;
        if let Some(token) = &config.registry.app_token {
            registry = registry.with_app_token(token);
        }

        let extractor = FieldExtractor::new(config.extractor.clone())
            .map_err(|e| WatcherError::Setup(e.to_string()))?;

        Ok(Pipeline::new(
            store,
            DocumentLocator::new(fetcher, &config.storage_dir),
            extractor,
            PdfTextDecoder,
            RegistryMatcher::new(registry),
            CommandExecutor::new(config.categories.clone(), config.dry_run),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_live_pipeline_requires_credentials() {
        let result = LivePipeline::from_config(&WatcherConfig::default());
        assert!(matches!(
            result,
            Err(WatcherError::Config(ConfigError::MissingField(_)))
        ));
    }

    #[test]
    fn test_live_pipeline_from_valid_config() {
        let mut config = WatcherConfig::default();
        config.asana.access_token = Some("tok".into());
        config.asana.project_id = Some("900".into());
        config.dry_run = true;

        let pipeline = LivePipeline::from_config(&config).unwrap();
        assert!(pipeline.executor().is_dry_run());
        assert_eq!(pipeline.store().project_id(), "900");
    }
}
