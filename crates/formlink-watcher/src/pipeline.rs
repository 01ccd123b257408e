//! Per-item pipeline
//!
//! guard → start → locate → decode + extract → match → terminal transition.
//! Commands are applied after every transition, so an item that aborts half
//! way still shows where it stopped.
//!
//! The stage methods are public so other drivers can run the same stages;
//! every transition still goes through [`WorkflowMachine`].

use crate::error::WatcherError;
use crate::executor::{CommandExecutor, CommandFailure};
use crate::locator::{DocumentLocator, LocateError};
use crate::workflow::{Extraction, Transition, WorkflowMachine};
use formlink_domain::traits::{DocumentFetcher, Registry, TaskStore, TextDecoder};
use formlink_domain::{
    Document, ExtractedForm, MatchResult, WorkItem, WorkflowCategory, WorkflowOutcome,
};
use formlink_extractor::FieldExtractor;
use formlink_registry::RegistryMatcher;
use tracing::{debug, info, warn};

/// What happened to one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Task Store id
    pub item_id: String,
    /// Display name
    pub item_name: String,
    /// Terminal outcome; `None` when the item was skipped
    pub outcome: Option<WorkflowOutcome>,
    /// Why the guard refused the item
    pub skipped_reason: Option<String>,
    /// Commands the Task Store did not accept
    pub command_failures: Vec<CommandFailure>,
}

impl ItemReport {
    fn new(item: &WorkItem) -> Self {
        Self {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            outcome: None,
            skipped_reason: None,
            command_failures: Vec::new(),
        }
    }

    /// Whether the guard refused the item
    pub fn is_skipped(&self) -> bool {
        self.skipped_reason.is_some()
    }
}

/// Runs work items through the workflow
pub struct Pipeline<S, F, R, D> {
    store: S,
    locator: DocumentLocator<F>,
    extractor: FieldExtractor,
    decoder: D,
    matcher: RegistryMatcher<R>,
    executor: CommandExecutor,
}

impl<S, F, R, D> Pipeline<S, F, R, D>
where
    S: TaskStore,
    F: DocumentFetcher,
    R: Registry,
    D: TextDecoder,
{
    /// Assemble a pipeline
    pub fn new(
        store: S,
        locator: DocumentLocator<F>,
        extractor: FieldExtractor,
        decoder: D,
        matcher: RegistryMatcher<R>,
        executor: CommandExecutor,
    ) -> Self {
        Self {
            store,
            locator,
            extractor,
            decoder,
            matcher,
            executor,
        }
    }

    /// Get a reference to the Task Store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the command executor
    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Items waiting in the backlog category
    pub async fn backlog(&self) -> Result<Vec<WorkItem>, WatcherError> {
        let selector = self.executor.categories().selector(WorkflowCategory::Backlog);
        self.store
            .list_items_in_category(&selector)
            .await
            .map_err(|e| WatcherError::TaskStore(e.to_string()))
    }

    /// Why an item must not be processed again, if it must not
    pub fn skip_reason(&self, item: &WorkItem) -> Option<String> {
        if item.completed {
            return Some("already completed".to_string());
        }
        match item.category.as_deref() {
            Some(name) if self.executor.categories().is_terminal_name(name) => {
                Some(format!("already in '{}'", name))
            }
            _ => None,
        }
    }

    /// Locate and download the item's document
    pub async fn locate(&self, item: &WorkItem) -> Result<Document, LocateError> {
        self.locator.locate(item).await
    }

    /// Decode a document and extract its fields
    ///
    /// Undecodable documents count as extraction failure.
    pub fn extract(&self, document: &Document) -> Option<ExtractedForm> {
        match self.extractor.extract_bytes(&self.decoder, &document.bytes) {
            Ok(form) => form,
            Err(e) => {
                warn!("Could not decode {}: {}", document.source, e);
                None
            }
        }
    }

    /// Look the form up in the registry
    pub async fn match_form(&self, form: &ExtractedForm) -> MatchResult {
        self.matcher.match_form(form).await
    }

    /// Fetch an item by id and process it
    pub async fn process_by_id(&self, id: &str) -> Result<ItemReport, WatcherError> {
        let item = self
            .store
            .get_item(id)
            .await
            .map_err(|e| WatcherError::TaskStore(e.to_string()))?;
        self.process_item(&item).await
    }

    /// Run one item through the workflow
    pub async fn process_item(&self, item: &WorkItem) -> Result<ItemReport, WatcherError> {
        let mut report = ItemReport::new(item);

        if let Some(reason) = self.skip_reason(item) {
            info!("Skipping '{}' ({}): {}", item.name, item.id, reason);
            report.skipped_reason = Some(reason);
            return Ok(report);
        }

        info!("Processing '{}' ({})", item.name, item.id);
        let mut machine = WorkflowMachine::new();
        let started = machine.start()?;
        self.apply(&mut report, &started).await;

        let document = match self.locate(item).await {
            Ok(document) => document,
            Err(e) => {
                let transition = machine.on_locate_failed(&e)?;
                return Ok(self.finish(report, transition).await);
            }
        };

        let form = match machine.on_extracted(self.extract(&document))? {
            Extraction::Proceed(form) => form,
            Extraction::Rejected(transition) => return Ok(self.finish(report, transition).await),
        };
        debug!(
            "Item {} carries Form 471 {} (establishing 470: {:?})",
            item.id,
            form.application_number(),
            form.establishing_form470_number()
        );

        let result = self.match_form(&form).await;
        let transition = machine.on_matched(&form, &result)?;
        Ok(self.finish(report, transition).await)
    }

    async fn apply(&self, report: &mut ItemReport, transition: &Transition) {
        let failures = self
            .executor
            .apply(&self.store, &report.item_id, &transition.commands)
            .await;
        report.command_failures.extend(failures);
    }

    async fn finish(&self, mut report: ItemReport, transition: Transition) -> ItemReport {
        self.apply(&mut report, &transition).await;
        if let Some(outcome) = &transition.outcome {
            info!("'{}' ({}) → {}", report.item_name, report.item_id, outcome);
        }
        report.outcome = transition.outcome;
        report
    }
}
