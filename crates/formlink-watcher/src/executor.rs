//! Applies workflow commands to the Task Store
//!
//! Command failures never abort an item. Each one is logged and returned so
//! the caller can report it; a failed category move is additionally recorded
//! on the item as an audit note.

use crate::config::CategoryConfig;
use crate::workflow::TaskCommand;
use formlink_domain::traits::TaskStore;
use formlink_domain::WorkflowCategory;
use std::fmt;
use tracing::{debug, info, warn};

/// A command the Task Store did not accept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Short description of the command
    pub command: String,
    /// Error reported by the store
    pub error: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.command, self.error)
    }
}

/// Executes [`TaskCommand`]s against a store
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    categories: CategoryConfig,
    dry_run: bool,
}

impl CommandExecutor {
    /// Create an executor resolving categories through `categories`
    pub fn new(categories: CategoryConfig, dry_run: bool) -> Self {
        Self {
            categories,
            dry_run,
        }
    }

    /// Whether commands are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Category selectors in use
    pub fn categories(&self) -> &CategoryConfig {
        &self.categories
    }

    /// Apply commands in order, returning the ones that failed
    pub async fn apply<S>(
        &self,
        store: &S,
        item_id: &str,
        commands: &[TaskCommand],
    ) -> Vec<CommandFailure>
    where
        S: TaskStore,
    {
        let mut failures = Vec::new();
        for command in commands {
            if self.dry_run {
                info!("[DRY RUN] Would apply to {}: {}", item_id, describe(command));
                continue;
            }
            if let Err(failure) = self.apply_one(store, item_id, command).await {
                failures.push(failure);
            }
        }
        failures
    }

    async fn apply_one<S>(
        &self,
        store: &S,
        item_id: &str,
        command: &TaskCommand,
    ) -> Result<(), CommandFailure>
    where
        S: TaskStore,
    {
        let failed = |error: String| CommandFailure {
            command: describe(command),
            error,
        };

        match command {
            TaskCommand::MoveToCategory(category) => {
                let selector = self.categories.selector(*category);
                match store.move_item_to_category(item_id, &selector).await {
                    Ok(()) => {
                        debug!("Moved {} to {}", item_id, category);
                        Ok(())
                    }
                    Err(e) => {
                        let error = e.to_string();
                        warn!("Could not move {} to {}: {}", item_id, category, error);
                        self.record_failed_move(store, item_id, *category, &error)
                            .await;
                        Err(failed(error))
                    }
                }
            }
            TaskCommand::AddAuditNote(text) => store
                .add_audit_note(item_id, text)
                .await
                .map_err(|e| {
                    warn!("Could not add audit note to {}: {}", item_id, e);
                    failed(e.to_string())
                }),
            TaskCommand::SetCompleted(completed) => store
                .set_completed(item_id, *completed)
                .await
                .map_err(|e| {
                    warn!("Could not update completion of {}: {}", item_id, e);
                    failed(e.to_string())
                }),
            TaskCommand::CreateChildRecord(record) => {
                match store.create_child_record(item_id, record).await {
                    Ok(child_id) => {
                        info!("Created child record {} under {}", child_id, item_id);
                        Ok(())
                    }
                    Err(e) => {
                        warn!("Could not create child record under {}: {}", item_id, e);
                        Err(failed(e.to_string()))
                    }
                }
            }
        }
    }

    async fn record_failed_move<S>(
        &self,
        store: &S,
        item_id: &str,
        category: WorkflowCategory,
        error: &str,
    ) where
        S: TaskStore,
    {
        let note = format!(
            "Task should now be in {} but could not be moved there ({}).",
            category, error
        );
        if let Err(e) = store.add_audit_note(item_id, &note).await {
            warn!("Could not record failed move on {}: {}", item_id, e);
        }
    }
}

fn describe(command: &TaskCommand) -> String {
    match command {
        TaskCommand::MoveToCategory(category) => format!("move to {}", category),
        TaskCommand::AddAuditNote(text) => {
            let first_line = text.lines().next().unwrap_or_default();
            format!("add note '{}'", first_line)
        }
        TaskCommand::SetCompleted(completed) => format!("set completed = {}", completed),
        TaskCommand::CreateChildRecord(record) => format!("create child '{}'", record.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formlink_domain::{ChildRecord, WorkItem};
    use formlink_tasks::InMemoryTaskStore;

    fn store() -> InMemoryTaskStore {
        let store = InMemoryTaskStore::with_categories(["QA", "QA – Processing", "QA – Issues"]);
        store.insert(WorkItem::new("1", "task").in_category("QA"));
        store
    }

    fn commands() -> Vec<TaskCommand> {
        vec![
            TaskCommand::MoveToCategory(WorkflowCategory::Issues),
            TaskCommand::AddAuditNote("Moved to Issues.\n\nIssue: No PDF found".into()),
        ]
    }

    #[tokio::test]
    async fn test_applies_in_order() {
        let store = store();
        let executor = CommandExecutor::new(CategoryConfig::default(), false);

        let failures = executor.apply(&store, "1", &commands()).await;

        assert!(failures.is_empty());
        assert_eq!(store.item("1").unwrap().category.as_deref(), Some("QA – Issues"));
        assert_eq!(store.notes("1").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_move_falls_back_to_note() {
        let store = store();
        store.fail_moves(true);
        let executor = CommandExecutor::new(CategoryConfig::default(), false);

        let failures = executor.apply(&store, "1", &commands()).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].command, "move to Issues");
        let notes = store.notes("1");
        assert_eq!(notes.len(), 2);
        assert!(notes[0].contains("could not be moved"));
        assert!(notes[1].contains("No PDF found"));
    }

    #[tokio::test]
    async fn test_missing_category_is_degraded_not_fatal() {
        let store = store();
        let executor = CommandExecutor::new(CategoryConfig::default(), false);
        let commands = vec![
            TaskCommand::MoveToCategory(WorkflowCategory::ManualFollowup),
            TaskCommand::CreateChildRecord(ChildRecord { name: "review".into(), notes: String::new() }),
        ];

        let failures = executor.apply(&store, "1", &commands).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(store.children("1").len(), 1);
        assert_eq!(store.item("1").unwrap().category.as_deref(), Some("QA"));
    }

    #[tokio::test]
    async fn test_dry_run_changes_nothing() {
        let store = store();
        let executor = CommandExecutor::new(CategoryConfig::default(), true);
        let mut commands = commands();
        commands.push(TaskCommand::SetCompleted(true));

        let failures = executor.apply(&store, "1", &commands).await;

        assert!(failures.is_empty());
        let item = store.item("1").unwrap();
        assert_eq!(item.category.as_deref(), Some("QA"));
        assert!(!item.completed);
        assert!(store.notes("1").is_empty());
    }
}
