//! Metrics collection for watcher runs

use crate::pipeline::ItemReport;
use formlink_domain::WorkflowOutcome;

/// Counters accumulated across ticks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatcherMetrics {
    /// Ticks started
    pub ticks: usize,

    /// Ticks aborted by an error
    pub failed_ticks: usize,

    /// Items that reached a terminal outcome
    pub items_processed: usize,

    /// Items linked to their Form 470
    pub completed: usize,

    /// Items handed to manual follow-up
    pub manual_followups: usize,

    /// Items moved to issues
    pub issues: usize,

    /// Items refused by the idempotency guard
    pub skipped: usize,

    /// Task Store commands that failed
    pub command_failures: usize,
}

impl WatcherMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick start
    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    /// Record a tick aborted by an error
    pub fn record_failed_tick(&mut self) {
        self.failed_ticks += 1;
    }

    /// Record the report of one item
    pub fn record_item(&mut self, report: &ItemReport) {
        self.command_failures += report.command_failures.len();
        match &report.outcome {
            Some(outcome) => {
                self.items_processed += 1;
                match outcome {
                    WorkflowOutcome::Completed { .. } => self.completed += 1,
                    WorkflowOutcome::ManualFollowup { .. } => self.manual_followups += 1,
                    WorkflowOutcome::Issues { .. } => self.issues += 1,
                }
            }
            None => self.skipped += 1,
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Watcher Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Ticks: {} ({} failed)", self.ticks, self.failed_ticks),
            format!("Items processed: {}", self.items_processed),
            format!("  Completed: {}", self.completed),
            format!("  Manual follow-up: {}", self.manual_followups),
            format!("  Issues: {}", self.issues),
            format!("Skipped: {}", self.skipped),
            format!("Command failures: {}", self.command_failures),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CommandFailure;

    fn report(outcome: Option<WorkflowOutcome>) -> ItemReport {
        ItemReport {
            item_id: "1".into(),
            item_name: "task".into(),
            skipped_reason: outcome.is_none().then(|| "already completed".to_string()),
            outcome,
            command_failures: Vec::new(),
        }
    }

    #[test]
    fn test_record_items() {
        let mut metrics = WatcherMetrics::new();
        metrics.record_tick();
        metrics.record_item(&report(Some(WorkflowOutcome::Issues { reason: "x".into() })));
        metrics.record_item(&report(Some(WorkflowOutcome::ManualFollowup { reason: "y".into() })));
        metrics.record_item(&report(None));

        let mut failed = report(Some(WorkflowOutcome::Completed {
            form470_url: "http://x/y.pdf".into(),
            reason: "found".into(),
        }));
        failed.command_failures.push(CommandFailure {
            command: "move".into(),
            error: "boom".into(),
        });
        metrics.record_item(&failed);

        assert_eq!(metrics.items_processed, 3);
        assert_eq!(metrics.completed, 1);
        assert_eq!(metrics.manual_followups, 1);
        assert_eq!(metrics.issues, 1);
        assert_eq!(metrics.skipped, 1);
        assert_eq!(metrics.command_failures, 1);
    }

    #[test]
    fn test_summary_and_reset() {
        let mut metrics = WatcherMetrics::new();
        metrics.record_tick();
        metrics.record_tick();
        metrics.record_failed_tick();

        let summary = metrics.summary();
        assert!(summary.contains("Ticks: 2 (1 failed)"));
        assert!(summary.contains("Skipped: 0"));

        metrics.reset();
        assert_eq!(metrics, WatcherMetrics::default());
    }
}
