//! Output formatting for the CLI.

use crate::cli::OutputFormat;
use crate::error::Result;
use formlink_domain::WorkItem;
use formlink_watcher::ItemReport;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the reports of one tick.
    pub fn format_reports(&self, reports: &[ItemReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_reports_json(reports),
            OutputFormat::Table => Ok(self.format_reports_table(reports)),
        }
    }

    /// Format a single report.
    pub fn format_report(&self, report: &ItemReport) -> Result<String> {
        self.format_reports(std::slice::from_ref(report))
    }

    fn format_reports_json(&self, reports: &[ItemReport]) -> Result<String> {
        let json_reports: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.item_id,
                    "name": r.item_name,
                    "outcome": outcome_label(r),
                    "reason": reason(r),
                    "command_failures": r
                        .command_failures
                        .iter()
                        .map(|f| f.to_string())
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_reports)?)
    }

    fn format_reports_table(&self, reports: &[ItemReport]) -> String {
        if reports.is_empty() {
            return self.colorize("No items in the backlog.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Outcome", "Reason", "Failed Commands"]);

        for report in reports {
            builder.push_record([
                report.item_id.clone(),
                report.item_name.clone(),
                outcome_label(report).to_string(),
                truncate(reason(report), 60),
                report.command_failures.len().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a work item with its attachments.
    pub fn format_item(&self, item: &WorkItem) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let attachments: Vec<serde_json::Value> = item
                    .attachments
                    .iter()
                    .map(|a| {
                        serde_json::json!({
                            "name": a.name,
                            "kind": a.kind,
                            "size": a.size,
                            "download_url": a.download_url,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "id": item.id,
                    "name": item.name,
                    "category": item.category,
                    "completed": item.completed,
                    "notes": item.notes,
                    "attachments": attachments,
                }))?)
            }
            OutputFormat::Table => Ok(self.format_item_table(item)),
        }
    }

    fn format_item_table(&self, item: &WorkItem) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["ID", item.id.as_str()]);
        builder.push_record(["Name", item.name.as_str()]);
        builder.push_record(["Category", item.category.as_deref().unwrap_or("-")]);
        builder.push_record(["Completed", if item.completed { "yes" } else { "no" }]);
        builder.push_record(["Notes", item.notes.as_str()]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        if item.attachments.is_empty() {
            out.push('\n');
            out.push_str(&self.colorize("No attachments.", "yellow"));
            return out;
        }

        let mut builder = Builder::default();
        builder.push_record(["Attachment", "Type", "Size", "PDF", "URL"]);
        for attachment in &item.attachments {
            builder.push_record([
                attachment.name.clone(),
                attachment.kind.clone().unwrap_or_default(),
                attachment.size.map(|s| s.to_string()).unwrap_or_default(),
                if attachment.is_pdf() { "yes" } else { "no" }.to_string(),
                attachment
                    .download_url
                    .as_deref()
                    .map(|u| truncate(u, 60))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        out.push('\n');
        out.push_str(&table.to_string());
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// One-line summary of a single processed item.
    pub fn report_line(&self, report: &ItemReport) -> String {
        let line = format!("{} ({}): {}", report.item_name, report.item_id, reason(report));
        match report.outcome.as_ref().map(|o| o.state().as_str()) {
            Some("completed") => self.success(&line),
            Some("manual_followup") => self.warning(&line),
            Some(_) => self.error(&line),
            None => self.info(&line),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn outcome_label(report: &ItemReport) -> &'static str {
    match &report.outcome {
        Some(outcome) => outcome.state().as_str(),
        None => "skipped",
    }
}

fn reason(report: &ItemReport) -> &str {
    match (&report.outcome, &report.skipped_reason) {
        (Some(outcome), _) => outcome.reason(),
        (None, Some(skipped)) => skipped,
        (None, None) => "",
    }
}

fn truncate(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() <= max {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formlink_domain::{Attachment, WorkflowOutcome};

    fn report(outcome: Option<WorkflowOutcome>, skipped: Option<&str>) -> ItemReport {
        ItemReport {
            item_id: "1201".to_string(),
            item_name: "Test Form 471 with PDF URL".to_string(),
            outcome,
            skipped_reason: skipped.map(str::to_string),
            command_failures: Vec::new(),
        }
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let reports = vec![
            report(
                Some(WorkflowOutcome::Issues { reason: "No PDF found".into() }),
                None,
            ),
            report(None, Some("already completed")),
        ];
        let output = formatter.format_reports(&reports).unwrap();
        assert!(output.contains("Outcome"));
        assert!(output.contains("issues"));
        assert!(output.contains("No PDF found"));
        assert!(output.contains("skipped"));
        assert!(output.contains("already completed"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let completed = report(
            Some(WorkflowOutcome::Completed {
                form470_url: "http://x/y.pdf".into(),
                reason: "Form 470 found and linked".into(),
            }),
            None,
        );
        let output = formatter.format_report(&completed).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["outcome"], "completed");
        assert_eq!(parsed[0]["id"], "1201");
    }

    #[test]
    fn test_empty_reports() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&[]).unwrap();
        assert!(output.contains("No items in the backlog"));
    }

    #[test]
    fn test_item_table_lists_attachments() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let item = WorkItem::new("1201", "Form 471")
            .in_category("QA")
            .with_attachment(Attachment {
                name: "form471.pdf".into(),
                download_url: Some("http://files/form471.pdf".into()),
                ..Default::default()
            });
        let output = formatter.format_item(&item).unwrap();
        assert!(output.contains("QA"));
        assert!(output.contains("form471.pdf"));
        assert!(output.contains("Attachment"));
    }

    #[test]
    fn test_item_without_attachments() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_item(&WorkItem::new("1", "bare")).unwrap();
        assert!(output.contains("No attachments."));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        let line = formatter.report_line(&report(None, Some("already in 'QA – Issues'")));
        assert_eq!(line, "ℹ Test Form 471 with PDF URL (1201): already in 'QA – Issues'");
    }

    #[test]
    fn test_truncate_keeps_first_line() {
        assert_eq!(truncate("Moved to Issues.\n\nIssue: x", 60), "Moved to Issues.");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
