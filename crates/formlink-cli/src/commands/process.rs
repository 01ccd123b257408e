//! Process command implementation.

use crate::cli::ItemArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use formlink_watcher::{LivePipeline, WatcherConfig};

/// Execute the process command for a single work item.
pub async fn execute_process(
    args: ItemArgs,
    config: &WatcherConfig,
    formatter: &Formatter,
) -> Result<()> {
    let id = args.id.trim();
    if id.is_empty() {
        return Err(CliError::InvalidInput("Work item id must not be empty".to_string()));
    }

    let pipeline = LivePipeline::from_config(config)?;
    let report = pipeline.process_by_id(id).await?;

    println!("{}", formatter.report_line(&report));
    for failure in &report.command_failures {
        println!("{}", formatter.warning(&failure.to_string()));
    }

    Ok(())
}
