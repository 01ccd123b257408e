//! Run command implementation.

use crate::error::Result;
use crate::output::Formatter;
use formlink_watcher::{LivePipeline, Watcher, WatcherConfig};

/// Execute the run command: one pass over the backlog.
pub async fn execute_run(config: &WatcherConfig, formatter: &Formatter) -> Result<()> {
    if config.dry_run {
        println!("{}", formatter.warning("Dry run: Task Store changes are only logged"));
    }

    let pipeline = LivePipeline::from_config(config)?;
    let mut watcher = Watcher::new(pipeline, config.poll_interval());

    let reports = watcher.run_once().await?;
    println!("{}", formatter.format_reports(&reports)?);
    println!("{}", formatter.info(&format!("{} item(s) handled", reports.len())));

    Ok(())
}
