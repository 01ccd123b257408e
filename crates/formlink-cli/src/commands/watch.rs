//! Watch command implementation.

use crate::cli::WatchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use formlink_watcher::{LivePipeline, Watcher, WatcherConfig};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Execute the watch command until Ctrl-C or the requested cycle count.
pub async fn execute_watch(
    args: WatchArgs,
    config: &WatcherConfig,
    formatter: &Formatter,
) -> Result<()> {
    let interval = match args.interval {
        Some(0) => {
            return Err(CliError::InvalidInput(
                "Interval must be greater than 0 seconds".to_string(),
            ))
        }
        Some(secs) => Duration::from_secs(secs),
        None => config.poll_interval(),
    };

    let pipeline = LivePipeline::from_config(config)?;
    let mut watcher = Watcher::new(pipeline, interval);

    println!(
        "{}",
        formatter.info(&format!("Watching the backlog every {}s (Ctrl-C to stop)", interval.as_secs()))
    );

    match args.cycles {
        Some(cycles) => watcher.run_cycles(cycles).await,
        None => {
            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), trigger));
            watcher.run(cancel).await;
        }
    }

    println!("{}", formatter.success("Watcher stopped"));
    println!("{}", watcher.metrics().summary());
    Ok(())
}

/// Cancel `trigger` once `signal` fires
///
/// If the signal cannot be listened for, the watcher keeps running until killed.
async fn cancel_on_signal<F>(signal: F, trigger: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            tracing::info!("Interrupt received, stopping after the current tick");
            trigger.cancel();
        }
        Err(e) => {
            tracing::error!("Could not listen for Ctrl-C, watching until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
