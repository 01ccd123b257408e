//! Show command implementation.

use crate::cli::ItemArgs;
use crate::error::Result;
use crate::output::Formatter;
use formlink_domain::traits::TaskStore;
use formlink_watcher::{asana_store, WatcherConfig};

/// Execute the show command.
pub async fn execute_show(
    args: ItemArgs,
    config: &WatcherConfig,
    formatter: &Formatter,
) -> Result<()> {
    let store = asana_store(config)?;
    let item = store.get_item(args.id.trim()).await?;
    println!("{}", formatter.format_item(&item)?);
    Ok(())
}
