//! Seed command implementation.
//!
//! Creates the three reference items used to exercise a live board: a
//! resolvable Form 471 URL, no document at all, and a URL that fails to
//! download.

use crate::error::Result;
use crate::output::Formatter;
use formlink_domain::traits::TaskStore;
use formlink_domain::{CategorySelector, WorkflowCategory};
use formlink_watcher::{asana_store, WatcherConfig};

/// Reference items as `(name, notes)`.
pub const SEED_ITEMS: [(&str, &str); 3] = [
    (
        "Test Form 471 with PDF URL",
        "This task contains a Form 471 PDF URL for testing.\n\nForm 471 URL: http://publicdata.usac.org/SL/Prd/Form471/332726/251043327/Original/USAC_FCC_FORM_471_APPLICATION_251043327_CERTIFIED.pdf",
    ),
    (
        "Test No PDF Available",
        "This task has no PDF attachments or URLs for testing the no-PDF scenario.",
    ),
    (
        "Test Invalid PDF URL",
        "This task has an invalid PDF URL for testing error handling.\n\nInvalid URL: http://example.com/invalid.pdf",
    ),
];

/// Execute the seed command against the configured board.
pub async fn execute_seed(config: &WatcherConfig, formatter: &Formatter) -> Result<()> {
    let store = asana_store(config)?;
    let backlog = config.categories.selector(WorkflowCategory::Backlog);

    if config.dry_run {
        for (name, _) in SEED_ITEMS {
            println!("{}", formatter.info(&format!("[DRY RUN] Would create '{}' in {}", name, backlog)));
        }
        return Ok(());
    }

    let created = seed(&store, &backlog, formatter).await;
    println!(
        "{}",
        formatter.info(&format!("{}/{} test items created", created, SEED_ITEMS.len()))
    );
    Ok(())
}

/// Create every reference item, reporting each one; returns how many were created
pub async fn seed<S: TaskStore>(store: &S, backlog: &CategorySelector, formatter: &Formatter) -> usize {
    let mut created = 0;
    for (name, notes) in SEED_ITEMS {
        match store.create_item_in_category(backlog, name, notes).await {
            Ok(id) => {
                created += 1;
                println!("{}", formatter.success(&format!("Created task: {} (ID: {})", name, id)));
            }
            Err(e) => println!("{}", formatter.error(&format!("Error creating '{}': {}", name, e))),
        }
    }
    created
}
