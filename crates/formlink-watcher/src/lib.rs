//! Formlink Watcher
//!
//! Drives Form 471 work items through the review workflow: locate the
//! document, extract its fields, match the Form 470 in the registry and move
//! the item to its terminal category.
//!
//! # Architecture
//!
//! | Module | Role |
//! |--------|------|
//! | `locator` | Picks and downloads the item's PDF, keeps a local copy |
//! | `workflow` | State machine producing transitions and Task Store commands |
//! | `executor` | Applies commands, degrading failed moves to audit notes |
//! | `pipeline` | Runs one item through every stage |
//! | `worker` | Polls the backlog on an interval until cancelled |
//! | `config` | TOML + environment configuration |
//!
//! ```text
//! New ──▶ Processing ──┬─▶ Completed        (Form 470 linked)
//!                      ├─▶ ManualFollowup   (no Form 470, review subtask)
//!                      └─▶ Issues           (no PDF, bad download, not a 471)
//! ```
//!
//! # Usage
//!
//! ## One item
//!
//! ```no_run
//! use formlink_watcher::{LivePipeline, WatcherConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = WatcherConfig::default();
//! config.apply_env()?;
//! let pipeline = LivePipeline::from_config(&config)?;
//!
//! let report = pipeline.process_by_id("1209876543210").await?;
//! println!("{:?}", report.outcome);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! poll_interval_secs = 60
//! http_timeout_secs = 30
//! dry_run = false
//!
//! [asana]
//! project_id = "1209876543210"
//!
//! [categories]
//! backlog = { exact = "QA" }
//! manual_followup = { keywords = ["qa", "manual follow-up"] }
//! ```

#![warn(missing_docs)]

pub mod config;
mod error;
pub mod executor;
mod live;
pub mod locator;
mod metrics;
pub mod pipeline;
mod worker;
pub mod workflow;

pub use config::{CategoryConfig, ConfigError, WatcherConfig};
pub use error::WatcherError;
pub use executor::{CommandExecutor, CommandFailure};
pub use live::{asana_store, LivePipeline};
pub use locator::{DocumentLocator, HttpFetcher, LocateError};
pub use metrics::WatcherMetrics;
pub use pipeline::{ItemReport, Pipeline};
pub use worker::Watcher;
pub use workflow::{Extraction, TaskCommand, Transition, WorkflowError, WorkflowMachine};
