//! Error types for watcher operations

use crate::config::ConfigError;
use crate::workflow::WorkflowError;
use thiserror::Error;

/// Errors that abort processing of an item (and with it the current tick)
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Task Store read failed
    #[error("Task store error: {0}")]
    TaskStore(String),

    /// State machine refused a transition
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A client could not be constructed
    #[error("Setup error: {0}")]
    Setup(String),
}
