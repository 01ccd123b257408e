//! Workflow state machine
//!
//! Turns stage outcomes into work-item transitions. The machine performs no
//! I/O; each transition carries the commands the executor must apply.
//!
//! ```text
//! New ──start──▶ Processing ──┬─▶ Completed
//!                             ├─▶ ManualFollowup
//!                             └─▶ Issues
//! ```

use crate::locator::LocateError;
use formlink_domain::{
    ChildRecord, ExtractedForm, MatchResult, WorkflowCategory, WorkflowOutcome, WorkflowState,
};
use thiserror::Error;

/// Reason recorded when extraction yields nothing usable
pub const NOT_A_FORM_471: &str = "Not a Form 471 or extraction failed";

/// Reason recorded when the registry has no matching Form 470
pub const FORM_470_NOT_FOUND: &str = "Form 470 not found in USAC database";

/// Reason recorded on a successful match
pub const FORM_470_LINKED: &str = "Form 470 found and linked";

/// State machine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The requested move is not allowed from the current state
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current state
        from: WorkflowState,
        /// Requested state
        to: WorkflowState,
    },
}

/// Side effect requested from the Task Store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Move the item into a workflow category
    MoveToCategory(WorkflowCategory),
    /// Append an audit note
    AddAuditNote(String),
    /// Set the completion flag
    SetCompleted(bool),
    /// Create a child review record
    CreateChildRecord(ChildRecord),
}

/// One state change and the commands that realize it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State before the transition
    pub from: WorkflowState,
    /// State after the transition
    pub to: WorkflowState,
    /// Terminal outcome, set when `to` is terminal
    pub outcome: Option<WorkflowOutcome>,
    /// Commands to apply, in order
    pub commands: Vec<TaskCommand>,
}

/// Result of the extraction gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A Form 471; continue with matching
    Proceed(ExtractedForm),
    /// Anything else; the item moved to issues
    Rejected(Transition),
}

/// Per-item workflow state machine
#[derive(Debug, Clone)]
pub struct WorkflowMachine {
    state: WorkflowState,
}

impl Default for WorkflowMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowMachine {
    /// Machine for a freshly picked-up item
    pub fn new() -> Self {
        Self {
            state: WorkflowState::New,
        }
    }

    /// Current state
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    fn transition(
        &mut self,
        to: WorkflowState,
        outcome: Option<WorkflowOutcome>,
        commands: Vec<TaskCommand>,
    ) -> Result<Transition, WorkflowError> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(WorkflowError::InvalidTransition { from, to });
        }
        self.state = to;
        Ok(Transition {
            from,
            to,
            outcome,
            commands,
        })
    }

    fn require_processing(&self, to: WorkflowState) -> Result<(), WorkflowError> {
        if self.state == WorkflowState::Processing {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }

    /// New → Processing, on pickup
    pub fn start(&mut self) -> Result<Transition, WorkflowError> {
        self.transition(
            WorkflowState::Processing,
            None,
            vec![
                TaskCommand::MoveToCategory(WorkflowCategory::Processing),
                TaskCommand::AddAuditNote(
                    "Task moved to Processing.\n\nThis task is now being processed automatically."
                        .to_string(),
                ),
            ],
        )
    }

    /// Processing → Issues, when no document could be obtained
    pub fn on_locate_failed(&mut self, error: &LocateError) -> Result<Transition, WorkflowError> {
        self.issues(error.to_string())
    }

    /// Processing → Issues unless the text yielded a Form 471
    ///
    /// A Form 471 is handed back for matching without a transition.
    pub fn on_extracted(
        &mut self,
        form: Option<ExtractedForm>,
    ) -> Result<Extraction, WorkflowError> {
        self.require_processing(WorkflowState::Issues)?;
        match form {
            Some(form) if form.is_form471() => Ok(Extraction::Proceed(form)),
            _ => self.issues(NOT_A_FORM_471.to_string()).map(Extraction::Rejected),
        }
    }

    /// Processing → Completed or ManualFollowup, from the registry answer
    pub fn on_matched(
        &mut self,
        form: &ExtractedForm,
        result: &MatchResult,
    ) -> Result<Transition, WorkflowError> {
        if let Some(url) = result.form470_url().filter(|_| result.is_found()) {
            let url = url.to_string();
            let note = format!(
                "Task completed successfully!\n\n{}:\n{}\n\nThis task was processed automatically.",
                FORM_470_LINKED, url
            );
            return self.transition(
                WorkflowState::Completed,
                Some(WorkflowOutcome::Completed {
                    form470_url: url,
                    reason: FORM_470_LINKED.to_string(),
                }),
                vec![
                    TaskCommand::SetCompleted(true),
                    TaskCommand::AddAuditNote(note),
                ],
            );
        }

        let reason = result.error().unwrap_or(FORM_470_NOT_FOUND).to_string();
        let note = format!(
            "Moved to {}.\n\nReason: {}",
            WorkflowCategory::ManualFollowup,
            reason
        );
        self.transition(
            WorkflowState::ManualFollowup,
            Some(WorkflowOutcome::ManualFollowup { reason }),
            vec![
                TaskCommand::MoveToCategory(WorkflowCategory::ManualFollowup),
                TaskCommand::AddAuditNote(note),
                TaskCommand::CreateChildRecord(review_record(form)),
            ],
        )
    }

    fn issues(&mut self, reason: String) -> Result<Transition, WorkflowError> {
        let note = format!("Moved to {}.\n\nIssue: {}", WorkflowCategory::Issues, reason);
        self.transition(
            WorkflowState::Issues,
            Some(WorkflowOutcome::Issues { reason }),
            vec![
                TaskCommand::MoveToCategory(WorkflowCategory::Issues),
                TaskCommand::AddAuditNote(note),
            ],
        )
    }
}

/// Child record asking a reviewer to find the Form 470 by hand
pub fn review_record(form: &ExtractedForm) -> ChildRecord {
    let number = form.application_number();
    ChildRecord {
        name: format!("Manual Review: Find Form 470 for {}", number),
        notes: format!(
            "This sub-task was created automatically because no Form 470 was found for Form 471.\n\n\
             Form 471 Application Number: {}\n\
             Form Type: {}\n\
             Billed Entity: {}\n\n\
             Please manually search for the corresponding Form 470 and update this sub-task with the results.\n\n\
             Expected actions:\n\
             1. Search USAC database for Form 470\n\
             2. Verify the Form 470 matches the Form 471\n\
             3. Update this sub-task with findings\n\
             4. Mark parent task as complete if Form 470 is found",
            number,
            form.form_type(),
            form.billed_entity_name()
        ),
    }
}
