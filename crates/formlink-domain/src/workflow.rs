//! Workflow states and terminal outcomes

use std::fmt;

/// Where a work item stands in the review workflow
///
/// ```text
/// New → Processing → {Completed, ManualFollowup, Issues}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    /// Waiting in the backlog
    New,
    /// Picked up by the pipeline
    Processing,
    /// Linked to its Form 470
    Completed,
    /// Needs a human to find the Form 470
    ManualFollowup,
    /// Could not be processed
    Issues,
}

impl WorkflowState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::New => "new",
            WorkflowState::Processing => "processing",
            WorkflowState::Completed => "completed",
            WorkflowState::ManualFollowup => "manual_followup",
            WorkflowState::Issues => "issues",
        }
    }

    /// Terminal states have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Completed | WorkflowState::ManualFollowup | WorkflowState::Issues
        )
    }

    /// Whether moving to `next` is a legal transition
    ///
    /// # Examples
    ///
    /// ```
    /// use formlink_domain::WorkflowState;
    ///
    /// assert!(WorkflowState::New.can_transition_to(WorkflowState::Processing));
    /// assert!(WorkflowState::Processing.can_transition_to(WorkflowState::Issues));
    /// assert!(!WorkflowState::Completed.can_transition_to(WorkflowState::New));
    /// ```
    pub fn can_transition_to(&self, next: WorkflowState) -> bool {
        match self {
            WorkflowState::New => next == WorkflowState::Processing,
            WorkflowState::Processing => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal classification of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Form 470 found and linked
    Completed {
        /// URL of the matched Form 470
        form470_url: String,
        /// Audit reason
        reason: String,
    },

    /// Form 470 not found; a human has to take over
    ManualFollowup {
        /// Audit reason
        reason: String,
    },

    /// The item could not be processed
    Issues {
        /// Audit reason
        reason: String,
    },
}

impl WorkflowOutcome {
    /// Human-readable reason recorded in the audit trail
    pub fn reason(&self) -> &str {
        match self {
            WorkflowOutcome::Completed { reason, .. }
            | WorkflowOutcome::ManualFollowup { reason }
            | WorkflowOutcome::Issues { reason } => reason,
        }
    }

    /// The workflow state this outcome lands in
    pub fn state(&self) -> WorkflowState {
        match self {
            WorkflowOutcome::Completed { .. } => WorkflowState::Completed,
            WorkflowOutcome::ManualFollowup { .. } => WorkflowState::ManualFollowup,
            WorkflowOutcome::Issues { .. } => WorkflowState::Issues,
        }
    }
}

impl fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.state(), self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_have_no_exits() {
        let all = [
            WorkflowState::New,
            WorkflowState::Processing,
            WorkflowState::Completed,
            WorkflowState::ManualFollowup,
            WorkflowState::Issues,
        ];
        for from in all.iter().filter(|s| s.is_terminal()) {
            for to in all {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_new_only_goes_to_processing() {
        assert!(!WorkflowState::New.can_transition_to(WorkflowState::Completed));
        assert!(!WorkflowState::New.can_transition_to(WorkflowState::Issues));
        assert!(!WorkflowState::Processing.can_transition_to(WorkflowState::New));
    }

    #[test]
    fn test_outcome_state_and_reason() {
        let outcome = WorkflowOutcome::Issues { reason: "No PDF found".into() };
        assert_eq!(outcome.state(), WorkflowState::Issues);
        assert_eq!(outcome.reason(), "No PDF found");
        assert_eq!(outcome.to_string(), "issues: No PDF found");
    }
}
