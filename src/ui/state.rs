use tracing::debug;

use super::notifications::Operation;

/// How the last user action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Cancelled,
    Succeeded,
    Failed(String),
}

/// Lifecycle of a single page action:
/// `Idle -> InProgress -> Succeeded | Failed -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    InProgress(Operation),
    Succeeded(Operation),
    Failed(Operation),
}

impl ActionState {
    /// Enter `InProgress`; ignored unless `Idle`
    pub fn begin(&mut self, operation: Operation) {
        if *self != ActionState::Idle {
            debug!(state = ?self, ?operation, "Ignoring start of overlapping action");
            return;
        }
        *self = ActionState::InProgress(operation);
        debug!(state = ?self, "Action started");
    }

    /// Record the result of the running action; cancellation goes straight
    /// back to `Idle`
    pub fn finish(&mut self, outcome: &ActionOutcome) {
        let ActionState::InProgress(operation) = *self else {
            return;
        };

        *self = match outcome {
            ActionOutcome::Succeeded => ActionState::Succeeded(operation),
            ActionOutcome::Failed(_) => ActionState::Failed(operation),
            ActionOutcome::Cancelled => ActionState::Idle,
        };
        debug!(state = ?self, "Action finished");
    }

    pub fn reset(&mut self) {
        *self = ActionState::Idle;
    }
}
