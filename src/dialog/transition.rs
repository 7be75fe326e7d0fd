//! Pure trip-creation transitions.
//!
//! `transition` decides the next dialog state and the action the engine must
//! carry out for a free-text input. It performs no I/O, so every rule of the
//! flow can be exercised without stores or a chat.

use thiserror::Error;

use crate::models::DialogState;

/// Store-side work attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create an empty draft unless the session already tracks one.
    OpenDraft,
    SetName(String),
    SetDate(String),
    SetDescription(String),
    /// Soft-delete the draft and go back to a fresh `/newtrip` anchor.
    Cancel,
    /// Mark the draft completed, announce and pin it.
    Publish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: DialogState,
    pub action: Action,
}

impl Step {
    fn new(next: DialogState, action: Action) -> Self {
        Self { next, action }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no trip flow is active in state {0}")]
    NoActiveFlow(DialogState),
}

/// Only the exact reply `no` (the quick-reply label) rejects a draft.
pub fn is_rejection(text: &str) -> bool {
    text == "no"
}

pub fn transition(state: DialogState, text: &str) -> Result<Step, TransitionError> {
    let step = match state {
        DialogState::NewTrip => Step::new(DialogState::NewTripName, Action::OpenDraft),
        DialogState::NewTripName => {
            Step::new(DialogState::NewTripDate, Action::SetName(text.to_string()))
        }
        DialogState::NewTripDate => {
            Step::new(DialogState::NewTripDescription, Action::SetDate(text.to_string()))
        }
        DialogState::NewTripDescription => Step::new(
            DialogState::NewTripConfirm,
            Action::SetDescription(text.to_string()),
        ),
        DialogState::NewTripConfirm if is_rejection(text) => {
            Step::new(DialogState::NewTrip, Action::Cancel)
        }
        // Anything but "no" counts as a yes.
        DialogState::NewTripConfirm => Step::new(DialogState::Start, Action::Publish),
        DialogState::Unknown | DialogState::Start | DialogState::NewTripPublish => {
            return Err(TransitionError::NoActiveFlow(state))
        }
    };
    Ok(step)
}
