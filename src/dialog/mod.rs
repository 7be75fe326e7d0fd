//! Trip-creation dialog: the per-user state machine and the store work that
//! moves in lockstep with it.

pub mod engine;
pub mod transition;

use teloxide::types::UserId;
use thiserror::Error;

use crate::database::StoreError;
use crate::models::{DialogState, TripId};
use crate::templates::RenderError;
use crate::transport::TransportError;

pub use engine::{continue_flow, new_trip, reset};
pub use transition::TransitionError;

#[derive(Debug, Error)]
pub enum DialogError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("user {user} is not the creator of trip {trip}")]
    NotCreator { user: UserId, trip: TripId },
    #[error("no trip draft attached to the session in state {0}")]
    MissingDraft(DialogState),
    #[error("announcement sent but not pinned: {0}")]
    Pin(#[source] TransportError),
}
