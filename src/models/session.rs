use serde::{Deserialize, Serialize};
use teloxide::types::ChatId;
use uuid::Uuid;

use super::{DialogState, Trip, TripId, User};

/// Live conversational context of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user: User,
    pub chat_id: ChatId,
    pub state: DialogState,
    /// Snapshot of the draft being built, present only during trip creation.
    pub trip: Option<Trip>,
}

impl Session {
    pub fn new(user: User, chat_id: ChatId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            chat_id,
            state: DialogState::Start,
            trip: None,
        }
    }

    pub fn draft_id(&self) -> Option<TripId> {
        self.trip.as_ref().map(|trip| trip.id)
    }
}
