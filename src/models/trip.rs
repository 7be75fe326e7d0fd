use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teloxide::types::UserId;
use uuid::Uuid;

pub type TripId = Uuid;

/// A trip announcement, a draft until `completed` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    /// Free text, never parsed.
    pub date: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: UserId,
    pub completed: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Trip {
    pub fn new(params: NewTrip) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: params.name,
            date: params.date,
            description: params.description,
            created_at: now,
            updated_at: now,
            created_by: params.created_by,
            completed: false,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewTrip {
    pub name: String,
    pub date: String,
    pub description: String,
    pub created_by: UserId,
}

impl NewTrip {
    pub fn draft(created_by: UserId) -> Self {
        Self {
            name: String::new(),
            date: String::new(),
            description: String::new(),
            created_by,
        }
    }
}

/// Partial trip update; only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPatch {
    pub name: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TripPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn date(date: impl Into<String>) -> Self {
        Self { date: Some(date.into()), ..Self::default() }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self { description: Some(description.into()), ..Self::default() }
    }

    pub fn completed() -> Self {
        Self { completed: Some(true), ..Self::default() }
    }

    /// Merges the present fields into `trip`. Timestamps are left to the store.
    pub fn apply(&self, trip: &mut Trip) {
        if let Some(name) = &self.name {
            trip.name = name.clone();
        }
        if let Some(date) = &self.date {
            trip.date = date.clone();
        }
        if let Some(description) = &self.description {
            trip.description = description.clone();
        }
        if let Some(completed) = self.completed {
            trip.completed = completed;
        }
    }
}
