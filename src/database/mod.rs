pub mod sessions;
pub mod trips;
pub mod users;

use async_trait::async_trait;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{DialogState, NewTrip, Session, Trip, TripId, TripPatch, User};

pub use sessions::InMemorySessions;
pub use trips::InMemoryTrips;
pub use users::InMemoryUsers;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} {key} already exists")]
    AlreadyExists { entity: &'static str, key: String },
    #[error("session cannot be stored with dialog state {0}")]
    InvalidState(DialogState),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> StoreResult<User>;
    async fn get(&self, id: UserId) -> StoreResult<User>;
    async fn list(&self) -> StoreResult<Vec<User>>;
}

/// Trip storage. Soft-deleted trips are invisible to every read.
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create(&self, params: NewTrip) -> StoreResult<Trip>;
    async fn get(&self, id: TripId) -> StoreResult<Trip>;
    async fn list(&self) -> StoreResult<Vec<Trip>>;
    async fn list_by_creator(&self, user_id: UserId) -> StoreResult<Vec<Trip>>;
    async fn update(&self, id: TripId, patch: TripPatch) -> StoreResult<Trip>;
    async fn delete(&self, id: TripId) -> StoreResult<()>;
}

/// Session storage keyed by user; at most one session per user.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, user: User, chat_id: ChatId) -> StoreResult<Session>;
    async fn get(&self, id: Uuid) -> StoreResult<Session>;
    async fn get_by_user(&self, user_id: UserId) -> StoreResult<Session>;
    async fn list(&self) -> StoreResult<Vec<Session>>;
    async fn update(&self, session: &Session) -> StoreResult<()>;
    async fn delete(&self, user_id: UserId) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Database {
    pub fn new(
        users: Arc<dyn UserRepository>,
        trips: Arc<dyn TripRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self { users, trips, sessions }
    }

    /// Non-persistent backing; everything is lost on restart.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryUsers::new()),
            Arc::new(InMemoryTrips::new()),
            Arc::new(InMemorySessions::new()),
        )
    }
}
