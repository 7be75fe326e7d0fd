use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SessionRepository, StoreError, StoreResult};
use crate::models::{Session, User};

#[derive(Clone, Default)]
pub struct InMemorySessions {
    sessions: Arc<RwLock<HashMap<UserId, Session>>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(user_id: UserId) -> StoreError {
    StoreError::NotFound {
        entity: "session for user",
        key: user_id.to_string(),
    }
}

#[async_trait]
impl SessionRepository for InMemorySessions {
    async fn create(&self, user: User, chat_id: ChatId) -> StoreResult<Session> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&user.id) {
            return Err(StoreError::AlreadyExists {
                entity: "session for user",
                key: user.id.to_string(),
            });
        }

        let session = Session::new(user, chat_id);
        sessions.insert(session.user.id, session.clone());
        log::debug!(
            "🆕 Session created user_id={} chat_id={} session_id={}",
            session.user.id,
            chat_id,
            session.id
        );

        Ok(session)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Session> {
        self.sessions
            .read()
            .await
            .values()
            .find(|session| session.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "session",
                key: id.to_string(),
            })
    }

    async fn get_by_user(&self, user_id: UserId) -> StoreResult<Session> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| not_found(user_id))
    }

    async fn list(&self) -> StoreResult<Vec<Session>> {
        Ok(self.sessions.read().await.values().cloned().collect())
    }

    async fn update(&self, session: &Session) -> StoreResult<()> {
        if !session.state.is_valid() {
            return Err(StoreError::InvalidState(session.state));
        }

        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&session.user.id)
            .ok_or_else(|| not_found(session.user.id))?;
        *stored = session.clone();

        log::debug!(
            "💾 Session updated user_id={} chat_id={} state={} trip_in_progress={}",
            session.user.id,
            session.chat_id,
            session.state,
            session.trip.is_some()
        );

        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> StoreResult<()> {
        self.sessions
            .write()
            .await
            .remove(&user_id)
            .map(|_| log::debug!("👋 Session deleted user_id={}", user_id))
            .ok_or_else(|| not_found(user_id))
    }
}
