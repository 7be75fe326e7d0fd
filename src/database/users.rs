use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::UserId;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, UserRepository};
use crate::models::User;

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::AlreadyExists {
                entity: "user",
                key: user.id.to_string(),
            });
        }

        users.insert(user.id, user.clone());
        log::debug!("👤 User created user_id={}", user.id);

        Ok(user)
    }

    async fn get(&self, id: UserId) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "user",
                key: id.to_string(),
            })
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}
