use serde::{Deserialize, Serialize};
use teloxide::types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// `@username`, or the first name for accounts without a username.
    pub fn mention(&self) -> String {
        if self.username.is_empty() {
            self.first_name.clone()
        } else {
            format!("@{}", self.username)
        }
    }

    /// Name used when addressing the user directly.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.first_name
        } else {
            &self.username
        }
    }
}

impl From<&teloxide::types::User> for User {
    fn from(user: &teloxide::types::User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone().unwrap_or_default(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone().unwrap_or_default(),
        }
    }
}
