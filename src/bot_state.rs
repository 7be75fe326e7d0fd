use std::sync::Arc;
use teloxide::types::{ChatId, MessageId, UserId};

use crate::database::{Database, StoreError};
use crate::models::Session;
use crate::templates::Templates;
use crate::transport::{Messenger, OutgoingMessage, QuickReplies, TransportError};

/// Who the bot itself is on the chat platform.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub id: UserId,
    pub username: String,
}

/// Shared handle passed to every handler.
#[derive(Clone)]
pub struct BotState {
    pub db: Database,
    pub templates: Arc<Templates>,
    pub identity: BotIdentity,
    messenger: Arc<dyn Messenger>,
}

impl BotState {
    pub fn new(
        db: Database,
        templates: Templates,
        identity: BotIdentity,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            db,
            templates: Arc::new(templates),
            identity,
            messenger,
        }
    }

    pub async fn send(&self, chat_id: ChatId, text: impl Into<String>) -> Result<MessageId, TransportError> {
        self.messenger.send(OutgoingMessage::text(chat_id, text)).await
    }

    pub async fn send_with_replies(
        &self,
        chat_id: ChatId,
        text: impl Into<String>,
        replies: QuickReplies,
    ) -> Result<MessageId, TransportError> {
        self.messenger
            .send(OutgoingMessage::text(chat_id, text).with_quick_replies(replies))
            .await
    }

    pub async fn pin(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), TransportError> {
        self.messenger.pin(chat_id, message_id).await
    }

    /// Sends a reply that nobody waits for; a failure only gets logged.
    pub async fn reply(&self, session: &Session, text: impl Into<String>) {
        if let Err(e) = self.send(session.chat_id, text).await {
            log::error!(
                "❌ Failed to send message user_id={} chat_id={}: {}",
                session.user.id,
                session.chat_id,
                e
            );
        }
    }

    pub async fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.db.sessions.update(session).await
    }

    /// Says goodbye to every known session and drops it. Never fails:
    /// each problem is logged and the loop moves on.
    pub async fn farewell_sessions(&self) {
        let sessions = match self.db.sessions.list().await {
            Ok(sessions) => sessions,
            Err(e) => {
                log::error!("Failed to list sessions: {}", e);
                return;
            }
        };

        log::info!("👋 Saying goodbye to {} session(s)", sessions.len());

        for session in sessions {
            let text = format!("I'm going to sleep. Bye, {}!", session.user.display_name());
            if let Err(e) = self.send(session.chat_id, text).await {
                log::warn!("Failed to send farewell user_id={}: {}", session.user.id, e);
            }

            if let Err(e) = self.db.sessions.delete(session.user.id).await {
                log::warn!("Failed to delete session user_id={}: {}", session.user.id, e);
            }
        }
    }
}
