//! In-process fakes for handler and dialog tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, MessageId, UserId};
use teloxide::{ApiError, RequestError};

use crate::bot_state::{BotIdentity, BotState};
use crate::database::Database;
use crate::models::User;
use crate::templates::Templates;
use crate::transport::{Messenger, OutgoingMessage, TransportError};

pub const BOT_ID: UserId = UserId(999);

/// Messenger that records everything instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<OutgoingMessage>>,
    pinned: Mutex<Vec<(ChatId, MessageId)>>,
    next_id: AtomicI32,
    fail_sends: AtomicBool,
    fail_pins: AtomicBool,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.text.clone())
    }

    pub fn pinned(&self) -> Vec<(ChatId, MessageId)> {
        self.pinned.lock().unwrap().clone()
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn fail_pins(&self) {
        self.fail_pins.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, message: OutgoingMessage) -> Result<MessageId, TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(RequestError::Api(ApiError::BotBlocked).into());
        }
        self.sent.lock().unwrap().push(message);
        Ok(MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn pin(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), TransportError> {
        if self.fail_pins.load(Ordering::SeqCst) {
            return Err(RequestError::Api(ApiError::NotEnoughRightsToPinMessage).into());
        }
        self.pinned.lock().unwrap().push((chat_id, message_id));
        Ok(())
    }
}

pub fn test_state() -> (BotState, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::default());
    let state = BotState::new(
        Database::in_memory(),
        Templates::new().expect("embedded templates parse"),
        BotIdentity {
            id: BOT_ID,
            username: "ride_announcer_bot".to_string(),
        },
        messenger.clone(),
    );
    (state, messenger)
}

pub fn rider(id: u64) -> User {
    User {
        id: UserId(id),
        username: format!("rider{id}"),
        first_name: format!("Rider{id}"),
        last_name: String::new(),
    }
}
