use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, KeyboardButton, KeyboardMarkup, MessageId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
}

/// Small fixed button sets offered under a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickReplies {
    Date,
    Confirm,
}

impl QuickReplies {
    pub fn options(self) -> &'static [&'static str] {
        match self {
            QuickReplies::Date => &["today", "tomorrow"],
            QuickReplies::Confirm => &["yes", "no"],
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            QuickReplies::Date => "Enter date",
            QuickReplies::Confirm => "Confirm",
        }
    }

    fn keyboard(self) -> KeyboardMarkup {
        let rows = self
            .options()
            .iter()
            .map(|option| vec![KeyboardButton::new(*option)])
            .collect::<Vec<_>>();

        KeyboardMarkup::new(rows)
            .resize_keyboard()
            .one_time_keyboard()
            .input_field_placeholder(self.placeholder().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub quick_replies: Option<QuickReplies>,
}

impl OutgoingMessage {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            quick_replies: None,
        }
    }

    pub fn with_quick_replies(mut self, replies: QuickReplies) -> Self {
        self.quick_replies = Some(replies);
        self
    }
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, message: OutgoingMessage) -> Result<MessageId, TransportError>;
    async fn pin(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), TransportError>;
}

pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, message: OutgoingMessage) -> Result<MessageId, TransportError> {
        let request = self.bot.send_message(message.chat_id, message.text);
        let sent = match message.quick_replies {
            Some(replies) => request.reply_markup(replies.keyboard()).await?,
            None => request.await?,
        };
        Ok(sent.id)
    }

    async fn pin(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), TransportError> {
        self.bot.pin_chat_message(chat_id, message_id).await?;
        Ok(())
    }
}

/// Desired public profile of the bot.
pub struct BotProfile<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub commands: Vec<BotCommand>,
}

/// Brings name, description and command menu in line with `profile`.
/// Each step is best-effort: failures are logged and the next step runs.
pub async fn sync_profile(bot: &Bot, profile: &BotProfile<'_>) {
    match bot.get_my_name().await {
        Ok(current) if current.name == profile.name => log::info!("Bot name is up to date"),
        _ => match bot.set_my_name().name(profile.name).await {
            Ok(_) => log::info!("Bot name updated"),
            Err(e) => log::error!("Failed to set bot name: {}", e),
        },
    }

    match bot.get_my_description().await {
        Ok(current) if current.description == profile.description => {
            log::info!("Bot description is up to date")
        }
        _ => match bot.set_my_description().description(profile.description).await {
            Ok(_) => log::info!("Bot description updated"),
            Err(e) => log::error!("Failed to set bot description: {}", e),
        },
    }

    match bot.get_my_commands().await {
        Ok(current) if current == profile.commands => log::info!("Bot commands are up to date"),
        _ => match bot.set_my_commands(profile.commands.clone()).await {
            Ok(_) => log::info!("Bot commands set"),
            Err(e) => log::error!("Failed to set bot commands: {}", e),
        },
    }
}
