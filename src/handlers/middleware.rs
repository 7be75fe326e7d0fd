use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::database::StoreError;
use crate::models::{Session, User};

/// dptree filter that resolves the sender's session before any handler runs.
/// Updates without a session (the bot itself, store failures) stop here.
pub async fn provide_session(msg: Message, state: BotState) -> Option<Session> {
    let from = msg.from.as_ref()?;

    match provision(&state, User::from(from), msg.chat.id).await {
        Ok(session) => session,
        Err(e) => {
            log::error!(
                "❌ Failed to provide session user_id={} chat_id={}: {}",
                from.id,
                msg.chat.id,
                e
            );
            None
        }
    }
}

/// Looks up or lazily creates the user and their session.
///
/// Returns `None` for the bot's own messages. A create that loses a race
/// with a concurrent create falls back to the record that won.
pub async fn provision(
    state: &BotState,
    sender: User,
    chat_id: ChatId,
) -> Result<Option<Session>, StoreError> {
    if sender.id == state.identity.id {
        log::debug!("Ignoring message from the bot itself user_id={}", sender.id);
        return Ok(None);
    }

    let user_id = sender.id;
    let user = match state.db.users.get(user_id).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() => match state.db.users.create(sender).await {
            Ok(user) => user,
            Err(e) if e.is_already_exists() => state.db.users.get(user_id).await?,
            Err(e) => return Err(e),
        },
        Err(e) => return Err(e),
    };

    let session = match state.db.sessions.get_by_user(user_id).await {
        Ok(session) => session,
        Err(e) if e.is_not_found() => match state.db.sessions.create(user, chat_id).await {
            Ok(session) => session,
            Err(e) if e.is_already_exists() => state.db.sessions.get_by_user(user_id).await?,
            Err(e) => return Err(e),
        },
        Err(e) => return Err(e),
    };

    Ok(Some(session))
}
