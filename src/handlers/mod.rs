pub mod commands;
pub mod messages;
pub mod middleware;

pub use commands::{command_handler, unknown_command_handler};
pub use messages::message_handler;
pub use middleware::provide_session;

use futures::FutureExt;
use std::any::Any;
use std::error::Error;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::models::Session;
use crate::Command;

pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Routing tree: resolve the session, then exactly one of registered
/// command, unknown command or free text.
pub fn schema() -> UpdateHandler<Box<dyn Error + Send + Sync + 'static>> {
    Update::filter_message()
        .filter_map_async(provide_session)
        .branch(dptree::entry().filter_command::<Command>().endpoint(command_handler))
        .branch(dptree::filter(is_command).endpoint(unknown_command_handler))
        .branch(
            dptree::filter_map(|msg: Message| msg.text().map(ToOwned::to_owned))
                .endpoint(message_handler),
        )
}

fn is_command(msg: Message) -> bool {
    msg.text().is_some_and(|text| text.starts_with('/'))
}

pub const HELP_CMD: &str = "/help";

/// Per-message boundary: errors and panics of one update are logged here and
/// never reach the dispatcher loop.
pub async fn guarded<F, E>(handler: &'static str, session: &Session, fut: F) -> HandlerResult
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    log::debug!(
        "▶️ handler={} user_id={} chat_id={} state={}",
        handler,
        session.user.id,
        session.chat_id,
        session.state
    );

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!(
            "❌ handler={} user_id={} chat_id={} failed: {}",
            handler,
            session.user.id,
            session.chat_id,
            e
        ),
        Err(panic) => log::error!(
            "💥 handler={} user_id={} chat_id={} panicked: {}",
            handler,
            session.user.id,
            session.chat_id,
            panic_message(panic.as_ref())
        ),
    }
    Ok(())
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
