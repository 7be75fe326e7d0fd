use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

mod bot_state;
mod config;
mod database;
mod dialog;
mod handlers;
mod models;
mod shutdown;
mod templates;
mod transport;

#[cfg(test)]
mod testing;

use crate::bot_state::{BotIdentity, BotState};
use crate::config::Config;
use crate::database::Database;
use crate::handlers::commands::enabled_commands;
use crate::templates::Templates;
use crate::transport::{sync_profile, BotProfile, TelegramMessenger};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start using the bot")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "create new trip")]
    NewTrip,
    #[command(description = "show all trips")]
    Trips,
    #[command(description = "subscribe to a trip")]
    Subscribe,
    #[command(description = "unsubscribe from a trip")]
    Unsubscribe,
    #[command(description = "show trips you've created")]
    MyTrips,
    #[command(description = "show trips you've subscribed to")]
    Subscribed,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::NewTrip => "newtrip",
            Command::Trips => "trips",
            Command::Subscribe => "subscribe",
            Command::Unsubscribe => "unsubscribe",
            Command::MyTrips => "mytrips",
            Command::Subscribed => "subscribed",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    log::info!("Starting ride announcer bot...");
    log::debug!("Loaded {:?}", config);

    let bot = Bot::new(&config.token);
    let me = bot.get_me().await?;
    let identity = BotIdentity {
        id: me.user.id,
        username: me.user.username.clone().unwrap_or_default(),
    };
    log::info!("🤖 Authorized bot_id={} username={}", identity.id, identity.username);

    sync_profile(
        &bot,
        &BotProfile {
            name: &config.bot_name,
            description: &config.bot_description,
            commands: enabled_commands(),
        },
    )
    .await;

    let templates = Templates::new()?;
    let state = BotState::new(
        Database::in_memory(),
        templates,
        identity,
        Arc::new(TelegramMessenger::new(bot.clone())),
    );

    let mut dispatcher = Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![state.clone()])
        .distribution_function(|upd: &Update| upd.from().map(|user| user.id))
        .default_handler(|upd| async move {
            log::trace!("Unhandled update: {:?}", upd.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown::wait_for_signal().await;
        log::info!("🛑 Shutdown signal received");
        let token = &token;
        shutdown::stop_dispatcher(move || token.shutdown()).await;
    });

    log::info!("🚀 Starting dispatcher...");
    dispatcher.dispatch().await;

    state.farewell_sessions().await;
    log::info!("Bot stopped");

    Ok(())
}
