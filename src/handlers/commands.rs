use teloxide::types::BotCommand;

use crate::bot_state::BotState;
use crate::dialog::{self, DialogError};
use crate::handlers::{guarded, HandlerResult, HELP_CMD};
use crate::models::Session;
use crate::templates::{HelpParams, WelcomeParams};
use crate::Command;

pub struct MenuEntry {
    pub command: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

const fn entry(command: &'static str, description: &'static str, enabled: bool) -> MenuEntry {
    MenuEntry {
        command,
        description,
        enabled,
    }
}

/// Full command surface. Disabled entries still parse but stay out of the
/// registered menu and the help text.
pub const MENU: [MenuEntry; 8] = [
    entry("start", "start using the bot", true),
    entry("help", "show help", true),
    entry("newtrip", "create new trip", true),
    entry("trips", "show all trips", false),
    entry("subscribe", "subscribe to a trip", false),
    entry("unsubscribe", "unsubscribe from a trip", false),
    entry("mytrips", "show trips you've created", true),
    entry("subscribed", "show trips you've subscribed to", false),
];

pub fn enabled_commands() -> Vec<BotCommand> {
    MENU.iter()
        .filter(|e| e.enabled)
        .map(|e| BotCommand::new(e.command, e.description))
        .collect()
}

fn help_listing() -> String {
    MENU.iter()
        .filter(|e| e.enabled)
        .map(|e| format!("/{} - {}\n", e.command, e.description))
        .collect()
}

fn not_implemented_text() -> String {
    format!("Not implemented yet. Use {HELP_CMD} command to see all available commands.")
}

pub fn not_found_text() -> String {
    format!("Command not found. Use {HELP_CMD} command to see all available commands.")
}

pub async fn command_handler(cmd: Command, session: Session, state: BotState) -> HandlerResult {
    let name = cmd.name();
    let span = session.clone();
    guarded(name, &span, run_command(&state, session, cmd)).await
}

pub async fn unknown_command_handler(session: Session, state: BotState) -> HandlerResult {
    let span = session.clone();
    guarded("unknown_command", &span, async move {
        log::debug!("🤷 Unknown command user_id={} state={}", session.user.id, session.state);
        state.reply(&session, not_found_text()).await;
        Ok::<(), DialogError>(())
    })
    .await
}

pub async fn run_command(
    state: &BotState,
    mut session: Session,
    cmd: Command,
) -> Result<(), DialogError> {
    match cmd {
        Command::Start => {
            dialog::reset(state, &mut session).await?;
            let text = state.templates.welcome(&WelcomeParams {
                first_name: &session.user.first_name,
                bot_username: &bot_mention(state),
                help_cmd: HELP_CMD,
            })?;
            state.send(session.chat_id, text).await?;
        }
        Command::Help => {
            dialog::reset(state, &mut session).await?;
            let text = state.templates.help(&HelpParams {
                bot_username: &bot_mention(state),
                commands: &help_listing(),
                help_cmd: HELP_CMD,
            })?;
            state.send(session.chat_id, text).await?;
        }
        Command::NewTrip => dialog::new_trip(state, &mut session).await?,
        Command::Trips
        | Command::Subscribe
        | Command::Unsubscribe
        | Command::MyTrips
        | Command::Subscribed => {
            log::debug!("🚧 Command not implemented user_id={} command={}", session.user.id, cmd.name());
            state.send(session.chat_id, not_implemented_text()).await?;
        }
    }
    Ok(())
}

fn bot_mention(state: &BotState) -> String {
    format!("@{}", state.identity.username)
}
