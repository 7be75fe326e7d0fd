use crate::bot_state::BotState;
use crate::dialog::{self, DialogError};
use crate::handlers::commands::not_found_text;
use crate::handlers::{guarded, HandlerResult};
use crate::models::Session;

pub async fn message_handler(text: String, session: Session, state: BotState) -> HandlerResult {
    let span = session.clone();
    guarded("text", &span, handle_text(&state, session, &text)).await
}

/// Free text either feeds the running trip flow or is answered with
/// "command not found".
pub async fn handle_text(
    state: &BotState,
    mut session: Session,
    text: &str,
) -> Result<(), DialogError> {
    if !session.state.is_trip_flow() {
        log::debug!("💬 Text outside of a flow user_id={} state={}", session.user.id, session.state);
        state.send(session.chat_id, not_found_text()).await?;
        return Ok(());
    }

    dialog::continue_flow(state, &mut session, text).await
}
