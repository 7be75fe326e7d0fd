use crate::bot_state::BotState;
use crate::models::{DialogState, NewTrip, Session, Trip, TripId, TripPatch};
use crate::templates::TripParams;
use crate::transport::QuickReplies;

use super::transition::{transition, Action};
use super::DialogError;

const CANCELED_TEXT: &str = "Your trip is canceled. Thank you!";

/// Drops whatever flow is active and anchors the session at `Start`.
///
/// An abandoned draft stays in the trip store untouched; only the session's
/// reference to it goes away.
pub async fn reset(state: &BotState, session: &mut Session) -> Result<(), DialogError> {
    if let Some(trip) = &session.trip {
        log::debug!(
            "Abandoning draft trip_id={} user_id={} state={}",
            trip.id,
            session.user.id,
            session.state
        );
    }

    session.state = DialogState::Start;
    session.trip = None;
    state.save_session(session).await?;
    Ok(())
}

/// `/newtrip`: opens a new draft, or repeats the pending question when a
/// draft is already being filled in.
pub async fn new_trip(state: &BotState, session: &mut Session) -> Result<(), DialogError> {
    if session.state.is_trip_flow() && session.state != DialogState::NewTrip {
        log::debug!("Trip flow already running user_id={} state={}", session.user.id, session.state);
        return prompt(state, session).await;
    }

    session.state = DialogState::NewTrip;
    session.trip = None;
    continue_flow(state, session, "").await
}

/// Feeds free text into the active flow.
///
/// On error nothing is saved, so the stored session keeps its previous state.
pub async fn continue_flow(
    state: &BotState,
    session: &mut Session,
    text: &str,
) -> Result<(), DialogError> {
    let step = transition(session.state, text)?;
    log::debug!(
        "Dialog step user_id={} {} -> {} action={:?}",
        session.user.id,
        session.state,
        step.next,
        step.action
    );

    match step.action {
        Action::OpenDraft => {
            let trip = match &session.trip {
                Some(trip) => trip.clone(),
                None => state.db.trips.create(NewTrip::draft(session.user.id)).await?,
            };
            advance(state, session, step.next, Some(trip)).await
        }
        Action::SetName(name) => {
            let id = draft_id(session)?;
            let trip = state.db.trips.update(id, TripPatch::name(name)).await?;
            advance(state, session, step.next, Some(trip)).await
        }
        Action::SetDate(date) => {
            let id = draft_id(session)?;
            let trip = state.db.trips.update(id, TripPatch::date(date)).await?;
            advance(state, session, step.next, Some(trip)).await
        }
        Action::SetDescription(description) => {
            let draft = owned_draft(state, session).await?;
            let trip = state.db.trips.update(draft.id, TripPatch::description(description)).await?;
            advance(state, session, step.next, Some(trip)).await
        }
        Action::Cancel => {
            let id = draft_id(session)?;
            state.db.trips.delete(id).await?;
            session.state = step.next;
            session.trip = None;
            state.save_session(session).await?;
            state.send(session.chat_id, CANCELED_TEXT).await?;
            Ok(())
        }
        Action::Publish => publish(state, session, step.next).await,
    }
}

async fn advance(
    state: &BotState,
    session: &mut Session,
    next: DialogState,
    trip: Option<Trip>,
) -> Result<(), DialogError> {
    session.state = next;
    session.trip = trip;
    state.save_session(session).await?;
    prompt(state, session).await
}

/// Asks the question that belongs to the session's current state.
async fn prompt(state: &BotState, session: &Session) -> Result<(), DialogError> {
    let chat_id = session.chat_id;
    match session.state {
        DialogState::NewTripName => {
            state.send(chat_id, "Please enter trip name").await?;
        }
        DialogState::NewTripDate => {
            let name = session.trip.as_ref().map(|t| t.name.as_str()).unwrap_or_default();
            let text = format!("Your trip name \"{name}\". Please select date and time");
            state.send_with_replies(chat_id, text, QuickReplies::Date).await?;
        }
        DialogState::NewTripDescription => {
            state.send(chat_id, "Please enter trip description").await?;
        }
        DialogState::NewTripConfirm => {
            let trip = session
                .trip
                .as_ref()
                .ok_or(DialogError::MissingDraft(session.state))?;
            let rendered = state.templates.trip(&TripParams::new(trip, &session.user))?;
            let text = format!("{rendered}\n\nPlease confirm");
            state.send_with_replies(chat_id, text, QuickReplies::Confirm).await?;
        }
        other => log::debug!("Nothing to ask in state {}", other),
    }
    Ok(())
}

async fn publish(
    state: &BotState,
    session: &mut Session,
    next: DialogState,
) -> Result<(), DialogError> {
    let draft = owned_draft(state, session).await?;
    let trip = state.db.trips.update(draft.id, TripPatch::completed()).await?;
    let rendered = state.templates.trip(&TripParams::new(&trip, &session.user))?;

    log::info!(
        "📣 Publishing trip_id={} user_id={} state={}",
        trip.id,
        session.user.id,
        DialogState::NewTripPublish
    );

    session.state = next;
    session.trip = None;
    state.save_session(session).await?;

    let message_id = state
        .send(session.chat_id, format!("Trip is published!\n\n{rendered}"))
        .await?;
    state
        .pin(session.chat_id, message_id)
        .await
        .map_err(DialogError::Pin)?;

    Ok(())
}

fn draft_id(session: &Session) -> Result<TripId, DialogError> {
    session.draft_id().ok_or(DialogError::MissingDraft(session.state))
}

/// Loads the session's draft and checks it belongs to the session's user.
async fn owned_draft(state: &BotState, session: &Session) -> Result<Trip, DialogError> {
    let trip = state.db.trips.get(draft_id(session)?).await?;
    if trip.created_by != session.user.id {
        return Err(DialogError::NotCreator {
            user: session.user.id,
            trip: trip.id,
        });
    }
    Ok(trip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rider, test_state, RecordingMessenger};
    use std::sync::Arc;
    use teloxide::types::ChatId;

    async fn session_for(state: &BotState, id: u64) -> Session {
        state
            .db
            .sessions
            .create(rider(id), ChatId(id as i64 * 100))
            .await
            .unwrap()
    }

    async fn stored(state: &BotState, session: &Session) -> Session {
        state.db.sessions.get_by_user(session.user.id).await.unwrap()
    }

    async fn drive_to_confirm(state: &BotState, session: &mut Session) {
        new_trip(state, session).await.unwrap();
        continue_flow(state, session, "Weekend Ride").await.unwrap();
        continue_flow(state, session, "today").await.unwrap();
        continue_flow(state, session, "Easy 20km loop").await.unwrap();
    }

    fn texts(messenger: &Arc<RecordingMessenger>) -> Vec<String> {
        messenger.sent().into_iter().map(|m| m.text).collect()
    }

    #[tokio::test]
    async fn full_flow_publishes_a_completed_trip() {
        let (state, messenger) = test_state();
        let mut session = session_for(&state, 1).await;

        new_trip(&state, &mut session).await.unwrap();
        assert_eq!(stored(&state, &session).await.state, DialogState::NewTripName);
        let trip_id = session.draft_id().unwrap();

        continue_flow(&state, &mut session, "Weekend Ride").await.unwrap();
        assert_eq!(stored(&state, &session).await.state, DialogState::NewTripDate);
        continue_flow(&state, &mut session, "today").await.unwrap();
        assert_eq!(stored(&state, &session).await.state, DialogState::NewTripDescription);
        continue_flow(&state, &mut session, "Easy 20km loop").await.unwrap();
        assert_eq!(stored(&state, &session).await.state, DialogState::NewTripConfirm);
        continue_flow(&state, &mut session, "yes").await.unwrap();

        let after = stored(&state, &session).await;
        assert_eq!(after.state, DialogState::Start);
        assert!(after.trip.is_none());

        let trip = state.db.trips.get(trip_id).await.unwrap();
        assert!(trip.completed);
        assert_eq!(trip.name, "Weekend Ride");
        assert_eq!(trip.date, "today");
        assert_eq!(trip.description, "Easy 20km loop");

        let sent = messenger.sent();
        assert_eq!(sent[0].text, "Please enter trip name");
        assert_eq!(sent[1].text, "Your trip name \"Weekend Ride\". Please select date and time");
        assert_eq!(sent[1].quick_replies, Some(QuickReplies::Date));
        assert_eq!(sent[2].text, "Please enter trip description");
        assert!(sent[3].text.ends_with("Created by @rider1\n\nPlease confirm"));
        assert!(sent[3].text.contains("Weekend Ride"));
        assert_eq!(sent[3].quick_replies, Some(QuickReplies::Confirm));
        assert!(sent[4].text.starts_with("Trip is published!"));
        assert!(sent[4].text.ends_with("Created by @rider1"));
        assert_eq!(messenger.pinned().len(), 1);
        assert_eq!(messenger.pinned()[0].0, session.chat_id);
    }

    #[tokio::test]
    async fn no_at_confirm_soft_deletes_and_anchors_at_new_trip() {
        let (state, messenger) = test_state();
        let mut session = session_for(&state, 1).await;
        drive_to_confirm(&state, &mut session).await;
        let trip_id = session.draft_id().unwrap();

        continue_flow(&state, &mut session, "no").await.unwrap();

        let after = stored(&state, &session).await;
        assert_eq!(after.state, DialogState::NewTrip);
        assert!(after.trip.is_none());
        assert!(state.db.trips.get(trip_id).await.unwrap_err().is_not_found());
        assert_eq!(messenger.last_text().unwrap(), CANCELED_TEXT);
        assert!(messenger.pinned().is_empty());
    }

    #[tokio::test]
    async fn capitalised_no_publishes() {
        let (state, messenger) = test_state();
        let mut session = session_for(&state, 1).await;
        drive_to_confirm(&state, &mut session).await;
        let trip_id = session.draft_id().unwrap();

        continue_flow(&state, &mut session, "No").await.unwrap();

        assert_eq!(stored(&state, &session).await.state, DialogState::Start);
        assert!(state.db.trips.get(trip_id).await.unwrap().completed);
        assert!(messenger.last_text().unwrap().starts_with("Trip is published!"));
        assert_eq!(messenger.pinned().len(), 1);
    }

    #[tokio::test]
    async fn any_text_after_cancel_opens_a_fresh_draft() {
        let (state, messenger) = test_state();
        let mut session = session_for(&state, 1).await;
        drive_to_confirm(&state, &mut session).await;
        let canceled = session.draft_id().unwrap();
        continue_flow(&state, &mut session, "no").await.unwrap();

        continue_flow(&state, &mut session, "again").await.unwrap();

        let fresh = session.draft_id().unwrap();
        assert_ne!(fresh, canceled);
        assert_eq!(stored(&state, &session).await.state, DialogState::NewTripName);
        assert_eq!(messenger.last_text().unwrap(), "Please enter trip name");
    }

    #[tokio::test]
    async fn confirm_by_non_creator_is_refused() {
        let (state, _messenger) = test_state();
        let mut owner = session_for(&state, 1).await;
        drive_to_confirm(&state, &mut owner).await;
        let mut intruder = session_for(&state, 2).await;
        intruder.state = DialogState::NewTripConfirm;
        intruder.trip = owner.trip.clone();
        state.save_session(&intruder).await.unwrap();

        let err = continue_flow(&state, &mut intruder, "yes").await.unwrap_err();

        assert!(matches!(err, DialogError::NotCreator { .. }));
        assert_eq!(stored(&state, &intruder).await.state, DialogState::NewTripConfirm);
        let trip = state.db.trips.get(owner.draft_id().unwrap()).await.unwrap();
        assert!(!trip.completed);
    }

    #[tokio::test]
    async fn description_by_non_creator_is_refused() {
        let (state, _messenger) = test_state();
        let mut owner = session_for(&state, 1).await;
        new_trip(&state, &mut owner).await.unwrap();
        let mut intruder = session_for(&state, 2).await;
        intruder.state = DialogState::NewTripDescription;
        intruder.trip = owner.trip.clone();
        state.save_session(&intruder).await.unwrap();

        let err = continue_flow(&state, &mut intruder, "hijack").await.unwrap_err();

        assert!(matches!(err, DialogError::NotCreator { .. }));
        assert_eq!(stored(&state, &intruder).await.state, DialogState::NewTripDescription);
        let trip = state.db.trips.get(owner.draft_id().unwrap()).await.unwrap();
        assert_eq!(trip.description, "");
    }

    #[tokio::test]
    async fn reset_from_every_state_lands_on_start() {
        let (state, _messenger) = test_state();
        let mut session = session_for(&state, 1).await;
        let states = [
            DialogState::Start,
            DialogState::NewTrip,
            DialogState::NewTripName,
            DialogState::NewTripDate,
            DialogState::NewTripDescription,
            DialogState::NewTripConfirm,
            DialogState::NewTripPublish,
        ];

        for from in states {
            session.state = from;
            reset(&state, &mut session).await.unwrap();
            reset(&state, &mut session).await.unwrap();
            assert_eq!(stored(&state, &session).await.state, DialogState::Start);
        }
    }

    #[tokio::test]
    async fn reset_abandons_but_keeps_the_draft() {
        let (state, _messenger) = test_state();
        let mut session = session_for(&state, 1).await;
        new_trip(&state, &mut session).await.unwrap();
        let trip_id = session.draft_id().unwrap();

        reset(&state, &mut session).await.unwrap();

        assert!(stored(&state, &session).await.trip.is_none());
        assert!(state.db.trips.get(trip_id).await.is_ok());
    }

    #[tokio::test]
    async fn new_trip_mid_flow_repeats_the_question() {
        let (state, messenger) = test_state();
        let mut session = session_for(&state, 1).await;
        new_trip(&state, &mut session).await.unwrap();
        continue_flow(&state, &mut session, "Weekend Ride").await.unwrap();
        let trip_id = session.draft_id();

        new_trip(&state, &mut session).await.unwrap();

        assert_eq!(session.draft_id(), trip_id);
        assert_eq!(stored(&state, &session).await.state, DialogState::NewTripDate);
        let sent = texts(&messenger);
        assert_eq!(sent[sent.len() - 1], sent[sent.len() - 2]);
        assert_eq!(state.db.trips.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn text_without_flow_is_rejected_and_not_saved() {
        let (state, messenger) = test_state();
        let mut session = session_for(&state, 1).await;

        let err = continue_flow(&state, &mut session, "hello").await.unwrap_err();

        assert!(matches!(err, DialogError::Transition(_)));
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn pin_failure_is_reported_after_announcing() {
        let (state, messenger) = test_state();
        let mut session = session_for(&state, 1).await;
        drive_to_confirm(&state, &mut session).await;
        messenger.fail_pins();

        let err = continue_flow(&state, &mut session, "yes").await.unwrap_err();

        assert!(matches!(err, DialogError::Pin(_)));
        assert!(messenger.last_text().unwrap().starts_with("Trip is published!"));
        assert_eq!(stored(&state, &session).await.state, DialogState::Start);
    }

    #[tokio::test]
    async fn concurrent_users_keep_separate_drafts() {
        let (state, _messenger) = test_state();
        let mut handles = Vec::new();
        for id in 1..=2u64 {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                let mut session = session_for(&state, id).await;
                new_trip(&state, &mut session).await.unwrap();
                continue_flow(&state, &mut session, &format!("Ride {id}")).await.unwrap();
                continue_flow(&state, &mut session, "tomorrow").await.unwrap();
                continue_flow(&state, &mut session, &format!("Route {id}")).await.unwrap();
                continue_flow(&state, &mut session, "yes").await.unwrap();
                session
            }));
        }

        for handle in handles {
            let session = handle.await.unwrap();
            let id = session.user.id.0;
            let trips = state.db.trips.list_by_creator(session.user.id).await.unwrap();
            assert_eq!(trips.len(), 1);
            assert_eq!(trips[0].name, format!("Ride {id}"));
            assert_eq!(trips[0].description, format!("Route {id}"));
            assert!(trips[0].completed);
        }
    }
}
