//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! dispatches incoming commands against the connection's [`FeedSession`]
//! and pushes a recomputed feed after every change.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType, location_report};
use super::session::FeedSession;
use crate::clients::Geocoder;
use crate::domain::UpdateEvent;
use crate::error::PulseError;
use crate::service::{UpdateService, now_millis};

/// Services a connection needs besides its own session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Store access for seeding and refresh.
    pub update_service: Arc<UpdateService>,
    /// Place search for the `search` command.
    pub geocoder: Arc<dyn Geocoder>,
}

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Seeds the session from the store and pushes the first feed.
/// - Reads commands from the client and dispatches them.
/// - Applies events from the [`broadcast::Receiver`] and pushes the new feed.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<UpdateEvent>,
    ctx: SessionContext,
    mut session: FeedSession,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let first = match reseed(&mut session, &ctx).await {
        Ok(()) => feed_push(&session, "seed"),
        Err(e) => WsMessage::error(String::new(), &e),
    };
    if ws_tx.send(Message::text(first.to_json())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let replies = handle_text_message(&text, &mut session, &ctx).await;
                        let mut closed = false;
                        for reply in replies {
                            if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                                closed = true;
                                break;
                            }
                        }
                        if closed {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                let push = match event {
                    Ok(update_event) => {
                        session.apply_event(&update_event, now_millis());
                        feed_push(&session, update_event.event_type_str())
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus, reseeding");
                        match reseed(&mut session, &ctx).await {
                            Ok(()) => feed_push(&session, "resync"),
                            Err(e) => WsMessage::error(String::new(), &e),
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if ws_tx.send(Message::text(push.to_json())).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text frame, returning the messages to send back.
///
/// A valid command yields a response followed by a feed push; anything else
/// yields a single error message.
pub async fn handle_text_message(
    text: &str,
    session: &mut FeedSession,
    ctx: &SessionContext,
) -> Vec<WsMessage> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return vec![WsMessage::error(
            String::new(),
            &PulseError::InvalidRequest("malformed JSON".to_string()),
        )];
    };

    if msg.msg_type != WsMessageType::Command {
        return vec![WsMessage::error(
            msg.id,
            &PulseError::InvalidRequest("expected a command message".to_string()),
        )];
    }

    let command = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => command,
        Err(e) => {
            return vec![WsMessage::error(
                msg.id,
                &PulseError::InvalidRequest(format!("unknown command: {e}")),
            )];
        }
    };

    match dispatch(command, session, ctx).await {
        Ok((trigger, payload)) => vec![
            WsMessage::new(msg.id, WsMessageType::Response, payload),
            feed_push(session, trigger),
        ],
        Err(e) => vec![WsMessage::error(msg.id, &e)],
    }
}

/// Applies one command to the session.
///
/// Returns the push trigger name and the response payload.
///
/// # Errors
///
/// Returns [`PulseError::LocationUnavailable`] for a failed `locate`,
/// [`PulseError::GeoLookupError`] or [`PulseError::InvalidRequest`] for a
/// failed `search`, and [`PulseError::PersistenceError`] if `refresh` cannot
/// read the store. The session is unchanged on error.
pub async fn dispatch(
    command: WsCommand,
    session: &mut FeedSession,
    ctx: &SessionContext,
) -> Result<(&'static str, serde_json::Value), PulseError> {
    match command {
        WsCommand::SetView { mode, center, zoom } => {
            session.patch_view(mode, center, zoom);
            Ok(("set_view", serde_json::json!({ "view": session.view() })))
        }
        WsCommand::Locate { lat, lng, error } => {
            session.locate(location_report(lat, lng, error))?;
            Ok((
                "locate",
                serde_json::json!({ "userLocation": session.user_location() }),
            ))
        }
        WsCommand::Search { query } => {
            let location = ctx.geocoder.search(&query).await.inspect_err(|e| {
                tracing::warn!(query = %query, error = %e, "session search failed");
            })?;
            session.jump_to(location);
            Ok((
                "search",
                serde_json::json!({ "query": query, "location": location }),
            ))
        }
        WsCommand::Refresh => {
            reseed(session, ctx).await?;
            Ok((
                "refresh",
                serde_json::json!({ "collection": session.collection_len() }),
            ))
        }
    }
}

async fn reseed(session: &mut FeedSession, ctx: &SessionContext) -> Result<(), PulseError> {
    let updates = ctx.update_service.active_updates(now_millis()).await?;
    session.reseed(updates);
    Ok(())
}

fn feed_push(session: &FeedSession, trigger: &'static str) -> WsMessage {
    let snapshot = session.snapshot(trigger, now_millis());
    WsMessage::new(
        uuid::Uuid::new_v4().to_string(),
        WsMessageType::Event,
        serde_json::to_value(&snapshot).unwrap_or_default(),
    )
}
