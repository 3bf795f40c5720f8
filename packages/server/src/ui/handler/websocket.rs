//! WebSocket connection handlers.
//!
//! One task pair per connection: a receive loop that routes inbound events
//! through the usecases, and a pusher loop that drains this connection's
//! outbound channel into the socket. The connection's lifecycle is linear:
//! CONNECTED (sink registered, no identity) → JOINED (roster entry owned)
//! → DISCONNECTED (roster entry removed if still owned).

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, ConnectionId, ConnectionIdFactory, JoinRequest, TypingNotice},
    infrastructure::dto::{
        conversion::roster_to_dto,
        websocket::{ClientEvent, PresencePayload, RosterPayload, ServerEvent},
    },
    ui::state::AppState,
    usecase::EventError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This is the outbound half of the connection: events fanned out by the
/// broker land in the channel and are drained into the socket here.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // The transport layer assigns the connection id; it is never reused.
    let connection_id = ConnectionIdFactory::generate();

    // Create a channel for this connection to receive fanned-out events
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_usecase
        .execute(connection_id.clone(), tx)
        .await;

    let (sender, receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        receive_loop(receiver, state_clone, connection_id_clone).await;
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Transport-level disconnect. The registry entry is removed only if this
    // connection still owns it; a session superseded by a reconnect leaves
    // the roster untouched and nothing is broadcast.
    let (removed, snapshot) = state.disconnect_usecase.execute(&connection_id).await;

    if let Some(entry) = removed {
        let online_users = roster_to_dto(snapshot);

        let left_msg = ServerEvent::UserLeft(PresencePayload {
            display_name: entry.display_name.clone(),
            online_users: online_users.clone(),
        });
        let left_json = serde_json::to_string(&left_msg).unwrap();
        if let Err(e) = state.disconnect_usecase.broadcast_user_left(&left_json).await {
            tracing::warn!("Failed to broadcast user-left: {}", e);
        }

        let roster_msg = ServerEvent::OnlineUsers(RosterPayload { online_users });
        let roster_json = serde_json::to_string(&roster_msg).unwrap();
        if let Err(e) = state.disconnect_usecase.broadcast_roster(&roster_json).await {
            tracing::warn!("Failed to broadcast roster after disconnect: {}", e);
        }

        tracing::info!("'{}' left the chat", entry.display_name);
    }
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) {
    // Tracks the CONNECTED → JOINED transition for this connection
    let mut joined = false;

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                if let Err(e) = handle_event(&state, &connection_id, &text, &mut joined).await {
                    // Degraded payloads are dropped with a diagnostic instead
                    // of being propagated into the roster or the room.
                    tracing::warn!("Dropping event from connection '{}': {}", connection_id, e);
                }
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            _ => {}
        }
    }
}

/// Route one inbound event through the matching usecase.
///
/// Handlers run to completion one event at a time per connection, in the
/// order the transport delivered them. There is no cross-connection
/// ordering guarantee.
async fn handle_event(
    state: &AppState,
    connection_id: &ConnectionId,
    text: &str,
    joined: &mut bool,
) -> Result<(), EventError> {
    let event: ClientEvent = serde_json::from_str(text)?;

    match event {
        ClientEvent::Join(payload) => {
            let request = JoinRequest::try_from(payload)?;
            let display_name = request.display_name.clone();

            if *joined {
                // A second join on the same connection is another upsert
                // (last-write-wins), same as a rejoin from a new connection.
                tracing::debug!("Connection '{}' rejoined as '{}'", connection_id, display_name);
            }

            let snapshot = state.join_room_usecase.execute(connection_id, request).await;
            *joined = true;

            let online_users = roster_to_dto(snapshot);

            // (a) updated roster to ALL connections, the joiner included
            let roster_msg = ServerEvent::OnlineUsers(RosterPayload {
                online_users: online_users.clone(),
            });
            let roster_json = serde_json::to_string(&roster_msg).unwrap();
            if let Err(e) = state.join_room_usecase.broadcast_roster(&roster_json).await {
                tracing::warn!("Failed to broadcast roster: {}", e);
            }

            // (b) joined notice + roster to everyone EXCEPT the joiner
            let joined_msg = ServerEvent::UserJoined(PresencePayload {
                display_name: display_name.clone(),
                online_users,
            });
            let joined_json = serde_json::to_string(&joined_msg).unwrap();
            if let Err(e) = state
                .join_room_usecase
                .broadcast_user_joined(connection_id, &joined_json)
                .await
            {
                tracing::warn!("Failed to broadcast user-joined: {}", e);
            }

            tracing::info!("'{}' joined the chat", display_name);
        }
        ClientEvent::Message(payload) => {
            // Sender identity is taken from the payload as-is; it is not
            // checked against the roster entry this connection registered.
            let message = ChatMessage::try_from(payload)?;
            tracing::info!("Message received from '{}'", message.user_id);

            let echo = ServerEvent::Message(message.into());
            let echo_json = serde_json::to_string(&echo).unwrap();
            if let Err(e) = state
                .send_message_usecase
                .execute(connection_id, &echo_json)
                .await
            {
                tracing::warn!("Failed to broadcast message: {}", e);
            }
        }
        ClientEvent::Typing(payload) => {
            let notice = TypingNotice::try_from(payload)?;
            let typing_json =
                serde_json::to_string(&ServerEvent::Typing(notice.into())).unwrap();
            if let Err(e) = state
                .typing_usecase
                .forward(connection_id, &typing_json)
                .await
            {
                tracing::warn!("Failed to forward typing: {}", e);
            }
        }
        ClientEvent::StopTyping(payload) => {
            let notice = TypingNotice::try_from(payload)?;
            let stop_json =
                serde_json::to_string(&ServerEvent::StopTyping(notice.into())).unwrap();
            if let Err(e) = state
                .typing_usecase
                .forward(connection_id, &stop_json)
                .await
            {
                tracing::warn!("Failed to forward stop-typing: {}", e);
            }
        }
    }

    Ok(())
}
