//! WebSocket client session management.
//!
//! One session = one connection lifecycle: connect, claim an identity with
//! a `join` event, then run the read/write loops until the connection ends.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use idobata_server::infrastructure::dto::websocket::{
    ClientEvent, JoinPayload, MessagePayload, ServerEvent,
};
use idobata_shared::time::now_rfc3339;

use crate::{
    domain::TypingTracker, error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt,
};

/// The identity this client claims at join time.
///
/// The relay takes it at face value; it is bound to the session only through
/// the `join` event.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Run one WebSocket client session
pub async fn run_client_session(url: &str, identity: &Identity) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Http(response) => {
            ClientError::HandshakeRejected(response.status().as_u16())
        }
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to chat relay!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        identity.display_name
    );

    let (mut write, mut read) = ws_stream.split();

    // Claim the identity. Everything before this event is an anonymous
    // connection from the relay's point of view.
    let join = ClientEvent::Join(JoinPayload {
        user_id: identity.user_id.clone(),
        display_name: identity.display_name.clone(),
        avatar_url: identity.avatar_url.clone(),
    });
    let join_json =
        serde_json::to_string(&join).map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    write
        .send(Message::Text(join_json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    let my_user_id = identity.user_id.clone();
    let prompt_name = identity.display_name.clone();

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(async move {
        let mut typing = TypingTracker::new();
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::OnlineUsers(payload)) => {
                            let online_ids: Vec<String> = payload
                                .online_users
                                .iter()
                                .map(|user| user.user_id.clone())
                                .collect();
                            typing.retain_users(&online_ids);
                            MessageFormatter::format_roster(&payload.online_users, &my_user_id)
                        }
                        Ok(ServerEvent::UserJoined(payload)) => {
                            MessageFormatter::format_user_joined(&payload.display_name)
                        }
                        Ok(ServerEvent::UserLeft(payload)) => {
                            let online_ids: Vec<String> = payload
                                .online_users
                                .iter()
                                .map(|user| user.user_id.clone())
                                .collect();
                            typing.retain_users(&online_ids);
                            MessageFormatter::format_user_left(&payload.display_name)
                        }
                        Ok(ServerEvent::Message(payload)) => {
                            // A message ends the sender's typing state
                            typing.stop(&payload.user_id);
                            MessageFormatter::format_chat_message(
                                &payload.display_name,
                                &payload.content,
                                &payload.timestamp,
                            )
                        }
                        Ok(ServerEvent::Typing(payload)) => {
                            typing.start(&payload.user_id, &payload.display_name);
                            MessageFormatter::format_typing_status(&typing.typing_names())
                        }
                        Ok(ServerEvent::StopTyping(payload)) => {
                            typing.stop(&payload.user_id);
                            MessageFormatter::format_typing_status(&typing.typing_names())
                        }
                        Err(e) => {
                            tracing::debug!("Unrecognized event: {}", e);
                            MessageFormatter::format_raw_message(&text)
                        }
                    };

                    if !formatted.is_empty() {
                        print!("{}", formatted);
                        redisplay_prompt(&prompt_name);
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_identity = identity.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_identity.display_name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn stdin lines into message events
    let sender_identity = identity.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = ClientEvent::Message(MessagePayload {
                user_id: sender_identity.user_id.clone(),
                content: line,
                display_name: sender_identity.display_name.clone(),
                avatar_url: sender_identity.avatar_url.clone(),
                timestamp: now_rfc3339(),
            });

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
    }

    Ok(())
}
