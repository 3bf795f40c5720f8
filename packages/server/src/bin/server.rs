//! Chat relay server: presence tracking and message/typing fan-out.
//!
//! Tracks which users are online, brokers chat messages and typing events
//! among all connected clients, and keeps the online-user roster consistent
//! across joins, reconnects, and disconnects.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3001
//! PORT=4000 cargo run --bin idobata-server
//! ```

use std::sync::Arc;

use clap::Parser;

use idobata_server::{
    domain::RoomName,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
    },
    ui::Server,
    usecase::{
        ConnectUseCase, DisconnectUseCase, JoinRoomUseCase, SendMessageUseCase, StatusUseCase,
        TypingUseCase,
    },
};
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Chat relay server: presence and broadcast over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Origin trusted for the transport handshake
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    allowed_origin: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(
        &["idobata_server", "idobata_shared", env!("CARGO_BIN_NAME")],
        "debug",
    );

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Connection Registry with the single chat room
    let room = RoomName::new("chat-room".to_string()).expect("room name is non-empty");
    let registry = Arc::new(InMemoryConnectionRegistry::new(room.clone()));
    tracing::info!("Room '{}' created!", room);

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let connect_usecase = Arc::new(ConnectUseCase::new(message_pusher.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        room.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        room.clone(),
    ));
    let typing_usecase = Arc::new(TypingUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        room.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        room.clone(),
    ));
    let status_usecase = Arc::new(StatusUseCase::new(registry.clone(), room));

    // 4. Create and run the server
    let server = Server::new(
        connect_usecase,
        join_room_usecase,
        send_message_usecase,
        typing_usecase,
        disconnect_usecase,
        status_usecase,
        args.allowed_origin,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
