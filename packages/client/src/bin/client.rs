//! CLI chat client with reconnection support.
//!
//! Connects to the idobata relay, joins the room with the given identity,
//! and sends messages from stdin. Displays the roster, join/left notices,
//! chat messages, and who is currently typing. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-client -- --user-id alice@example.com --display-name Alice
//! cargo run --bin idobata-client -- -i bob@example.com
//! ```

use clap::Parser;

use idobata_client::{runner::run_client, session::Identity};
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI chat client for the idobata relay", long_about = None)]
struct Args {
    /// Stable user identity (e.g. an email or account key)
    #[arg(short = 'i', long)]
    user_id: String,

    /// Human-readable name shown to other users (defaults to the user id)
    #[arg(short = 'n', long)]
    display_name: Option<String>,

    /// Avatar URL, passed through to other clients unmodified
    #[arg(short = 'a', long, default_value = "")]
    avatar_url: String,

    /// WebSocket relay URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3001/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&["idobata_client", env!("CARGO_BIN_NAME")], "info");

    let args = Args::parse();

    let identity = Identity {
        display_name: args.display_name.unwrap_or_else(|| args.user_id.clone()),
        user_id: args.user_id,
        avatar_url: args.avatar_url,
    };

    if let Err(e) = run_client(args.url, identity).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
