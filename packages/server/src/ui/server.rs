//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header::InvalidHeaderValue},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::usecase::{
    ConnectUseCase, DisconnectUseCase, JoinRoomUseCase, SendMessageUseCase, StatusUseCase,
    TypingUseCase,
};

use super::{
    handler::{
        http::{debug_state, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chat relay server
///
/// Builds the axum router over the broker usecases and runs it with
/// graceful shutdown.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_usecase,
///     join_room_usecase,
///     send_message_usecase,
///     typing_usecase,
///     disconnect_usecase,
///     status_usecase,
///     "http://localhost:3000".to_string(),
/// );
/// server.run("127.0.0.1".to_string(), 3001).await?;
/// ```
pub struct Server {
    /// ConnectUseCase（接続受付のユースケース）
    connect_usecase: Arc<ConnectUseCase>,
    /// JoinRoomUseCase（join イベントのユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendMessageUseCase（message イベントのユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// TypingUseCase（typing / stopTyping イベントのユースケース）
    typing_usecase: Arc<TypingUseCase>,
    /// DisconnectUseCase（切断処理のユースケース）
    disconnect_usecase: Arc<DisconnectUseCase>,
    /// StatusUseCase（死活監視のユースケース）
    status_usecase: Arc<StatusUseCase>,
    /// トランスポートのハンドシェイクで信頼する Origin
    allowed_origin: String,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_usecase: Arc<ConnectUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        typing_usecase: Arc<TypingUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        status_usecase: Arc<StatusUseCase>,
        allowed_origin: String,
    ) -> Self {
        Self {
            connect_usecase,
            join_room_usecase,
            send_message_usecase,
            typing_usecase,
            disconnect_usecase,
            status_usecase,
            allowed_origin,
        }
    }

    /// Build the axum router.
    ///
    /// Fails only when the configured origin is not a valid header value.
    pub fn router(self) -> Result<Router, InvalidHeaderValue> {
        let origin: HeaderValue = self.allowed_origin.parse()?;
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST]);

        let app_state = Arc::new(AppState {
            connect_usecase: self.connect_usecase,
            join_room_usecase: self.join_room_usecase,
            send_message_usecase: self.send_message_usecase,
            typing_usecase: self.typing_usecase,
            disconnect_usecase: self.disconnect_usecase,
            status_usecase: self.status_usecase,
        });

        Ok(Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/debug/state", get(debug_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(app_state))
    }

    /// Run the chat relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3001)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router()?;

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Chat relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Health check: http://{}/health", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
