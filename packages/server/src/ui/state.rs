//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectUseCase, DisconnectUseCase, JoinRoomUseCase, SendMessageUseCase, StatusUseCase,
    TypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectUseCase（接続受付のユースケース）
    pub connect_usecase: Arc<ConnectUseCase>,
    /// JoinRoomUseCase（join イベントのユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendMessageUseCase（message イベントのユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// TypingUseCase（typing / stopTyping イベントのユースケース）
    pub typing_usecase: Arc<TypingUseCase>,
    /// DisconnectUseCase（切断処理のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// StatusUseCase（死活監視のユースケース）
    pub status_usecase: Arc<StatusUseCase>,
}
