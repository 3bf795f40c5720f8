//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{DebugRosterEntryDto, DebugStateDto, StatusDto},
    ui::state::AppState,
};

/// Health check endpoint. Read-only: reflects the roster size at call time.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<StatusDto> {
    let online_users = state.status_usecase.online_count().await;

    Json(StatusDto {
        status: "OK".to_string(),
        message: "Chat relay server is running".to_string(),
        online_users,
    })
}

/// Debug endpoint to get current room state (for testing purposes)
pub async fn debug_state(State(state): State<Arc<AppState>>) -> Json<DebugStateDto> {
    let (room, members, roster) = state.status_usecase.room_state().await;

    Json(DebugStateDto {
        room: room.as_str().to_string(),
        members: members
            .into_iter()
            .map(|connection_id| connection_id.into_string())
            .collect(),
        roster: roster
            .into_iter()
            .map(|entry| DebugRosterEntryDto {
                connection_id: entry.connection_id.into_string(),
                user_id: entry.user_id.into_string(),
                display_name: entry.display_name,
                avatar_url: entry.avatar_url,
                connected_at: entry.connected_at,
            })
            .collect(),
    })
}
