//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    pub status: String,
    pub message: String,
    pub online_users: usize,
}

/// One roster entry as exposed by the debug endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugRosterEntryDto {
    pub connection_id: String,
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub connected_at: i64,
}

/// Response body of `GET /debug/state` (introspection only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugStateDto {
    pub room: String,
    pub members: Vec<String>,
    pub roster: Vec<DebugRosterEntryDto>,
}
