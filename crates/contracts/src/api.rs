use serde::{Deserialize, Serialize};

use crate::{
    Counter, GameEvent, GameSession, Outcome, Polarity, SessionCounters, StatDeltas, Stats,
    SCHEMA_VERSION_V1,
};

/// Body of `POST /api/game/action`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PerformActionRequest {
    pub game_id: String,
    pub action: String,
}

/// Result of one accepted turn: the new session, the event that fired (if
/// any) and the merged stat changes to display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub game_state: GameSession,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<GameEvent>,
    pub changes: StatDeltas,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub effects: StatDeltas,
    pub counter: Option<Counter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub effects: StatDeltas,
    pub probability: f64,
    pub polarity: Polarity,
    pub counter: Option<Counter>,
}

/// End-of-game statistics for the result screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub outcome: Outcome,
    pub day: u32,
    pub semester: u32,
    pub total_days: u32,
    pub stats: Stats,
    pub counters: SessionCounters,
    pub events_logged: usize,
    pub positive_events: usize,
    pub negative_events: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionListing {
    pub id: String,
    pub day: u32,
    pub semester: u32,
    pub total_days: u32,
    pub outcome: Outcome,
    pub updated_at: String,
}

impl SessionListing {
    pub fn from_session(session: &GameSession, updated_at: impl Into<String>) -> Self {
        Self {
            id: session.id.clone(),
            day: session.day,
            semester: session.semester,
            total_days: session.total_days,
            outcome: session.outcome(),
            updated_at: updated_at.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    SessionNotFound,
    UnknownAction,
    InvalidRequest,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}
