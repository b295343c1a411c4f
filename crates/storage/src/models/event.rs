use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub data: JsonValue,
    pub started_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scoring segment of an event. `scoring` maps a 0-indexed placement to
/// the points it awards; `ended_at` is unique within the event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventRound {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub data: JsonValue,
    pub scoring: Vec<i64>,
    pub ended_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in an event, created lazily on first result
/// submission and upserted on (event_id, user_id) conflict.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventUser {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single submitted result, at most one per (event_user, round).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventRoundUser {
    pub id: i64,
    pub event_user_id: i64,
    pub event_round_id: i64,
    pub result: i64,
    pub data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
