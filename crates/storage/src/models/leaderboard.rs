use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row of the `event_with_round` view: the event joined to each of its
/// rounds, with the derived current round attached. Round columns are NULL
/// for an event that has no rounds.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithRoundRow {
    pub id: i64,
    pub name: String,
    pub data: JsonValue,
    pub started_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_round_id: Option<i64>,
    pub current_round_name: Option<String>,
    pub round_id: Option<i64>,
    pub round_name: Option<String>,
    pub round_data: Option<JsonValue>,
    pub round_scoring: Option<Vec<i64>>,
    pub round_ended_at: Option<DateTime<Utc>>,
    pub round_created_at: Option<DateTime<Utc>>,
    pub round_updated_at: Option<DateTime<Utc>>,
}

/// One row of the `event_leaderboard` view: an event user with their
/// all-time score and dense rank within the event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventLeaderboardRow {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub score: i64,
    pub ranking: i64,
    pub data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the `event_round_leaderboard` view: a submitted result with
/// its points (the round's scoring table applied to the raw placement) and
/// dense rank within the round.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventRoundLeaderboardRow {
    pub id: i64,
    pub event_id: i64,
    pub round_name: String,
    pub event_user_id: i64,
    pub event_round_id: i64,
    pub result: i64,
    pub score: i64,
    pub ranking: i64,
    pub data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
