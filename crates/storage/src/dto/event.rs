use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::dto::common::Pagination;
use crate::models::{EventLeaderboardRow, EventRound, EventRoundLeaderboardRow, EventWithRoundRow};

/// Looks up an event by surrogate id or unique name. Absent fields are
/// absent, not zero; at least one must be present for the lookup to be
/// resolvable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EventRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Looks up a round by surrogate id, or by name within an event, or, when
/// both are absent, the event's current round.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RoundRef {
    pub event: EventRef,
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Looks up an event user by surrogate id, or by (event, user id).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EventUserRef {
    pub event: EventRef,
    pub id: Option<i64>,
    pub user_id: Option<i64>,
}

/// Looks up a submitted result by surrogate id, or by event user plus a
/// round name (the current round when the name is absent).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RoundUserRef {
    pub user: EventUserRef,
    pub id: Option<i64>,
    pub round_name: Option<String>,
}

/// Outcome of validating a lookup ref, mapped into each operation's error
/// enum at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    UserIdRequired,
}

// ---------------------------------------------------------------------------
// Requests

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NewEventRound {
    pub name: String,
    pub data: Option<JsonValue>,
    pub scoring: Vec<i64>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateEventRequest {
    pub name: String,
    pub data: Option<JsonValue>,
    pub started_at: Option<DateTime<Utc>>,
    pub rounds: Vec<NewEventRound>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateEventRoundRequest {
    pub event: EventRef,
    pub round: Option<NewEventRound>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AddEventResultRequest {
    pub event: EventRef,
    pub user_id: Option<i64>,
    /// Raw measurement for the current round, e.g. a 0-indexed placement.
    pub result: Option<i64>,
    pub user_data: Option<JsonValue>,
    pub round_user_data: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GetEventRequest {
    pub event: EventRef,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GetEventRoundRequest {
    pub round: RoundRef,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GetEventUserRequest {
    pub user: EventUserRef,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateEventRequest {
    pub event: EventRef,
    pub data: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateEventRoundRequest {
    pub round: RoundRef,
    pub data: Option<JsonValue>,
    pub scoring: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateEventUserRequest {
    pub user: EventUserRef,
    pub data: Option<JsonValue>,
}

// ---------------------------------------------------------------------------
// Responses

/// An event with its rounds and the derived current round, assembled from
/// `event_with_round` view rows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventWithRounds {
    pub id: i64,
    pub name: String,
    pub data: JsonValue,
    pub started_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_round_id: Option<i64>,
    pub current_round_name: Option<String>,
    pub rounds: Vec<EventRound>,
}

impl EventWithRounds {
    /// Folds the joined view rows back into one event. Returns `None` for an
    /// empty row set (event not found).
    pub fn from_rows(rows: Vec<EventWithRoundRow>) -> Option<Self> {
        let first = rows.first()?;
        let mut event = Self {
            id: first.id,
            name: first.name.clone(),
            data: first.data.clone(),
            started_at: first.started_at,
            created_at: first.created_at,
            updated_at: first.updated_at,
            current_round_id: first.current_round_id,
            current_round_name: first.current_round_name.clone(),
            rounds: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            let (Some(id), Some(name), Some(data), Some(scoring), Some(ended_at)) = (
                row.round_id,
                row.round_name,
                row.round_data,
                row.round_scoring,
                row.round_ended_at,
            ) else {
                continue;
            };
            event.rounds.push(EventRound {
                id,
                event_id: row.id,
                name,
                data,
                scoring,
                ended_at,
                created_at: row.round_created_at.unwrap_or(row.created_at),
                updated_at: row.round_updated_at.unwrap_or(row.updated_at),
            });
        }
        Some(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateEventError {
    NameTooShort,
    NameTooLong,
    DataRequired,
    StartedAtRequired,
    StartedAtInThePast,
    RoundsRequired,
    TooManyRounds,
    RoundNameTooShort,
    RoundNameTooLong,
    RoundDataRequired,
    RoundEndedAtRequired,
    RoundEndedAtBeforeStartedAt,
    RoundScoringRequired,
    AlreadyExists,
    DuplicateRoundName,
    DuplicateRoundEndedAt,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventResponse {
    pub success: bool,
    pub id: Option<i64>,
    pub error: Option<CreateEventError>,
}

impl CreateEventResponse {
    pub fn failure(error: CreateEventError) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error),
        }
    }

    pub fn created(id: i64) -> Self {
        Self {
            success: true,
            id: Some(id),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateEventRoundError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    RoundRequired,
    RoundNameTooShort,
    RoundNameTooLong,
    RoundDataRequired,
    RoundEndedAtRequired,
    RoundEndedAtInThePast,
    RoundEndedAtBeforeStartedAt,
    RoundScoringRequired,
    NotFound,
    DuplicateRoundName,
    DuplicateRoundEndedAt,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRoundResponse {
    pub success: bool,
    pub id: Option<i64>,
    pub error: Option<CreateEventRoundError>,
}

impl CreateEventRoundResponse {
    pub fn failure(error: CreateEventRoundError) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error),
        }
    }

    pub fn created(id: i64) -> Self {
        Self {
            success: true,
            id: Some(id),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddEventResultError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    UserIdRequired,
    ResultRequired,
    UserDataRequired,
    RoundUserDataRequired,
    NotFound,
    EventEnded,
    AlreadyExists,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddEventResultResponse {
    pub success: bool,
    pub error: Option<AddEventResultError>,
}

impl AddEventResultResponse {
    pub fn failure(error: AddEventResultError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GetEventError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GetEventResponse {
    pub success: bool,
    pub event: Option<EventWithRounds>,
    pub leaderboard: Vec<EventLeaderboardRow>,
    pub error: Option<GetEventError>,
}

impl GetEventResponse {
    pub fn failure(error: GetEventError) -> Self {
        Self {
            success: false,
            event: None,
            leaderboard: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GetEventRoundError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GetEventRoundResponse {
    pub success: bool,
    pub round: Option<EventRound>,
    pub results: Vec<EventRoundLeaderboardRow>,
    pub error: Option<GetEventRoundError>,
}

impl GetEventRoundResponse {
    pub fn failure(error: GetEventRoundError) -> Self {
        Self {
            success: false,
            round: None,
            results: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GetEventUserError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    UserIdRequired,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GetEventUserResponse {
    pub success: bool,
    pub user: Option<EventLeaderboardRow>,
    pub results: Vec<EventRoundLeaderboardRow>,
    pub error: Option<GetEventUserError>,
}

impl GetEventUserResponse {
    pub fn failure(error: GetEventUserError) -> Self {
        Self {
            success: false,
            user: None,
            results: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateEventError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    DataRequired,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventResponse {
    pub success: bool,
    pub error: Option<UpdateEventError>,
}

impl UpdateEventResponse {
    pub fn failure(error: UpdateEventError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateEventRoundError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    NoUpdateSpecified,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRoundResponse {
    pub success: bool,
    pub error: Option<UpdateEventRoundError>,
}

impl UpdateEventRoundResponse {
    pub fn failure(error: UpdateEventRoundError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateEventUserError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    UserIdRequired,
    DataRequired,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventUserResponse {
    pub success: bool,
    pub error: Option<UpdateEventUserError>,
}

impl UpdateEventUserResponse {
    pub fn failure(error: UpdateEventUserError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteEventError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteEventResponse {
    pub success: bool,
    pub error: Option<DeleteEventError>,
}

impl DeleteEventResponse {
    pub fn failure(error: DeleteEventError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteEventUserError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    UserIdRequired,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteEventUserResponse {
    pub success: bool,
    pub error: Option<DeleteEventUserError>,
}

impl DeleteEventUserResponse {
    pub fn failure(error: DeleteEventUserError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoveEventResultError {
    IdOrNameRequired,
    NameTooShort,
    NameTooLong,
    UserIdRequired,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoveEventResultResponse {
    pub success: bool,
    pub error: Option<RemoveEventResultError>,
}

impl RemoveEventResultResponse {
    pub fn failure(error: RemoveEventResultError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup error mapping

impl From<LookupError> for CreateEventRoundError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::IdOrNameRequired | LookupError::UserIdRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for AddEventResultError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::UserIdRequired => Self::UserIdRequired,
            LookupError::IdOrNameRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for GetEventError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::IdOrNameRequired | LookupError::UserIdRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for GetEventRoundError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::IdOrNameRequired | LookupError::UserIdRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for GetEventUserError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::UserIdRequired => Self::UserIdRequired,
            LookupError::IdOrNameRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for UpdateEventError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::IdOrNameRequired | LookupError::UserIdRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for UpdateEventRoundError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::IdOrNameRequired | LookupError::UserIdRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for UpdateEventUserError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::UserIdRequired => Self::UserIdRequired,
            LookupError::IdOrNameRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for DeleteEventError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::IdOrNameRequired | LookupError::UserIdRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for DeleteEventUserError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::UserIdRequired => Self::UserIdRequired,
            LookupError::IdOrNameRequired => Self::IdOrNameRequired,
        }
    }
}

impl From<LookupError> for RemoveEventResultError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NameTooShort => Self::NameTooShort,
            LookupError::NameTooLong => Self::NameTooLong,
            LookupError::UserIdRequired => Self::UserIdRequired,
            LookupError::IdOrNameRequired => Self::IdOrNameRequired,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn error_enums_use_wire_names() {
        assert_eq!(
            serde_json::to_string(&CreateEventError::NameTooShort).unwrap(),
            "\"NAME_TOO_SHORT\""
        );
        assert_eq!(
            serde_json::to_string(&AddEventResultError::EventEnded).unwrap(),
            "\"EVENT_ENDED\""
        );
        assert_eq!(
            serde_json::to_string(&UpdateEventRoundError::NoUpdateSpecified).unwrap(),
            "\"NO_UPDATE_SPECIFIED\""
        );
        assert_eq!(
            serde_json::to_string(&CreateEventError::DuplicateRoundEndedAt).unwrap(),
            "\"DUPLICATE_ROUND_ENDED_AT\""
        );
    }

    #[test]
    fn requests_deserialize_from_empty_objects() {
        let request: GetEventRequest = serde_json::from_str("{}").unwrap();
        assert!(request.event.id.is_none());
        assert!(request.event.name.is_none());
        assert!(request.pagination.page.is_none());
    }

    fn row(round: Option<(i64, &str)>) -> EventWithRoundRow {
        let now = Utc::now();
        EventWithRoundRow {
            id: 1,
            name: "sprint".to_owned(),
            data: serde_json::json!({}),
            started_at: now,
            created_at: now,
            updated_at: now,
            current_round_id: round.map(|(id, _)| id),
            current_round_name: round.map(|(_, name)| name.to_owned()),
            round_id: round.map(|(id, _)| id),
            round_name: round.map(|(_, name)| name.to_owned()),
            round_data: round.map(|_| serde_json::json!({})),
            round_scoring: round.map(|_| vec![10, 5, 1]),
            round_ended_at: round.map(|_| now + Duration::hours(1)),
            round_created_at: round.map(|_| now),
            round_updated_at: round.map(|_| now),
        }
    }

    #[test]
    fn from_rows_folds_rounds_into_one_event() {
        let rows = vec![row(Some((10, "opening"))), row(Some((11, "finals")))];
        let event = EventWithRounds::from_rows(rows).unwrap();
        assert_eq!(event.id, 1);
        assert_eq!(event.rounds.len(), 2);
        assert_eq!(event.current_round_id, Some(10));
        assert_eq!(event.rounds[1].id, 11);
    }

    #[test]
    fn from_rows_keeps_an_event_without_rounds() {
        let event = EventWithRounds::from_rows(vec![row(None)]).unwrap();
        assert!(event.rounds.is_empty());
        assert!(event.current_round_id.is_none());
    }

    #[test]
    fn from_rows_empty_means_not_found() {
        assert!(EventWithRounds::from_rows(Vec::new()).is_none());
    }
}
