use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use storage::dto::event::{CreateEventError, CreateEventRequest, CreateEventResponse};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::{EventService, Limits};
use crate::invoker::Command;

/// Creates an event together with its full round schedule. The event and
/// every round land in one transaction; any failure rolls back the lot.
pub struct CreateEventCommand {
    service: Arc<EventService>,
    request: CreateEventRequest,
}

/// The request with every required field proven present, so the write path
/// never re-unwraps options.
struct ValidatedEvent<'a> {
    data: &'a JsonValue,
    started_at: DateTime<Utc>,
    rounds: Vec<ValidatedRound<'a>>,
}

struct ValidatedRound<'a> {
    name: &'a str,
    data: &'a JsonValue,
    scoring: &'a [i64],
    ended_at: DateTime<Utc>,
}

fn validate<'a>(
    limits: &Limits,
    request: &'a CreateEventRequest,
) -> std::result::Result<ValidatedEvent<'a>, CreateEventError> {
    if request.name.len() < limits.min_event_name_length {
        return Err(CreateEventError::NameTooShort);
    }
    if request.name.len() > limits.max_event_name_length {
        return Err(CreateEventError::NameTooLong);
    }
    let Some(data) = &request.data else {
        return Err(CreateEventError::DataRequired);
    };
    let Some(started_at) = request.started_at else {
        return Err(CreateEventError::StartedAtRequired);
    };
    if started_at <= Utc::now() {
        return Err(CreateEventError::StartedAtInThePast);
    }
    if request.rounds.is_empty() {
        return Err(CreateEventError::RoundsRequired);
    }
    if request.rounds.len() > limits.max_number_of_rounds {
        return Err(CreateEventError::TooManyRounds);
    }
    let mut rounds = Vec::with_capacity(request.rounds.len());
    for round in &request.rounds {
        if round.name.len() < limits.min_round_name_length {
            return Err(CreateEventError::RoundNameTooShort);
        }
        if round.name.len() > limits.max_round_name_length {
            return Err(CreateEventError::RoundNameTooLong);
        }
        let Some(round_data) = &round.data else {
            return Err(CreateEventError::RoundDataRequired);
        };
        let Some(ended_at) = round.ended_at else {
            return Err(CreateEventError::RoundEndedAtRequired);
        };
        if ended_at < started_at {
            return Err(CreateEventError::RoundEndedAtBeforeStartedAt);
        }
        if round.scoring.is_empty() {
            return Err(CreateEventError::RoundScoringRequired);
        }
        rounds.push(ValidatedRound {
            name: &round.name,
            data: round_data,
            scoring: &round.scoring,
            ended_at,
        });
    }
    Ok(ValidatedEvent {
        data,
        started_at,
        rounds,
    })
}

impl CreateEventCommand {
    pub fn new(service: Arc<EventService>, request: CreateEventRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for CreateEventCommand {
    const NAME: &'static str = "CreateEvent";

    type Request = CreateEventRequest;
    type Response = CreateEventResponse;

    fn request(&self) -> &CreateEventRequest {
        &self.request
    }

    async fn execute(&self) -> Result<CreateEventResponse> {
        let validated = match validate(&self.service.limits, &self.request) {
            Ok(validated) => validated,
            Err(error) => return Ok(CreateEventResponse::failure(error)),
        };
        let mut tx = self.service.db.pool().begin().await?;
        let event_id = match events::create_event(
            &mut *tx,
            &self.request.name,
            validated.data,
            validated.started_at,
        )
        .await
        {
            Ok(id) => id,
            Err(err) => {
                return match err.unique_constraint() {
                    Some(events::EVENT_NAME_KEY) => {
                        Ok(CreateEventResponse::failure(CreateEventError::AlreadyExists))
                    }
                    _ => Err(err),
                };
            }
        };
        for round in &validated.rounds {
            if let Err(err) = events::create_round(
                &mut *tx,
                event_id,
                round.name,
                round.data,
                round.scoring,
                round.ended_at,
            )
            .await
            {
                return match err.unique_constraint() {
                    Some(events::ROUND_NAME_KEY) => Ok(CreateEventResponse::failure(
                        CreateEventError::DuplicateRoundName,
                    )),
                    Some(events::ROUND_ENDED_AT_KEY) => Ok(CreateEventResponse::failure(
                        CreateEventError::DuplicateRoundEndedAt,
                    )),
                    _ => Err(err),
                };
            }
        }
        tx.commit().await?;
        Ok(CreateEventResponse::created(event_id))
    }
}

#[cfg(test)]
mod tests {
    use storage::dto::event::NewEventRound;

    use super::*;

    fn limits() -> Limits {
        Limits {
            min_event_name_length: 3,
            max_event_name_length: 20,
            min_round_name_length: 3,
            max_round_name_length: 20,
            max_number_of_rounds: 10,
            default_page_length: 10,
            max_page_length: 100,
        }
    }

    fn valid_request() -> CreateEventRequest {
        CreateEventRequest {
            name: "sprint".to_owned(),
            data: Some(serde_json::json!({})),
            started_at: Some(Utc::now() + chrono::Duration::hours(1)),
            rounds: vec![NewEventRound {
                name: "opening".to_owned(),
                data: Some(serde_json::json!({})),
                scoring: vec![10, 5, 1],
                ended_at: Some(Utc::now() + chrono::Duration::hours(2)),
            }],
        }
    }

    fn error_for(request: &CreateEventRequest) -> Option<CreateEventError> {
        validate(&limits(), request).err()
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(error_for(&valid_request()), None);
    }

    #[test]
    fn short_name_is_rejected() {
        let mut request = valid_request();
        request.name = "ab".to_owned();
        assert_eq!(error_for(&request), Some(CreateEventError::NameTooShort));
    }

    #[test]
    fn missing_data_is_rejected() {
        let mut request = valid_request();
        request.data = None;
        assert_eq!(error_for(&request), Some(CreateEventError::DataRequired));
    }

    #[test]
    fn past_start_is_rejected() {
        let mut request = valid_request();
        request.started_at = Some(Utc::now() - chrono::Duration::hours(1));
        assert_eq!(
            error_for(&request),
            Some(CreateEventError::StartedAtInThePast)
        );
    }

    #[test]
    fn missing_rounds_are_rejected() {
        let mut request = valid_request();
        request.rounds.clear();
        assert_eq!(error_for(&request), Some(CreateEventError::RoundsRequired));
    }

    #[test]
    fn too_many_rounds_are_rejected() {
        let mut request = valid_request();
        let round = request.rounds[0].clone();
        request.rounds = (0..11)
            .map(|i| {
                let mut round = round.clone();
                round.name = format!("round-{i}");
                round.ended_at = Some(Utc::now() + chrono::Duration::hours(2 + i));
                round
            })
            .collect();
        assert_eq!(error_for(&request), Some(CreateEventError::TooManyRounds));
    }

    #[test]
    fn round_ending_before_start_is_rejected() {
        let mut request = valid_request();
        request.rounds[0].ended_at = Some(Utc::now() + chrono::Duration::minutes(30));
        assert_eq!(
            error_for(&request),
            Some(CreateEventError::RoundEndedAtBeforeStartedAt)
        );
    }

    #[test]
    fn empty_scoring_is_rejected() {
        let mut request = valid_request();
        request.rounds[0].scoring.clear();
        assert_eq!(
            error_for(&request),
            Some(CreateEventError::RoundScoringRequired)
        );
    }
}
