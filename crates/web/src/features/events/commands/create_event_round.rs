use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use storage::dto::event::{
    CreateEventRoundError, CreateEventRoundRequest, CreateEventRoundResponse, NewEventRound,
};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::{EventService, Limits};
use crate::invoker::Command;

/// Adds a round to an existing event. The parent event is read row-locked
/// inside the transaction so the insert serializes against a concurrent
/// delete of the event.
pub struct CreateEventRoundCommand {
    service: Arc<EventService>,
    request: CreateEventRoundRequest,
}

struct ValidatedRound<'a> {
    name: &'a str,
    data: &'a JsonValue,
    scoring: &'a [i64],
    ended_at: DateTime<Utc>,
}

fn validate<'a>(
    limits: &Limits,
    request: &'a CreateEventRoundRequest,
) -> std::result::Result<ValidatedRound<'a>, CreateEventRoundError> {
    if let Some(err) = limits.check_event_ref(&request.event) {
        return Err(err.into());
    }
    let Some(round) = &request.round else {
        return Err(CreateEventRoundError::RoundRequired);
    };
    if round.name.len() < limits.min_round_name_length {
        return Err(CreateEventRoundError::RoundNameTooShort);
    }
    if round.name.len() > limits.max_round_name_length {
        return Err(CreateEventRoundError::RoundNameTooLong);
    }
    let Some(data) = &round.data else {
        return Err(CreateEventRoundError::RoundDataRequired);
    };
    let Some(ended_at) = round.ended_at else {
        return Err(CreateEventRoundError::RoundEndedAtRequired);
    };
    if ended_at <= Utc::now() {
        return Err(CreateEventRoundError::RoundEndedAtInThePast);
    }
    if round.scoring.is_empty() {
        return Err(CreateEventRoundError::RoundScoringRequired);
    }
    Ok(ValidatedRound {
        name: &round.name,
        data,
        scoring: &round.scoring,
        ended_at,
    })
}

impl CreateEventRoundCommand {
    pub fn new(service: Arc<EventService>, request: CreateEventRoundRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for CreateEventRoundCommand {
    const NAME: &'static str = "CreateEventRound";

    type Request = CreateEventRoundRequest;
    type Response = CreateEventRoundResponse;

    fn request(&self) -> &CreateEventRoundRequest {
        &self.request
    }

    async fn execute(&self) -> Result<CreateEventRoundResponse> {
        let round = match validate(&self.service.limits, &self.request) {
            Ok(round) => round,
            Err(error) => return Ok(CreateEventRoundResponse::failure(error)),
        };
        let mut tx = self.service.db.pool().begin().await?;
        let Some(event) = events::get_event_for_update(&mut *tx, &self.request.event).await? else {
            return Ok(CreateEventRoundResponse::failure(
                CreateEventRoundError::NotFound,
            ));
        };
        if round.ended_at < event.started_at {
            return Ok(CreateEventRoundResponse::failure(
                CreateEventRoundError::RoundEndedAtBeforeStartedAt,
            ));
        }
        let round_id = match events::create_round(
            &mut *tx,
            event.id,
            round.name,
            round.data,
            round.scoring,
            round.ended_at,
        )
        .await
        {
            Ok(id) => id,
            Err(err) => {
                return match err.unique_constraint() {
                    Some(events::ROUND_NAME_KEY) => Ok(CreateEventRoundResponse::failure(
                        CreateEventRoundError::DuplicateRoundName,
                    )),
                    Some(events::ROUND_ENDED_AT_KEY) => Ok(CreateEventRoundResponse::failure(
                        CreateEventRoundError::DuplicateRoundEndedAt,
                    )),
                    _ => Err(err),
                };
            }
        };
        tx.commit().await?;
        Ok(CreateEventRoundResponse::created(round_id))
    }
}

#[cfg(test)]
mod tests {
    use storage::dto::event::EventRef;

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

    fn valid_request() -> CreateEventRoundRequest {
        CreateEventRoundRequest {
            event: EventRef {
                id: Some(1),
                name: None,
            },
            round: Some(NewEventRound {
                name: "finals".to_owned(),
                data: Some(serde_json::json!({})),
                scoring: vec![10, 5, 1],
                ended_at: Some(Utc::now() + chrono::Duration::hours(2)),
            }),
        }
    }

    fn error_for(request: &CreateEventRoundRequest) -> Option<CreateEventRoundError> {
        validate(&limits(), request).err()
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(error_for(&valid_request()), None);
    }

    #[test]
    fn missing_event_ref_is_rejected() {
        let mut request = valid_request();
        request.event = EventRef::default();
        assert_eq!(
            error_for(&request),
            Some(CreateEventRoundError::IdOrNameRequired)
        );
    }

    #[test]
    fn missing_round_is_rejected() {
        let mut request = valid_request();
        request.round = None;
        assert_eq!(error_for(&request), Some(CreateEventRoundError::RoundRequired));
    }

    #[test]
    fn round_ending_in_the_past_is_rejected() {
        let mut request = valid_request();
        request.round.as_mut().unwrap().ended_at = Some(Utc::now() - chrono::Duration::hours(1));
        assert_eq!(
            error_for(&request),
            Some(CreateEventRoundError::RoundEndedAtInThePast)
        );
    }

    #[test]
    fn empty_scoring_is_rejected() {
        let mut request = valid_request();
        request.round.as_mut().unwrap().scoring.clear();
        assert_eq!(
            error_for(&request),
            Some(CreateEventRoundError::RoundScoringRequired)
        );
    }
}
