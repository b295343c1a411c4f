use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use storage::dto::event::{
    AddEventResultError, AddEventResultRequest, AddEventResultResponse, EventRef,
};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::{EventService, Limits};
use crate::invoker::Command;

/// Submits a user's result for the event's current round. The event user is
/// created or refreshed on the way (idempotent upsert); the result insert is
/// guarded on the round still being current.
pub struct AddEventResultCommand {
    service: Arc<EventService>,
    request: AddEventResultRequest,
}

struct ValidatedResult<'a> {
    user_id: i64,
    result: i64,
    user_data: &'a JsonValue,
    round_user_data: &'a JsonValue,
}

fn validate<'a>(
    limits: &Limits,
    request: &'a AddEventResultRequest,
) -> std::result::Result<ValidatedResult<'a>, AddEventResultError> {
    if let Some(err) = limits.check_event_ref(&request.event) {
        return Err(err.into());
    }
    let Some(user_id) = request.user_id else {
        return Err(AddEventResultError::UserIdRequired);
    };
    let Some(result) = request.result else {
        return Err(AddEventResultError::ResultRequired);
    };
    let Some(user_data) = &request.user_data else {
        return Err(AddEventResultError::UserDataRequired);
    };
    let Some(round_user_data) = &request.round_user_data else {
        return Err(AddEventResultError::RoundUserDataRequired);
    };
    Ok(ValidatedResult {
        user_id,
        result,
        user_data,
        round_user_data,
    })
}

impl AddEventResultCommand {
    pub fn new(service: Arc<EventService>, request: AddEventResultRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for AddEventResultCommand {
    const NAME: &'static str = "AddEventResult";

    type Request = AddEventResultRequest;
    type Response = AddEventResultResponse;

    fn request(&self) -> &AddEventResultRequest {
        &self.request
    }

    async fn execute(&self) -> Result<AddEventResultResponse> {
        let validated = match validate(&self.service.limits, &self.request) {
            Ok(validated) => validated,
            Err(error) => return Ok(AddEventResultResponse::failure(error)),
        };
        let mut tx = self.service.db.pool().begin().await?;
        // Resolve the event up front so the upsert and the guarded insert
        // address the same event.
        let Some(event) = events::get_event(&mut *tx, &self.request.event).await? else {
            return Ok(AddEventResultResponse::failure(
                AddEventResultError::NotFound,
            ));
        };
        let event_ref = EventRef {
            id: Some(event.id),
            name: None,
        };
        let event_user_id =
            events::upsert_event_user(&mut *tx, event.id, validated.user_id, validated.user_data)
                .await?;
        match events::insert_round_result(
            &mut *tx,
            event_user_id,
            &event_ref,
            validated.result,
            validated.round_user_data,
        )
        .await
        {
            // The guarded insert no-ops once every round has ended.
            Ok(0) => {
                return Ok(AddEventResultResponse::failure(
                    AddEventResultError::EventEnded,
                ));
            }
            Ok(_) => {}
            Err(err) if err.unique_constraint() == Some(events::ROUND_USER_KEY) => {
                return Ok(AddEventResultResponse::failure(
                    AddEventResultError::AlreadyExists,
                ));
            }
            Err(err) => return Err(err),
        }
        tx.commit().await?;
        Ok(AddEventResultResponse::ok())
    }
}

#[cfg(test)]
mod tests {
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

    fn valid_request() -> AddEventResultRequest {
        AddEventResultRequest {
            event: EventRef {
                id: Some(1),
                name: None,
            },
            user_id: Some(42),
            result: Some(0),
            user_data: Some(serde_json::json!({})),
            round_user_data: Some(serde_json::json!({})),
        }
    }

    fn error_for(request: &AddEventResultRequest) -> Option<AddEventResultError> {
        validate(&limits(), request).err()
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(error_for(&valid_request()), None);
    }

    #[test]
    fn result_zero_is_a_valid_placement() {
        let request = valid_request();
        assert_eq!(request.result, Some(0));
        assert_eq!(error_for(&request), None);
    }

    #[test]
    fn missing_user_id_is_rejected() {
        let mut request = valid_request();
        request.user_id = None;
        assert_eq!(
            error_for(&request),
            Some(AddEventResultError::UserIdRequired)
        );
    }

    #[test]
    fn missing_result_is_rejected() {
        let mut request = valid_request();
        request.result = None;
        assert_eq!(
            error_for(&request),
            Some(AddEventResultError::ResultRequired)
        );
    }

    #[test]
    fn missing_round_user_data_is_rejected() {
        let mut request = valid_request();
        request.round_user_data = None;
        assert_eq!(
            error_for(&request),
            Some(AddEventResultError::RoundUserDataRequired)
        );
    }
}
