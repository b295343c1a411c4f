use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{UpdateEventRoundError, UpdateEventRoundRequest, UpdateEventRoundResponse};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Partially updates a round: data, scoring, or both. Providing neither is
/// NO_UPDATE_SPECIFIED before anything is written.
pub struct UpdateEventRoundCommand {
    service: Arc<EventService>,
    request: UpdateEventRoundRequest,
}

impl UpdateEventRoundCommand {
    pub fn new(service: Arc<EventService>, request: UpdateEventRoundRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for UpdateEventRoundCommand {
    const NAME: &'static str = "UpdateEventRound";

    type Request = UpdateEventRoundRequest;
    type Response = UpdateEventRoundResponse;

    fn request(&self) -> &UpdateEventRoundRequest {
        &self.request
    }

    async fn execute(&self) -> Result<UpdateEventRoundResponse> {
        if let Some(err) = self.service.limits.check_round_ref(&self.request.round) {
            return Ok(UpdateEventRoundResponse::failure(err.into()));
        }
        let data = self.request.data.as_ref();
        let scoring = self
            .request
            .scoring
            .as_deref()
            .filter(|scoring| !scoring.is_empty());
        if data.is_none() && scoring.is_none() {
            return Ok(UpdateEventRoundResponse::failure(
                UpdateEventRoundError::NoUpdateSpecified,
            ));
        }
        let pool = self.service.db.pool();
        let affected = events::update_round(pool, &self.request.round, data, scoring).await?;
        if affected == 0 && !events::round_exists(pool, &self.request.round).await? {
            return Ok(UpdateEventRoundResponse::failure(
                UpdateEventRoundError::NotFound,
            ));
        }
        Ok(UpdateEventRoundResponse::ok())
    }
}
