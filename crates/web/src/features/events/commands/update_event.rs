use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{UpdateEventError, UpdateEventRequest, UpdateEventResponse};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Replaces an event's data blob. Zero rows affected is disambiguated by an
/// existence check: a missing event is NOT_FOUND, a no-op update succeeds.
pub struct UpdateEventCommand {
    service: Arc<EventService>,
    request: UpdateEventRequest,
}

impl UpdateEventCommand {
    pub fn new(service: Arc<EventService>, request: UpdateEventRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for UpdateEventCommand {
    const NAME: &'static str = "UpdateEvent";

    type Request = UpdateEventRequest;
    type Response = UpdateEventResponse;

    fn request(&self) -> &UpdateEventRequest {
        &self.request
    }

    async fn execute(&self) -> Result<UpdateEventResponse> {
        if let Some(err) = self.service.limits.check_event_ref(&self.request.event) {
            return Ok(UpdateEventResponse::failure(err.into()));
        }
        let Some(data) = &self.request.data else {
            return Ok(UpdateEventResponse::failure(UpdateEventError::DataRequired));
        };
        let pool = self.service.db.pool();
        let affected = events::update_event_data(pool, &self.request.event, data).await?;
        if affected == 0 && !events::event_exists(pool, &self.request.event).await? {
            return Ok(UpdateEventResponse::failure(UpdateEventError::NotFound));
        }
        Ok(UpdateEventResponse::ok())
    }
}
