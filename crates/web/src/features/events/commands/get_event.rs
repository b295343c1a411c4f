use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{EventWithRounds, GetEventError, GetEventRequest, GetEventResponse};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Fetches an event with its rounds, the derived current round and a
/// paginated slice of the all-time leaderboard. An empty leaderboard is
/// success; a missing event is NOT_FOUND.
pub struct GetEventCommand {
    service: Arc<EventService>,
    request: GetEventRequest,
}

impl GetEventCommand {
    pub fn new(service: Arc<EventService>, request: GetEventRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for GetEventCommand {
    const NAME: &'static str = "GetEvent";

    type Request = GetEventRequest;
    type Response = GetEventResponse;

    fn request(&self) -> &GetEventRequest {
        &self.request
    }

    async fn execute(&self) -> Result<GetEventResponse> {
        if let Some(err) = self.service.limits.check_event_ref(&self.request.event) {
            return Ok(GetEventResponse::failure(err.into()));
        }
        let (limit, offset) = self.service.page(&self.request.pagination);
        // Both reads share one transaction so the event and its leaderboard
        // come from the same snapshot.
        let mut tx = self.service.db.pool().begin().await?;
        let rows = events::get_event_with_rounds(&mut *tx, &self.request.event).await?;
        let Some(event) = EventWithRounds::from_rows(rows) else {
            return Ok(GetEventResponse::failure(GetEventError::NotFound));
        };
        let leaderboard =
            events::get_event_leaderboard(&mut *tx, &self.request.event, limit, offset).await?;
        tx.commit().await?;
        Ok(GetEventResponse {
            success: true,
            event: Some(event),
            leaderboard,
            error: None,
        })
    }
}
