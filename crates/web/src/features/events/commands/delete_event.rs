use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{DeleteEventError, DeleteEventResponse, EventRef};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Deletes an event; rounds, users and results go with it via cascade.
/// Row-count driven: zero rows is NOT_FOUND, with no distinction between
/// "never existed" and "already deleted".
pub struct DeleteEventCommand {
    service: Arc<EventService>,
    request: EventRef,
}

impl DeleteEventCommand {
    pub fn new(service: Arc<EventService>, request: EventRef) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for DeleteEventCommand {
    const NAME: &'static str = "DeleteEvent";

    type Request = EventRef;
    type Response = DeleteEventResponse;

    fn request(&self) -> &EventRef {
        &self.request
    }

    async fn execute(&self) -> Result<DeleteEventResponse> {
        if let Some(err) = self.service.limits.check_event_ref(&self.request) {
            return Ok(DeleteEventResponse::failure(err.into()));
        }
        let affected = events::delete_event(self.service.db.pool(), &self.request).await?;
        if affected == 0 {
            return Ok(DeleteEventResponse::failure(DeleteEventError::NotFound));
        }
        Ok(DeleteEventResponse::ok())
    }
}
