use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{DeleteEventUserError, DeleteEventUserResponse, EventUserRef};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Removes a user from an event along with their submitted results
/// (cascade). Row-count driven.
pub struct DeleteEventUserCommand {
    service: Arc<EventService>,
    request: EventUserRef,
}

impl DeleteEventUserCommand {
    pub fn new(service: Arc<EventService>, request: EventUserRef) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for DeleteEventUserCommand {
    const NAME: &'static str = "DeleteEventUser";

    type Request = EventUserRef;
    type Response = DeleteEventUserResponse;

    fn request(&self) -> &EventUserRef {
        &self.request
    }

    async fn execute(&self) -> Result<DeleteEventUserResponse> {
        if let Some(err) = self.service.limits.check_event_user_ref(&self.request) {
            return Ok(DeleteEventUserResponse::failure(err.into()));
        }
        let affected = events::delete_event_user(self.service.db.pool(), &self.request).await?;
        if affected == 0 {
            return Ok(DeleteEventUserResponse::failure(
                DeleteEventUserError::NotFound,
            ));
        }
        Ok(DeleteEventUserResponse::ok())
    }
}
