use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{UpdateEventUserError, UpdateEventUserRequest, UpdateEventUserResponse};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Replaces an event user's data blob, with the same zero-rows
/// disambiguation as the other updates.
pub struct UpdateEventUserCommand {
    service: Arc<EventService>,
    request: UpdateEventUserRequest,
}

impl UpdateEventUserCommand {
    pub fn new(service: Arc<EventService>, request: UpdateEventUserRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for UpdateEventUserCommand {
    const NAME: &'static str = "UpdateEventUser";

    type Request = UpdateEventUserRequest;
    type Response = UpdateEventUserResponse;

    fn request(&self) -> &UpdateEventUserRequest {
        &self.request
    }

    async fn execute(&self) -> Result<UpdateEventUserResponse> {
        if let Some(err) = self.service.limits.check_event_user_ref(&self.request.user) {
            return Ok(UpdateEventUserResponse::failure(err.into()));
        }
        let Some(data) = &self.request.data else {
            return Ok(UpdateEventUserResponse::failure(
                UpdateEventUserError::DataRequired,
            ));
        };
        let pool = self.service.db.pool();
        let affected = events::update_event_user_data(pool, &self.request.user, data).await?;
        if affected == 0 && !events::event_user_exists(pool, &self.request.user).await? {
            return Ok(UpdateEventUserResponse::failure(
                UpdateEventUserError::NotFound,
            ));
        }
        Ok(UpdateEventUserResponse::ok())
    }
}
