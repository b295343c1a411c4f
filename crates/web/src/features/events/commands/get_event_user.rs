use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{
    EventUserRef, GetEventUserError, GetEventUserRequest, GetEventUserResponse,
};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Fetches an event user's standing (score and dense rank) plus a paginated
/// slice of their per-round results.
pub struct GetEventUserCommand {
    service: Arc<EventService>,
    request: GetEventUserRequest,
}

impl GetEventUserCommand {
    pub fn new(service: Arc<EventService>, request: GetEventUserRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for GetEventUserCommand {
    const NAME: &'static str = "GetEventUser";

    type Request = GetEventUserRequest;
    type Response = GetEventUserResponse;

    fn request(&self) -> &GetEventUserRequest {
        &self.request
    }

    async fn execute(&self) -> Result<GetEventUserResponse> {
        if let Some(err) = self.service.limits.check_event_user_ref(&self.request.user) {
            return Ok(GetEventUserResponse::failure(err.into()));
        }
        let (limit, offset) = self.service.page(&self.request.pagination);
        let mut tx = self.service.db.pool().begin().await?;
        let Some(user) = events::get_event_user(&mut *tx, &self.request.user).await? else {
            return Ok(GetEventUserResponse::failure(GetEventUserError::NotFound));
        };
        let user_ref = EventUserRef {
            id: Some(user.id),
            ..EventUserRef::default()
        };
        let results = events::get_event_user_results(&mut *tx, &user_ref, limit, offset).await?;
        tx.commit().await?;
        Ok(GetEventUserResponse {
            success: true,
            user: Some(user),
            results,
            error: None,
        })
    }
}
