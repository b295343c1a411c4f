use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{RemoveEventResultError, RemoveEventResultResponse, RoundUserRef};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Deletes a single submitted result, addressed explicitly or through the
/// (user, round-name-or-current-round) lookup. Row-count driven.
pub struct RemoveEventResultCommand {
    service: Arc<EventService>,
    request: RoundUserRef,
}

impl RemoveEventResultCommand {
    pub fn new(service: Arc<EventService>, request: RoundUserRef) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for RemoveEventResultCommand {
    const NAME: &'static str = "RemoveEventResult";

    type Request = RoundUserRef;
    type Response = RemoveEventResultResponse;

    fn request(&self) -> &RoundUserRef {
        &self.request
    }

    async fn execute(&self) -> Result<RemoveEventResultResponse> {
        if let Some(err) = self.service.limits.check_round_user_ref(&self.request) {
            return Ok(RemoveEventResultResponse::failure(err.into()));
        }
        let affected = events::delete_round_result(self.service.db.pool(), &self.request).await?;
        if affected == 0 {
            return Ok(RemoveEventResultResponse::failure(
                RemoveEventResultError::NotFound,
            ));
        }
        Ok(RemoveEventResultResponse::ok())
    }
}
