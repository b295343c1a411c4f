use std::sync::Arc;

use async_trait::async_trait;
use storage::dto::event::{GetEventRoundError, GetEventRoundRequest, GetEventRoundResponse, RoundRef};
use storage::error::Result;
use storage::repository::event as events;

use crate::features::events::service::EventService;
use crate::invoker::Command;

/// Fetches a round (explicitly addressed or the event's current one) with
/// a paginated slice of its leaderboard.
pub struct GetEventRoundCommand {
    service: Arc<EventService>,
    request: GetEventRoundRequest,
}

impl GetEventRoundCommand {
    pub fn new(service: Arc<EventService>, request: GetEventRoundRequest) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for GetEventRoundCommand {
    const NAME: &'static str = "GetEventRound";

    type Request = GetEventRoundRequest;
    type Response = GetEventRoundResponse;

    fn request(&self) -> &GetEventRoundRequest {
        &self.request
    }

    async fn execute(&self) -> Result<GetEventRoundResponse> {
        if let Some(err) = self.service.limits.check_round_ref(&self.request.round) {
            return Ok(GetEventRoundResponse::failure(err.into()));
        }
        let (limit, offset) = self.service.page(&self.request.pagination);
        let mut tx = self.service.db.pool().begin().await?;
        let Some(round) = events::get_round(&mut *tx, &self.request.round).await? else {
            return Ok(GetEventRoundResponse::failure(GetEventRoundError::NotFound));
        };
        // Address the leaderboard by the resolved id so a "current round"
        // lookup cannot drift between the two reads.
        let round_ref = RoundRef {
            id: Some(round.id),
            ..RoundRef::default()
        };
        let results = events::get_round_leaderboard(&mut *tx, &round_ref, limit, offset).await?;
        tx.commit().await?;
        Ok(GetEventRoundResponse {
            success: true,
            round: Some(round),
            results,
            error: None,
        })
    }
}
