use std::sync::Arc;

use axum::{Json, extract::State};
use storage::dto::event::{
    AddEventResultRequest, AddEventResultResponse, CreateEventRequest, CreateEventResponse,
    CreateEventRoundRequest, CreateEventRoundResponse, DeleteEventResponse,
    DeleteEventUserResponse, EventRef, EventUserRef, GetEventRequest, GetEventResponse,
    GetEventRoundRequest, GetEventRoundResponse, GetEventUserRequest, GetEventUserResponse,
    RemoveEventResultResponse, RoundUserRef, UpdateEventRequest, UpdateEventResponse,
    UpdateEventRoundRequest, UpdateEventRoundResponse, UpdateEventUserRequest,
    UpdateEventUserResponse,
};

use super::commands::{
    AddEventResultCommand, CreateEventCommand, CreateEventRoundCommand, DeleteEventCommand,
    DeleteEventUserCommand, GetEventCommand, GetEventRoundCommand, GetEventUserCommand,
    RemoveEventResultCommand, UpdateEventCommand, UpdateEventRoundCommand, UpdateEventUserCommand,
};
use super::service::EventService;
use crate::error::WebResult;

#[utoipa::path(
    post,
    path = "/api/events/create",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Command outcome; business errors ride in the body", body = CreateEventResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(service): State<Arc<EventService>>,
    Json(request): Json<CreateEventRequest>,
) -> WebResult<Json<CreateEventResponse>> {
    let command = CreateEventCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/rounds/create",
    request_body = CreateEventRoundRequest,
    responses(
        (status = 200, description = "Command outcome", body = CreateEventRoundResponse)
    ),
    tag = "events"
)]
pub async fn create_event_round(
    State(service): State<Arc<EventService>>,
    Json(request): Json<CreateEventRoundRequest>,
) -> WebResult<Json<CreateEventRoundResponse>> {
    let command = CreateEventRoundCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/results/add",
    request_body = AddEventResultRequest,
    responses(
        (status = 200, description = "Command outcome", body = AddEventResultResponse)
    ),
    tag = "events"
)]
pub async fn add_event_result(
    State(service): State<Arc<EventService>>,
    Json(request): Json<AddEventResultRequest>,
) -> WebResult<Json<AddEventResultResponse>> {
    let command = AddEventResultCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/get",
    request_body = GetEventRequest,
    responses(
        (status = 200, description = "The event, its rounds and a leaderboard page", body = GetEventResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(service): State<Arc<EventService>>,
    Json(request): Json<GetEventRequest>,
) -> WebResult<Json<GetEventResponse>> {
    let command = GetEventCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_read(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/rounds/get",
    request_body = GetEventRoundRequest,
    responses(
        (status = 200, description = "The round (current when unaddressed) and its leaderboard page", body = GetEventRoundResponse)
    ),
    tag = "events"
)]
pub async fn get_event_round(
    State(service): State<Arc<EventService>>,
    Json(request): Json<GetEventRoundRequest>,
) -> WebResult<Json<GetEventRoundResponse>> {
    let command = GetEventRoundCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_read(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/users/get",
    request_body = GetEventUserRequest,
    responses(
        (status = 200, description = "The user's standing and per-round results", body = GetEventUserResponse)
    ),
    tag = "events"
)]
pub async fn get_event_user(
    State(service): State<Arc<EventService>>,
    Json(request): Json<GetEventUserRequest>,
) -> WebResult<Json<GetEventUserResponse>> {
    let command = GetEventUserCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_read(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/update",
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Command outcome", body = UpdateEventResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(service): State<Arc<EventService>>,
    Json(request): Json<UpdateEventRequest>,
) -> WebResult<Json<UpdateEventResponse>> {
    let command = UpdateEventCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/rounds/update",
    request_body = UpdateEventRoundRequest,
    responses(
        (status = 200, description = "Command outcome", body = UpdateEventRoundResponse)
    ),
    tag = "events"
)]
pub async fn update_event_round(
    State(service): State<Arc<EventService>>,
    Json(request): Json<UpdateEventRoundRequest>,
) -> WebResult<Json<UpdateEventRoundResponse>> {
    let command = UpdateEventRoundCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/users/update",
    request_body = UpdateEventUserRequest,
    responses(
        (status = 200, description = "Command outcome", body = UpdateEventUserResponse)
    ),
    tag = "events"
)]
pub async fn update_event_user(
    State(service): State<Arc<EventService>>,
    Json(request): Json<UpdateEventUserRequest>,
) -> WebResult<Json<UpdateEventUserResponse>> {
    let command = UpdateEventUserCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/delete",
    request_body = EventRef,
    responses(
        (status = 200, description = "Command outcome; deletion cascades to rounds and results", body = DeleteEventResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(service): State<Arc<EventService>>,
    Json(request): Json<EventRef>,
) -> WebResult<Json<DeleteEventResponse>> {
    let command = DeleteEventCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/users/delete",
    request_body = EventUserRef,
    responses(
        (status = 200, description = "Command outcome", body = DeleteEventUserResponse)
    ),
    tag = "events"
)]
pub async fn delete_event_user(
    State(service): State<Arc<EventService>>,
    Json(request): Json<EventUserRef>,
) -> WebResult<Json<DeleteEventUserResponse>> {
    let command = DeleteEventUserCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}

#[utoipa::path(
    post,
    path = "/api/events/results/remove",
    request_body = RoundUserRef,
    responses(
        (status = 200, description = "Command outcome", body = RemoveEventResultResponse)
    ),
    tag = "events"
)]
pub async fn remove_event_result(
    State(service): State<Arc<EventService>>,
    Json(request): Json<RoundUserRef>,
) -> WebResult<Json<RemoveEventResultResponse>> {
    let command = RemoveEventResultCommand::new(Arc::clone(&service), request);
    Ok(Json(service.dispatch_write(&command).await?))
}
