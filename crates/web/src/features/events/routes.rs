use std::sync::Arc;

use axum::{Router, routing::post};

use super::handlers;
use super::service::EventService;

pub fn router() -> Router<Arc<EventService>> {
    Router::new()
        .route("/create", post(handlers::create_event))
        .route("/get", post(handlers::get_event))
        .route("/update", post(handlers::update_event))
        .route("/delete", post(handlers::delete_event))
        .route("/rounds/create", post(handlers::create_event_round))
        .route("/rounds/get", post(handlers::get_event_round))
        .route("/rounds/update", post(handlers::update_event_round))
        .route("/users/get", post(handlers::get_event_user))
        .route("/users/update", post(handlers::update_event_user))
        .route("/users/delete", post(handlers::delete_event_user))
        .route("/results/add", post(handlers::add_event_result))
        .route("/results/remove", post(handlers::remove_event_result))
}
