use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod cache;
mod config;
mod error;
mod features;
mod invoker;
mod metrics;

use crate::cache::MokaCacher;
use crate::config::Config;
use crate::features::events::service::EventService;
use crate::metrics::FacadeMetrics;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::events::handlers::create_event,
        features::events::handlers::create_event_round,
        features::events::handlers::add_event_result,
        features::events::handlers::get_event,
        features::events::handlers::get_event_round,
        features::events::handlers::get_event_user,
        features::events::handlers::update_event,
        features::events::handlers::update_event_round,
        features::events::handlers::update_event_user,
        features::events::handlers::delete_event,
        features::events::handlers::delete_event_user,
        features::events::handlers::remove_event_result,
    ),
    components(
        schemas(
            storage::dto::common::Pagination,
            storage::dto::event::EventRef,
            storage::dto::event::RoundRef,
            storage::dto::event::EventUserRef,
            storage::dto::event::RoundUserRef,
            storage::dto::event::NewEventRound,
            storage::dto::event::CreateEventRequest,
            storage::dto::event::CreateEventResponse,
            storage::dto::event::CreateEventRoundRequest,
            storage::dto::event::CreateEventRoundResponse,
            storage::dto::event::AddEventResultRequest,
            storage::dto::event::AddEventResultResponse,
            storage::dto::event::GetEventRequest,
            storage::dto::event::GetEventResponse,
            storage::dto::event::GetEventRoundRequest,
            storage::dto::event::GetEventRoundResponse,
            storage::dto::event::GetEventUserRequest,
            storage::dto::event::GetEventUserResponse,
            storage::dto::event::UpdateEventRequest,
            storage::dto::event::UpdateEventResponse,
            storage::dto::event::UpdateEventRoundRequest,
            storage::dto::event::UpdateEventRoundResponse,
            storage::dto::event::UpdateEventUserRequest,
            storage::dto::event::UpdateEventUserResponse,
            storage::dto::event::DeleteEventResponse,
            storage::dto::event::DeleteEventUserResponse,
            storage::dto::event::RemoveEventResultResponse,
            storage::dto::event::CreateEventError,
            storage::dto::event::CreateEventRoundError,
            storage::dto::event::AddEventResultError,
            storage::dto::event::GetEventError,
            storage::dto::event::GetEventRoundError,
            storage::dto::event::GetEventUserError,
            storage::dto::event::UpdateEventError,
            storage::dto::event::UpdateEventRoundError,
            storage::dto::event::UpdateEventUserError,
            storage::dto::event::DeleteEventError,
            storage::dto::event::DeleteEventUserError,
            storage::dto::event::RemoveEventResultError,
            storage::dto::event::EventWithRounds,
            storage::models::Event,
            storage::models::EventRound,
            storage::models::EventUser,
            storage::models::EventRoundUser,
            storage::models::EventLeaderboardRow,
            storage::models::EventRoundLeaderboardRow,
        )
    ),
    tags(
        (name = "events", description = "Event, round, result and leaderboard operations")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .init();

    tracing::info!("Starting event service");

    let config = Config::from_env().context("Failed to load configuration")?;

    if let Some(metrics_addr) = config.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
            .context("Failed to start Prometheus exporter")?;
        tracing::info!(%metrics_addr, "Prometheus exporter started");
    }

    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed");

    let cache = Arc::new(MokaCacher::new(
        Duration::from_secs(config.cache_ttl_secs),
        config.cache_capacity,
    ));
    let service = Arc::new(EventService::new(
        db,
        cache,
        Arc::new(FacadeMetrics),
        &config,
    ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/events", features::events::routes::router())
        .layer(CorsLayer::permissive())
        .with_state(service);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!("Listening on http://{bind_address}");

    axum::serve(listener, app).await?;

    Ok(())
}
