//! Event domain queries. Functions are generic over the executor so the
//! same statement runs against the pool or inside a transaction; predicates
//! come from [`crate::query`] and values are always bound, never inlined.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::dto::event::{EventRef, EventUserRef, RoundRef, RoundUserRef};
use crate::error::{Result, StorageError};
use crate::models::{
    Event, EventLeaderboardRow, EventRound, EventRoundLeaderboardRow, EventWithRoundRow,
};
use crate::query;

/// Unique constraint names, matched by commands to turn storage conflicts
/// into the corresponding business errors.
pub const EVENT_NAME_KEY: &str = "event_name_key";
pub const ROUND_NAME_KEY: &str = "event_round_event_id_name_key";
pub const ROUND_ENDED_AT_KEY: &str = "event_round_event_id_ended_at_key";
pub const ROUND_USER_KEY: &str = "event_round_user_event_user_id_event_round_id_key";

const EVENT_COLUMNS: &str = "id, name, data, started_at, created_at, updated_at";
const ROUND_COLUMNS: &str = "id, event_id, name, data, scoring, ended_at, created_at, updated_at";
const EVENT_WITH_ROUND_COLUMNS: &str = "id, name, data, started_at, created_at, updated_at, \
     current_round_id, current_round_name, round_id, round_name, round_data, round_scoring, \
     round_ended_at, round_created_at, round_updated_at";
const EVENT_LEADERBOARD_COLUMNS: &str =
    "id, event_id, user_id, score, ranking, data, created_at, updated_at";
const ROUND_LEADERBOARD_COLUMNS: &str = "id, event_id, round_name, event_user_id, \
     event_round_id, result, score, ranking, data, created_at, updated_at";

pub async fn create_event<'e>(
    db: impl PgExecutor<'e>,
    name: &str,
    data: &JsonValue,
    started_at: DateTime<Utc>,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO event (name, data, started_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(data)
    .bind(started_at)
    .fetch_one(db)
    .await
    .map_err(StorageError::from_sqlx)
}

pub async fn create_round<'e>(
    db: impl PgExecutor<'e>,
    event_id: i64,
    name: &str,
    data: &JsonValue,
    scoring: &[i64],
    ended_at: DateTime<Utc>,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO event_round (event_id, name, data, scoring, ended_at) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(event_id)
    .bind(name)
    .bind(data)
    .bind(scoring)
    .bind(ended_at)
    .fetch_one(db)
    .await
    .map_err(StorageError::from_sqlx)
}

pub async fn get_event<'e>(db: impl PgExecutor<'e>, event: &EventRef) -> Result<Option<Event>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {EVENT_COLUMNS} FROM event WHERE 1=1"
    ));
    query::push_event_filter(&mut qb, event);
    qb.push(" LIMIT 1");
    Ok(qb.build_query_as::<Event>().fetch_optional(db).await?)
}

/// Reads the event row-locked, serializing dependent writes (round creation)
/// against a concurrent delete of the same event.
pub async fn get_event_for_update<'e>(
    db: impl PgExecutor<'e>,
    event: &EventRef,
) -> Result<Option<Event>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {EVENT_COLUMNS} FROM event WHERE 1=1"
    ));
    query::push_event_filter(&mut qb, event);
    qb.push(" LIMIT 1 FOR UPDATE");
    Ok(qb.build_query_as::<Event>().fetch_optional(db).await?)
}

pub async fn get_event_with_rounds<'e>(
    db: impl PgExecutor<'e>,
    event: &EventRef,
) -> Result<Vec<EventWithRoundRow>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {EVENT_WITH_ROUND_COLUMNS} FROM event_with_round WHERE 1=1"
    ));
    query::push_event_filter(&mut qb, event);
    qb.push(" ORDER BY round_ended_at ASC NULLS LAST");
    Ok(qb
        .build_query_as::<EventWithRoundRow>()
        .fetch_all(db)
        .await?)
}

pub async fn get_event_leaderboard<'e>(
    db: impl PgExecutor<'e>,
    event: &EventRef,
    limit: i64,
    offset: i64,
) -> Result<Vec<EventLeaderboardRow>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {EVENT_LEADERBOARD_COLUMNS} FROM event_leaderboard WHERE 1=1"
    ));
    query::push_event_scope(&mut qb, event, "event_id");
    qb.push(" ORDER BY ranking ASC, id ASC LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    Ok(qb
        .build_query_as::<EventLeaderboardRow>()
        .fetch_all(db)
        .await?)
}

pub async fn get_round<'e>(db: impl PgExecutor<'e>, round: &RoundRef) -> Result<Option<EventRound>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {ROUND_COLUMNS} FROM event_round WHERE 1=1"
    ));
    query::push_round_filter(&mut qb, round);
    qb.push(" LIMIT 1");
    Ok(qb.build_query_as::<EventRound>().fetch_optional(db).await?)
}

pub async fn get_round_leaderboard<'e>(
    db: impl PgExecutor<'e>,
    round: &RoundRef,
    limit: i64,
    offset: i64,
) -> Result<Vec<EventRoundLeaderboardRow>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {ROUND_LEADERBOARD_COLUMNS} FROM event_round_leaderboard WHERE 1=1"
    ));
    query::push_round_scope(&mut qb, round, "event_round_id");
    qb.push(" ORDER BY ranking ASC, id ASC LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    Ok(qb
        .build_query_as::<EventRoundLeaderboardRow>()
        .fetch_all(db)
        .await?)
}

pub async fn get_event_user<'e>(
    db: impl PgExecutor<'e>,
    user: &EventUserRef,
) -> Result<Option<EventLeaderboardRow>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {EVENT_LEADERBOARD_COLUMNS} FROM event_leaderboard WHERE 1=1"
    ));
    query::push_event_user_filter(&mut qb, user);
    qb.push(" LIMIT 1");
    Ok(qb
        .build_query_as::<EventLeaderboardRow>()
        .fetch_optional(db)
        .await?)
}

/// The scoped user's submitted results across rounds, in round order.
pub async fn get_event_user_results<'e>(
    db: impl PgExecutor<'e>,
    user: &EventUserRef,
    limit: i64,
    offset: i64,
) -> Result<Vec<EventRoundLeaderboardRow>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {ROUND_LEADERBOARD_COLUMNS} FROM event_round_leaderboard WHERE 1=1"
    ));
    query::push_event_user_scope(&mut qb, user, "event_user_id");
    qb.push(" ORDER BY event_round_id ASC LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    Ok(qb
        .build_query_as::<EventRoundLeaderboardRow>()
        .fetch_all(db)
        .await?)
}

/// Create-or-update on the (event_id, user_id) key. The returned surrogate
/// id is stable across repeated calls for the same pair.
pub async fn upsert_event_user<'e>(
    db: impl PgExecutor<'e>,
    event_id: i64,
    user_id: i64,
    data: &JsonValue,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO event_user (event_id, user_id, data) VALUES ($1, $2, $3) \
         ON CONFLICT (event_id, user_id) DO UPDATE SET data = EXCLUDED.data \
         RETURNING id",
    )
    .bind(event_id)
    .bind(user_id)
    .bind(data)
    .fetch_one(db)
    .await
    .map_err(StorageError::from_sqlx)
}

/// Guarded insert of a result against the event's current round. Affects
/// zero rows once every round has ended; a duplicate (user, round) pair
/// surfaces as a unique violation on [`ROUND_USER_KEY`].
pub async fn insert_round_result<'e>(
    db: impl PgExecutor<'e>,
    event_user_id: i64,
    event: &EventRef,
    result: i64,
    data: &JsonValue,
) -> Result<u64> {
    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO event_round_user (event_user_id, event_round_id, result, data) SELECT ",
    );
    qb.push_bind(event_user_id);
    qb.push(", r.id, ");
    qb.push_bind(result);
    qb.push(", ");
    qb.push_bind(data.clone());
    qb.push(" FROM event_round r WHERE r.ended_at > now()");
    query::push_event_scope(&mut qb, event, "r.event_id");
    qb.push(" ORDER BY r.ended_at ASC LIMIT 1");
    let done = qb
        .build()
        .execute(db)
        .await
        .map_err(StorageError::from_sqlx)?;
    Ok(done.rows_affected())
}

pub async fn update_event_data<'e>(
    db: impl PgExecutor<'e>,
    event: &EventRef,
    data: &JsonValue,
) -> Result<u64> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE event SET data = ");
    qb.push_bind(data.clone());
    qb.push(" WHERE 1=1");
    query::push_event_filter(&mut qb, event);
    let done = qb
        .build()
        .execute(db)
        .await
        .map_err(StorageError::from_sqlx)?;
    Ok(done.rows_affected())
}

/// Partial update; only the provided fields are set. Callers guarantee at
/// least one field is present.
pub async fn update_round<'e>(
    db: impl PgExecutor<'e>,
    round: &RoundRef,
    data: Option<&JsonValue>,
    scoring: Option<&[i64]>,
) -> Result<u64> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE event_round SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(data) = data {
            set.push("data = ");
            set.push_bind_unseparated(data.clone());
        }
        if let Some(scoring) = scoring {
            set.push("scoring = ");
            set.push_bind_unseparated(scoring.to_vec());
        }
    }
    qb.push(" WHERE 1=1");
    query::push_round_filter(&mut qb, round);
    let done = qb
        .build()
        .execute(db)
        .await
        .map_err(StorageError::from_sqlx)?;
    Ok(done.rows_affected())
}

pub async fn update_event_user_data<'e>(
    db: impl PgExecutor<'e>,
    user: &EventUserRef,
    data: &JsonValue,
) -> Result<u64> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE event_user SET data = ");
    qb.push_bind(data.clone());
    qb.push(" WHERE 1=1");
    query::push_event_user_filter(&mut qb, user);
    let done = qb
        .build()
        .execute(db)
        .await
        .map_err(StorageError::from_sqlx)?;
    Ok(done.rows_affected())
}

pub async fn delete_event<'e>(db: impl PgExecutor<'e>, event: &EventRef) -> Result<u64> {
    let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM event WHERE 1=1");
    query::push_event_filter(&mut qb, event);
    let done = qb.build().execute(db).await?;
    Ok(done.rows_affected())
}

pub async fn delete_event_user<'e>(db: impl PgExecutor<'e>, user: &EventUserRef) -> Result<u64> {
    let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM event_user WHERE 1=1");
    query::push_event_user_filter(&mut qb, user);
    let done = qb.build().execute(db).await?;
    Ok(done.rows_affected())
}

pub async fn delete_round_result<'e>(
    db: impl PgExecutor<'e>,
    result: &RoundUserRef,
) -> Result<u64> {
    let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM event_round_user WHERE 1=1");
    query::push_round_user_filter(&mut qb, result);
    let done = qb.build().execute(db).await?;
    Ok(done.rows_affected())
}

pub async fn event_exists<'e>(db: impl PgExecutor<'e>, event: &EventRef) -> Result<bool> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT EXISTS(SELECT 1 FROM event WHERE 1=1");
    query::push_event_filter(&mut qb, event);
    qb.push(")");
    Ok(qb.build_query_scalar::<bool>().fetch_one(db).await?)
}

pub async fn round_exists<'e>(db: impl PgExecutor<'e>, round: &RoundRef) -> Result<bool> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT EXISTS(SELECT 1 FROM event_round WHERE 1=1");
    query::push_round_filter(&mut qb, round);
    qb.push(")");
    Ok(qb.build_query_scalar::<bool>().fetch_one(db).await?)
}

pub async fn event_user_exists<'e>(db: impl PgExecutor<'e>, user: &EventUserRef) -> Result<bool> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT EXISTS(SELECT 1 FROM event_user WHERE 1=1");
    query::push_event_user_filter(&mut qb, user);
    qb.push(")");
    Ok(qb.build_query_scalar::<bool>().fetch_one(db).await?)
}
