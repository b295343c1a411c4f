//! Dynamic predicate composition for the optional-field lookup refs.
//!
//! Every function appends ` AND <column> = <bind>` fragments to a caller
//! owned [`QueryBuilder`] for exactly the fields that are present, so the
//! caller anchors the clause with `WHERE 1=1` and stays in charge of
//! ordering, locking and pagination. Natural keys resolve through correlated
//! subqueries instead of pre-fetches, keeping each operation inside a single
//! round-trip. Values only ever travel as bind parameters.

use sqlx::{Postgres, QueryBuilder};

use crate::dto::event::{EventRef, EventUserRef, RoundRef, RoundUserRef};

/// Filters rows of the `event` table (or any relation exposing `id` and
/// `name`, such as the `event_with_round` view).
pub fn push_event_filter(qb: &mut QueryBuilder<'_, Postgres>, event: &EventRef) {
    if let Some(id) = event.id {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(name) = &event.name {
        qb.push(" AND name = ").push_bind(name.clone());
    }
}

/// Scopes a child-table column to an event, resolving a name lookup through
/// a correlated subquery.
pub fn push_event_scope(qb: &mut QueryBuilder<'_, Postgres>, event: &EventRef, column: &str) {
    if let Some(id) = event.id {
        qb.push(" AND ");
        qb.push(column);
        qb.push(" = ").push_bind(id);
    } else if let Some(name) = &event.name {
        qb.push(" AND ");
        qb.push(column);
        qb.push(" = (SELECT id FROM event WHERE name = ");
        qb.push_bind(name.clone());
        qb.push(" LIMIT 1)");
    }
}

/// Pushes a scalar subquery selecting the scoped event's current round: the
/// round with the smallest `ended_at` still in the future.
fn push_current_round_subquery(qb: &mut QueryBuilder<'_, Postgres>, event: &EventRef) {
    qb.push("(SELECT r.id FROM event_round r WHERE r.ended_at > now()");
    push_event_scope(qb, event, "r.event_id");
    qb.push(" ORDER BY r.ended_at ASC LIMIT 1)");
}

/// Filters rows of the `event_round` table. An empty round lookup resolves
/// to the current round of the scoped event, which pins exactly one row in
/// any statement position.
pub fn push_round_filter(qb: &mut QueryBuilder<'_, Postgres>, round: &RoundRef) {
    if let Some(id) = round.id {
        qb.push(" AND id = ").push_bind(id);
        return;
    }
    if let Some(name) = &round.name {
        push_event_scope(qb, &round.event, "event_id");
        qb.push(" AND name = ").push_bind(name.clone());
    } else {
        qb.push(" AND id = ");
        push_current_round_subquery(qb, &round.event);
    }
}

/// Scopes a child-table column to a round.
pub fn push_round_scope(qb: &mut QueryBuilder<'_, Postgres>, round: &RoundRef, column: &str) {
    qb.push(" AND ");
    qb.push(column);
    qb.push(" = ");
    if let Some(id) = round.id {
        qb.push_bind(id);
    } else if let Some(name) = &round.name {
        qb.push("(SELECT r.id FROM event_round r WHERE r.name = ");
        qb.push_bind(name.clone());
        push_event_scope(qb, &round.event, "r.event_id");
        qb.push(" LIMIT 1)");
    } else {
        push_current_round_subquery(qb, &round.event);
    }
}

/// Filters rows keyed by event user; the `event_user` table and the
/// `event_leaderboard` view share this column layout.
pub fn push_event_user_filter(qb: &mut QueryBuilder<'_, Postgres>, user: &EventUserRef) {
    if let Some(id) = user.id {
        qb.push(" AND id = ").push_bind(id);
        return;
    }
    push_event_scope(qb, &user.event, "event_id");
    if let Some(user_id) = user.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
}

/// Scopes a child-table column to an event user.
pub fn push_event_user_scope(qb: &mut QueryBuilder<'_, Postgres>, user: &EventUserRef, column: &str) {
    qb.push(" AND ");
    qb.push(column);
    qb.push(" = ");
    if let Some(id) = user.id {
        qb.push_bind(id);
        return;
    }
    qb.push("(SELECT u.id FROM event_user u WHERE 1=1");
    push_event_scope(qb, &user.event, "u.event_id");
    if let Some(user_id) = user.user_id {
        qb.push(" AND u.user_id = ").push_bind(user_id);
    }
    qb.push(" LIMIT 1)");
}

/// Filters rows of the `event_round_user` table. With no explicit id the
/// target is the scoped user's result in the named round, or in the current
/// round when no name is given.
pub fn push_round_user_filter(qb: &mut QueryBuilder<'_, Postgres>, result: &RoundUserRef) {
    if let Some(id) = result.id {
        qb.push(" AND id = ").push_bind(id);
        return;
    }
    push_event_user_scope(qb, &result.user, "event_user_id");
    qb.push(" AND event_round_id = ");
    if let Some(round_name) = &result.round_name {
        qb.push("(SELECT r.id FROM event_round r WHERE r.name = ");
        qb.push_bind(round_name.clone());
        push_event_scope(qb, &result.user.event, "r.event_id");
        qb.push(" LIMIT 1)");
    } else {
        push_current_round_subquery(qb, &result.user.event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new("SELECT * FROM t WHERE 1=1")
    }

    fn event_by_id() -> EventRef {
        EventRef {
            id: Some(7),
            name: None,
        }
    }

    fn event_by_name(name: &str) -> EventRef {
        EventRef {
            id: None,
            name: Some(name.to_owned()),
        }
    }

    #[test]
    fn event_filter_by_id() {
        let mut qb = builder();
        push_event_filter(&mut qb, &event_by_id());
        assert_eq!(qb.sql(), "SELECT * FROM t WHERE 1=1 AND id = $1");
    }

    #[test]
    fn event_filter_by_name() {
        let mut qb = builder();
        push_event_filter(&mut qb, &event_by_name("weekly"));
        assert_eq!(qb.sql(), "SELECT * FROM t WHERE 1=1 AND name = $1");
    }

    #[test]
    fn event_filter_absent_fields_add_nothing() {
        let mut qb = builder();
        push_event_filter(&mut qb, &EventRef::default());
        assert_eq!(qb.sql(), "SELECT * FROM t WHERE 1=1");
    }

    #[test]
    fn event_scope_resolves_name_via_subquery() {
        let mut qb = builder();
        push_event_scope(&mut qb, &event_by_name("weekly"), "event_id");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE 1=1 AND event_id = (SELECT id FROM event WHERE name = $1 LIMIT 1)"
        );
    }

    #[test]
    fn empty_round_ref_targets_current_round() {
        let mut qb = builder();
        let round = RoundRef {
            event: event_by_id(),
            ..RoundRef::default()
        };
        push_round_filter(&mut qb, &round);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE 1=1 AND id = (SELECT r.id FROM event_round r \
             WHERE r.ended_at > now() AND r.event_id = $1 ORDER BY r.ended_at ASC LIMIT 1)"
        );
    }

    #[test]
    fn round_ref_by_id_ignores_event_scope() {
        let mut qb = builder();
        let round = RoundRef {
            event: event_by_name("weekly"),
            id: Some(3),
            name: None,
        };
        push_round_filter(&mut qb, &round);
        assert_eq!(qb.sql(), "SELECT * FROM t WHERE 1=1 AND id = $1");
    }

    #[test]
    fn round_ref_by_name_scopes_to_event() {
        let mut qb = builder();
        let round = RoundRef {
            event: event_by_id(),
            id: None,
            name: Some("finals".to_owned()),
        };
        push_round_filter(&mut qb, &round);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE 1=1 AND event_id = $1 AND name = $2"
        );
    }

    #[test]
    fn round_scope_by_name_uses_subquery() {
        let mut qb = builder();
        let round = RoundRef {
            event: event_by_name("weekly"),
            id: None,
            name: Some("finals".to_owned()),
        };
        push_round_scope(&mut qb, &round, "event_round_id");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE 1=1 AND event_round_id = (SELECT r.id FROM event_round r \
             WHERE r.name = $1 AND r.event_id = (SELECT id FROM event WHERE name = $2 LIMIT 1) LIMIT 1)"
        );
    }

    #[test]
    fn event_user_filter_by_event_and_user_id() {
        let mut qb = builder();
        let user = EventUserRef {
            event: event_by_id(),
            id: None,
            user_id: Some(42),
        };
        push_event_user_filter(&mut qb, &user);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE 1=1 AND event_id = $1 AND user_id = $2"
        );
    }

    #[test]
    fn event_user_scope_by_surrogate_id_is_direct() {
        let mut qb = builder();
        let user = EventUserRef {
            event: EventRef::default(),
            id: Some(9),
            user_id: None,
        };
        push_event_user_scope(&mut qb, &user, "event_user_id");
        assert_eq!(qb.sql(), "SELECT * FROM t WHERE 1=1 AND event_user_id = $1");
    }

    #[test]
    fn round_user_filter_defaults_to_current_round() {
        let mut qb = builder();
        let result = RoundUserRef {
            user: EventUserRef {
                event: event_by_id(),
                id: None,
                user_id: Some(42),
            },
            id: None,
            round_name: None,
        };
        push_round_user_filter(&mut qb, &result);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE 1=1 AND event_user_id = (SELECT u.id FROM event_user u \
             WHERE 1=1 AND u.event_id = $1 AND u.user_id = $2 LIMIT 1) AND event_round_id = \
             (SELECT r.id FROM event_round r WHERE r.ended_at > now() AND r.event_id = $3 \
             ORDER BY r.ended_at ASC LIMIT 1)"
        );
    }

    #[test]
    fn values_never_appear_in_sql_text() {
        let mut qb = builder();
        push_event_filter(&mut qb, &event_by_name("'; DROP TABLE event; --"));
        assert!(!qb.sql().contains("DROP TABLE"));
    }
}
