use std::sync::Arc;
use std::time::Duration;

use storage::Database;
use storage::dto::common::Pagination;
use storage::dto::event::{EventRef, EventUserRef, LookupError, RoundRef, RoundUserRef};

use crate::cache::Cacher;
use crate::config::Config;
use crate::invoker::{
    BasicInvoker, CacheInvoker, Command, Fault, Invoker, LogInvoker, MetricInvoker,
    TransportInvoker,
};
use crate::metrics::Metrics;

/// Tuning limits shared by every event command, with the lookup validation
/// they imply.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub min_event_name_length: usize,
    pub max_event_name_length: usize,
    pub min_round_name_length: usize,
    pub max_round_name_length: usize,
    pub max_number_of_rounds: usize,
    pub default_page_length: u32,
    pub max_page_length: u32,
}

impl Limits {
    /// An event lookup needs an id, or a name within the configured bounds.
    pub fn check_event_ref(&self, event: &EventRef) -> Option<LookupError> {
        if event.id.is_some() {
            return None;
        }
        let Some(name) = &event.name else {
            return Some(LookupError::IdOrNameRequired);
        };
        if name.len() < self.min_event_name_length {
            return Some(LookupError::NameTooShort);
        }
        if name.len() > self.max_event_name_length {
            return Some(LookupError::NameTooLong);
        }
        None
    }

    /// A round lookup needs its own id, or a resolvable event: an absent
    /// round id and name mean "the current round", which is not an error.
    pub fn check_round_ref(&self, round: &RoundRef) -> Option<LookupError> {
        if round.id.is_some() {
            return None;
        }
        self.check_event_ref(&round.event)
    }

    /// An event-user lookup needs its own id, or a resolvable event plus a
    /// user id.
    pub fn check_event_user_ref(&self, user: &EventUserRef) -> Option<LookupError> {
        if user.id.is_some() {
            return None;
        }
        if let Some(err) = self.check_event_ref(&user.event) {
            return Some(err);
        }
        if user.user_id.is_none() {
            return Some(LookupError::UserIdRequired);
        }
        None
    }

    /// A result lookup needs its own id, or a resolvable event user: an
    /// absent round name means "the current round".
    pub fn check_round_user_ref(&self, result: &RoundUserRef) -> Option<LookupError> {
        if result.id.is_some() {
            return None;
        }
        self.check_event_user_ref(&result.user)
    }
}

/// Shared context for event commands: storage handles plus tuning limits.
/// Commands borrow this through an `Arc` and hold no state of their own, so
/// no locking is needed across invocations.
pub struct EventService {
    pub db: Database,
    cache: Arc<dyn Cacher>,
    metrics: Arc<dyn Metrics>,
    pub limits: Limits,
    command_timeout: Duration,
}

impl EventService {
    pub fn new(
        db: Database,
        cache: Arc<dyn Cacher>,
        metrics: Arc<dyn Metrics>,
        config: &Config,
    ) -> Self {
        Self {
            db,
            cache,
            metrics,
            limits: Limits {
                min_event_name_length: config.min_event_name_length,
                max_event_name_length: config.max_event_name_length,
                min_round_name_length: config.min_round_name_length,
                max_round_name_length: config.max_round_name_length,
                max_number_of_rounds: config.max_number_of_rounds,
                default_page_length: config.default_page_length,
                max_page_length: config.max_page_length,
            },
            command_timeout: Duration::from_secs(config.command_timeout_secs),
        }
    }

    /// Chain for read commands. The cache sits inside metrics so cache hits
    /// still count as served requests.
    pub async fn dispatch_read<C: Command>(&self, command: &C) -> Result<C::Response, Fault> {
        let invoker = LogInvoker::new(TransportInvoker::new(
            self.command_timeout,
            MetricInvoker::new(
                Arc::clone(&self.metrics),
                CacheInvoker::new(Arc::clone(&self.cache), BasicInvoker),
            ),
        ));
        invoker.invoke(command).await
    }

    /// Chain for mutating commands; never cached.
    pub async fn dispatch_write<C: Command>(&self, command: &C) -> Result<C::Response, Fault> {
        let invoker = LogInvoker::new(TransportInvoker::new(
            self.command_timeout,
            MetricInvoker::new(Arc::clone(&self.metrics), BasicInvoker),
        ));
        invoker.invoke(command).await
    }

    pub fn page(&self, pagination: &Pagination) -> (i64, i64) {
        pagination.limit_offset(self.limits.default_page_length, self.limits.max_page_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits {
            min_event_name_length: 3,
            max_event_name_length: 20,
            min_round_name_length: 3,
            max_round_name_length: 20,
            max_number_of_rounds: 10,
            default_page_length: 10,
            max_page_length: 100,
        }
    }

    #[test]
    fn event_ref_with_id_is_valid() {
        let event = EventRef {
            id: Some(1),
            name: None,
        };
        assert_eq!(limits().check_event_ref(&event), None);
    }

    #[test]
    fn empty_event_ref_is_rejected() {
        assert_eq!(
            limits().check_event_ref(&EventRef::default()),
            Some(LookupError::IdOrNameRequired)
        );
    }

    #[test]
    fn short_event_name_is_rejected() {
        let event = EventRef {
            id: None,
            name: Some("ab".to_owned()),
        };
        assert_eq!(
            limits().check_event_ref(&event),
            Some(LookupError::NameTooShort)
        );
    }

    #[test]
    fn long_event_name_is_rejected() {
        let event = EventRef {
            id: None,
            name: Some("a".repeat(21)),
        };
        assert_eq!(
            limits().check_event_ref(&event),
            Some(LookupError::NameTooLong)
        );
    }

    #[test]
    fn empty_round_ref_means_current_round() {
        let round = RoundRef {
            event: EventRef {
                id: Some(4),
                name: None,
            },
            ..RoundRef::default()
        };
        assert_eq!(limits().check_round_ref(&round), None);
    }

    #[test]
    fn round_ref_without_event_or_id_is_rejected() {
        assert_eq!(
            limits().check_round_ref(&RoundRef::default()),
            Some(LookupError::IdOrNameRequired)
        );
    }

    #[test]
    fn event_user_ref_needs_a_user_id() {
        let user = EventUserRef {
            event: EventRef {
                id: Some(4),
                name: None,
            },
            id: None,
            user_id: None,
        };
        assert_eq!(
            limits().check_event_user_ref(&user),
            Some(LookupError::UserIdRequired)
        );
    }

    #[test]
    fn round_user_ref_by_id_is_valid() {
        let result = RoundUserRef {
            id: Some(11),
            ..RoundUserRef::default()
        };
        assert_eq!(limits().check_round_user_ref(&result), None);
    }
}
