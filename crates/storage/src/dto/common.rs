use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Page-based pagination carried on every listing request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Pagination {
    pub page: Option<u32>,
    pub max: Option<u32>,
}

impl Pagination {
    /// Resolves to a `(LIMIT, OFFSET)` pair. `max` falls back to
    /// `default_max` when unset or zero and clamps to `max_max`; `page`
    /// defaults to 1 and floors at 1.
    pub fn limit_offset(&self, default_max: u32, max_max: u32) -> (i64, i64) {
        let max = match self.max {
            None | Some(0) => default_max,
            Some(max) => max.min(max_max),
        };
        let page = self.page.unwrap_or(1).max(1);
        (i64::from(max), i64::from(page - 1) * i64::from(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let pagination = Pagination::default();
        assert_eq!(pagination.limit_offset(10, 100), (10, 0));
    }

    #[test]
    fn zero_max_substitutes_default() {
        let pagination = Pagination {
            page: Some(1),
            max: Some(0),
        };
        assert_eq!(pagination.limit_offset(10, 100), (10, 0));
    }

    #[test]
    fn max_clamps_to_ceiling() {
        let pagination = Pagination {
            page: Some(1),
            max: Some(500),
        };
        assert_eq!(pagination.limit_offset(10, 100), (100, 0));
    }

    #[test]
    fn page_floors_at_one() {
        let pagination = Pagination {
            page: Some(0),
            max: Some(5),
        };
        assert_eq!(pagination.limit_offset(10, 100), (5, 0));
    }

    #[test]
    fn offset_skips_previous_pages() {
        let pagination = Pagination {
            page: Some(2),
            max: Some(2),
        };
        assert_eq!(pagination.limit_offset(10, 100), (2, 2));
    }
}
