// Filter set scoping every query of one dashboard view
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FilterSet {
    pub month: i32,
    pub year: i32,
}

impl FilterSet {
    pub fn new(month: i32, year: i32) -> Self {
        Self { month, year }
    }

    /// Current UTC month and year
    pub fn current() -> Self {
        let now = Utc::now();
        Self::new(now.month() as i32, now.year())
    }
}

/// Raw `?month=&year=` query parameters. Anything missing falls back to
/// the current period; out-of-range values are passed through untouched.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

impl FilterQuery {
    pub fn resolve(&self) -> FilterSet {
        let current = FilterSet::current();
        FilterSet::new(
            self.month.unwrap_or(current.month),
            self.year.unwrap_or(current.year),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let query = FilterQuery {
            month: Some(6),
            year: Some(2024),
        };
        assert_eq!(query.resolve(), FilterSet::new(6, 2024));
    }

    #[test]
    fn test_resolve_passes_out_of_range_month_through() {
        let query = FilterQuery {
            month: Some(13),
            year: Some(1999),
        };
        assert_eq!(query.resolve(), FilterSet::new(13, 1999));
    }

    #[test]
    fn test_resolve_defaults_to_current_period() {
        let resolved = FilterQuery::default().resolve();
        let current = FilterSet::current();
        assert_eq!(resolved.year, current.year);
        assert!((1..=12).contains(&resolved.month));
    }
}
