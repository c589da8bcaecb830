//! Pagination request types.

use medrec_postgres::query::Pagination as QueryPagination;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Offset pagination for patient listings.
///
/// Both bounds are validated before reaching the database; out of range
/// values are reported rather than silently clamped.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct Pagination {
    /// Number of records to skip.
    #[validate(range(min = 0, message = "El desplazamiento no puede ser negativo"))]
    pub offset: Option<i64>,

    /// Maximum number of records to return.
    #[validate(range(min = 1, max = 1000, message = "El límite debe estar entre 1 y 1000"))]
    pub limit: Option<i64>,
}

impl Pagination {
    const DEFAULT_LIMIT: i64 = 50;
    const DEFAULT_OFFSET: i64 = 0;

    /// Returns a new [`Pagination`].
    #[inline]
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    /// Returns the offset, or zero.
    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(Self::DEFAULT_OFFSET)
    }

    /// Returns the limit, or the default page size.
    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

impl From<Pagination> for QueryPagination {
    fn from(pagination: Pagination) -> Self {
        QueryPagination::new(pagination.limit(), pagination.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let query: QueryPagination = Pagination::default().into();
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn out_of_range_bounds_are_rejected() {
        assert!(Pagination::new(0, 1000).validate().is_ok());
        assert!(Pagination::new(-1, 10).validate().is_err());
        assert!(Pagination::new(0, 0).validate().is_err());
        assert!(Pagination::new(0, 1001).validate().is_err());
    }
}
