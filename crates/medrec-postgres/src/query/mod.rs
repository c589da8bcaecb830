//! Repositories for the patients registry.
//!
//! Queries that may return large result sets take a [`Pagination`] so every
//! listing is bounded.

pub mod patient;

pub use patient::PatientRepository;
use serde::{Deserialize, Serialize};

/// Maximum number of records a single page may hold.
pub const MAX_LIMIT: i64 = 1000;

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance, clamping both bounds.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_LIMIT);
        Self::new(page_size, (page - 1) * page_size)
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(50, 0)
    }
}
