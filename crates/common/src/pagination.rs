//! Page-request parsing and the pagination response block.

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request. Anything above is clamped, not
/// rejected.
pub const MAX_LIMIT: u64 = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum SortDir {
    /// Ascending.
    #[serde(alias = "ASC", alias = "asc")]
    Asc,
    /// Descending.
    #[default]
    #[serde(alias = "DESC", alias = "desc")]
    Desc,
}

/// Query-string pagination and ordering parameters shared by every list
/// endpoint.
///
/// Out-of-range values are normalized rather than rejected: a page below 1
/// becomes 1, a limit outside `1..=MAX_LIMIT` is clamped. Unknown sort
/// columns are resolved against a per-entity allow list downstream and fall
/// back to the creation timestamp.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u64>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u64>,
    /// Requested sort column name.
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: Option<SortDir>,
}

impl PageRequest {
    /// Normalized 1-based page number.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Normalized page size, defaulting to `default_limit`.
    #[must_use]
    pub fn limit_or(&self, default_limit: u64) -> u64 {
        self.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT)
    }

    /// Row offset derived from page and limit.
    #[must_use]
    pub fn offset(&self, default_limit: u64) -> u64 {
        (self.page() - 1) * self.limit_or(default_limit)
    }

    /// Requested sort direction, defaulting to descending.
    #[must_use]
    pub fn sort_dir(&self) -> SortDir {
        self.sort_order.unwrap_or_default()
    }
}

/// Pagination block included in every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page number served.
    pub page: u64,
    /// Page size served.
    pub limit: u64,
    /// Total matching rows.
    pub total: u64,
    /// Total page count, `ceil(total / limit)`.
    pub pages: u64,
}

impl Pagination {
    /// Build the block from the served page, limit and total row count.
    #[must_use]
    pub const fn new(page: u64, limit: u64, total: u64) -> Self {
        let pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}
