//! Page index / size to offset / limit.

use serde::{Deserialize, Serialize};

/// Page size used when the request leaves it unset or below 1.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// `page_size` sentinel that removes limit and offset entirely.
/// Largest offset or limit a driver accepts.
const MAX_BOUND: u64 = i64::MAX.unsigned_abs();

pub const UNBOUNDED_PAGE_SIZE: i64 = -1;

/// Page request as bound from the caller (`pageIndex`, `pageSize`).
///
/// Values below 1 are not errors: they fall back to index 1 and the default size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page_index: i64,
    pub page_size: i64,
}

/// Paging limits from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageLimits {
    pub default_size: u64,
    pub max_size: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: 500,
        }
    }
}

/// Row window applied to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    Window { offset: u64, limit: u64 },
    Unbounded,
}

impl PageRequest {
    #[must_use]
    pub fn new(page_index: i64, page_size: i64) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Request every matching row.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(1, UNBOUNDED_PAGE_SIZE)
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.page_size == UNBOUNDED_PAGE_SIZE
    }

    /// Effective page index, at least 1.
    #[must_use]
    pub fn page_index(&self) -> u64 {
        u64::try_from(self.page_index).ok().filter(|i| *i >= 1).unwrap_or(1)
    }

    /// Effective page size: defaulted below 1, clamped to `max_size`.
    /// `None` for the unbounded sentinel.
    #[must_use]
    pub fn page_size(&self, limits: &PageLimits) -> Option<u64> {
        if self.is_unbounded() {
            return None;
        }
        let size = u64::try_from(self.page_size)
            .ok()
            .filter(|s| *s >= 1)
            .unwrap_or(limits.default_size);
        Some(size.min(limits.max_size.max(1)))
    }

    /// `offset = (index - 1) * size`, `limit = size`, both capped at `i64::MAX` so the
    /// values always bind as signed SQL integers.
    #[must_use]
    pub fn bounds(&self, limits: &PageLimits) -> Bounds {
        match self.page_size(limits) {
            None => Bounds::Unbounded,
            Some(limit) => Bounds::Window {
                offset: (self.page_index() - 1)
                    .saturating_mul(limit)
                    .min(MAX_BOUND),
                limit: limit.min(MAX_BOUND),
            },
        }
    }
}

/// One page of List results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Rows matching search and permission, ignoring paging.
    pub total: u64,
    pub page_index: u64,
    /// Effective size; absent for an unbounded request.
    pub page_size: Option<u64>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}
