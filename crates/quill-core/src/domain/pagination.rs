use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default page size when a listing request does not specify one.
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Largest page size a listing request may ask for.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Largest row offset a page window may reach; SQL `OFFSET` is a signed bigint.
pub const MAX_PAGE_OFFSET: u64 = i64::MAX as u64;

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Number of rows to skip, saturating instead of overflowing.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Highest page whose offset still fits in [`MAX_PAGE_OFFSET`].
    pub fn max_page(limit: u64) -> u64 {
        MAX_PAGE_OFFSET / limit.max(1) + 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("ASC"),
            SortOrder::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 5 }.offset(), 10);
    }

    #[test]
    fn test_offset_saturates() {
        let huge = PageRequest {
            page: u64::MAX,
            limit: MAX_PAGE_LIMIT,
        };
        assert_eq!(huge.offset(), u64::MAX);
        assert_eq!(PageRequest { page: 0, limit: 5 }.offset(), 0);
    }

    #[test]
    fn test_max_page_keeps_offset_in_range() {
        let limit = 3;
        let last = PageRequest {
            page: PageRequest::max_page(limit),
            limit,
        };
        assert!(last.offset() <= MAX_PAGE_OFFSET);
        assert!((last.offset() + limit) > MAX_PAGE_OFFSET);
    }
}
