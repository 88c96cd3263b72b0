//! Page-number pagination parameters.
//!
//! Query values arrive as raw strings. Anything that does not parse falls
//! back to the default instead of failing the request.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit into `1..=max`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Parse an optional non-negative count such as `recipes_limit`.
///
/// Returns `None` (no limit) for missing, unparseable, or negative values.
pub fn parse_optional_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|n| *n >= 0)
}

/// A resolved `?page=&limit=` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = clamp_limit(
            limit.and_then(|l| l.trim().parse::<i64>().ok()),
            DEFAULT_PAGE_SIZE,
            MAX_PAGE_SIZE,
        );
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn has_next(&self, count: i64) -> bool {
        self.page.saturating_mul(self.limit) < count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// `{count, next, previous, results}` page envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
