//! Page/limit/offset criteria and the counted result window

use crate::config::QueryConfig;
use crate::error::{RepositoryError, RepositoryResult};
use crate::query_builder::Pagination;
use serde::{Deserialize, Serialize};

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    QueryConfig::default().default_page_size
}

/// Requested result window
///
/// `page` is 1-indexed. An explicit `offset` takes precedence over the
/// page-derived one, which is `(page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSpec {
    #[serde(default = "default_page")]
    page: u64,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
}

impl PaginationSpec {
    pub fn new(page: u64, limit: u64) -> RepositoryResult<Self> {
        let spec = Self {
            page,
            limit,
            offset: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build from optional request parameters
    ///
    /// Missing values fall back to the configured defaults and the limit is
    /// clamped to `max_page_size`.
    pub fn from_request(
        page: Option<u64>,
        limit: Option<u64>,
        offset: Option<u64>,
        config: &QueryConfig,
    ) -> RepositoryResult<Self> {
        let limit = limit
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);
        let spec = Self {
            page: page.unwrap_or(1),
            limit,
            offset,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> RepositoryResult<()> {
        if self.page < 1 {
            return Err(RepositoryError::InvalidPagination(format!(
                "page must be at least 1, got {}",
                self.page
            )));
        }
        if self.limit < 1 {
            return Err(RepositoryError::InvalidPagination(format!(
                "limit must be at least 1, got {}",
                self.limit
            )));
        }
        Ok(())
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows skipped before the window starts
    pub fn offset(&self) -> u64 {
        self.offset
            .unwrap_or_else(|| self.page.saturating_sub(1).saturating_mul(self.limit))
    }

    pub fn window(&self) -> Pagination {
        Pagination::limit_offset(self.limit, self.offset())
    }
}

/// One window of results plus the total across all windows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
    /// 1-based position of the first item, `None` for an empty window
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl<E> Page<E> {
    pub fn new(items: Vec<E>, total: u64, spec: &PaginationSpec) -> Self {
        let window = spec.window();
        let offset = spec.offset();
        let (from, to) = if items.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + items.len() as u64))
        };
        Self {
            total,
            per_page: spec.limit(),
            current_page: spec.page(),
            last_page: window.total_pages(total),
            from,
            to,
            items,
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn map<U>(self, f: impl FnMut(E) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
            last_page: self.last_page,
            from: self.from,
            to: self.to,
        }
    }
}
