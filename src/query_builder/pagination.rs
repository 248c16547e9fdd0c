use super::writer::{Dialect, SqlWriter};

/// LIMIT/OFFSET window applied to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    /// Create pagination with a 1-indexed page number and per-page count
    pub fn new(page: u64, per_page: u64) -> Self {
        let offset = if page > 0 {
            Some((page - 1).saturating_mul(per_page))
        } else {
            None
        };
        Self {
            limit: Some(per_page),
            offset,
        }
    }

    /// Create pagination with only limit
    pub fn limit_only(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Create pagination with only offset
    pub fn offset_only(offset: u64) -> Self {
        Self {
            limit: None,
            offset: Some(offset),
        }
    }

    /// Create pagination with both limit and offset
    pub fn limit_offset(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    pub(crate) fn write(&self, w: &mut SqlWriter) {
        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                w.push(&format!(" LIMIT {limit}"));
                if let Some(offset) = offset {
                    w.push(&format!(" OFFSET {offset}"));
                }
            }
            // SQLite rejects OFFSET without LIMIT
            (None, Some(offset)) => match w.dialect() {
                Some(Dialect::Sqlite) => w.push(&format!(" LIMIT -1 OFFSET {offset}")),
                _ => w.push(&format!(" LIMIT ALL OFFSET {offset}")),
            },
            (None, None) => {}
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut w = SqlWriter::inline();
        self.write(&mut w);
        w.into_sql()
    }

    /// Calculate total pages given a total count (at least one page)
    pub fn total_pages(&self, total_count: u64) -> u64 {
        match self.limit {
            Some(limit) if limit > 0 => total_count.div_ceil(limit).max(1),
            _ => 1,
        }
    }

    /// Get current page number (1-indexed)
    pub fn current_page(&self) -> u64 {
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) if limit > 0 => (offset / limit) + 1,
            _ => 1,
        }
    }

    /// Check if there's a next page
    pub fn has_next_page(&self, total_count: u64) -> bool {
        match (self.limit, self.offset) {
            (Some(limit), offset) => offset.unwrap_or(0) + limit < total_count,
            _ => false,
        }
    }

    /// Check if there's a previous page
    pub fn has_previous_page(&self) -> bool {
        self.offset.is_some_and(|offset| offset > 0)
    }
}
