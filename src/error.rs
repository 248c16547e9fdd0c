use thiserror::Error;

/// Errors raised by repository operations
///
/// Every variant fails the current operation outright. Nothing is retried
/// internally, and per-call query state has already been cleared by the time
/// the caller sees the error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A type-erased filter was built for a different entity than the repository manages
    #[error("filter for `{actual}` cannot be used with a repository of `{expected}`")]
    InvalidFilterType {
        expected: &'static str,
        actual: &'static str,
    },

    /// A type-erased entity is not an instance of the managed entity type
    #[error("entity of type `{actual}` cannot be persisted by a repository of `{expected}`")]
    InvalidEntityType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("order has {fields} fields but {directions} directions")]
    MalformedOrder { fields: usize, directions: usize },

    #[error("invalid order direction `{0}` (expected `asc` or `desc`)")]
    InvalidOrderDirection(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A field referenced a table that has no registered join for this base table
    #[error("no join registered from `{base_table}` to `{table}`")]
    UnregisteredJoin {
        base_table: &'static str,
        table: String,
    },

    /// Registered join dependencies lead back to a table still being resolved
    #[error("join dependencies from `{base_table}` form a cycle: {}", path.join(" -> "))]
    JoinCycle {
        base_table: &'static str,
        path: Vec<String>,
    },

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("failed to serialize entity: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
