//! Filter criteria bound to an entity type
//!
//! A [`Filter`] knows how to restrict a query over its entity's base table. It
//! never builds joins by hand: every predicate goes through [`FilterScope`],
//! which asks the [`JoinResolver`] to bring in the table of each qualified
//! field before the predicate is added.

use super::entity::Entity;
use super::joins::JoinResolver;
use crate::error::RepositoryResult;
use crate::query_builder::{SelectQuery, WhereClause};
use serde_json::Value;
use std::any::{type_name, TypeId};

/// Predicate applier for one entity type
///
/// ```rust
/// use query_composer::repository::{Filter, FilterScope};
/// use query_composer::error::RepositoryResult;
/// # use query_composer::repository::Entity;
/// # #[derive(serde::Serialize)]
/// # struct User { id: Option<i64> }
/// # impl Entity for User {
/// #     const TABLE: &'static str = "users";
/// #     fn id(&self) -> Option<i64> { self.id }
/// #     fn set_id(&mut self, id: i64) { self.id = Some(id); }
/// # }
///
/// struct ActiveUsers;
///
/// impl Filter for ActiveUsers {
///     type Entity = User;
///
///     fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
///         scope.where_eq("users.active", serde_json::json!(true))?;
///         Ok(())
///     }
/// }
/// ```
pub trait Filter: Send + Sync + 'static {
    type Entity: Entity;

    fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()>;
}

/// Object-safe form of [`Filter`] carrying its owning entity type
pub trait DynFilter: Send + Sync + 'static {
    fn entity_type(&self) -> TypeId;

    fn entity_name(&self) -> &'static str;

    fn apply_to(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()>;
}

impl<F: Filter> DynFilter for F {
    fn entity_type(&self) -> TypeId {
        TypeId::of::<F::Entity>()
    }

    fn entity_name(&self) -> &'static str {
        type_name::<F::Entity>()
    }

    fn apply_to(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
        self.apply(scope)
    }
}

impl std::fmt::Debug for dyn DynFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynFilter")
            .field("entity", &self.entity_name())
            .finish()
    }
}

/// Join-aware view of the query a filter is applied to
pub struct FilterScope<'a> {
    query: &'a mut SelectQuery,
    resolver: &'a JoinResolver,
}

impl<'a> FilterScope<'a> {
    pub fn new(query: &'a mut SelectQuery, resolver: &'a JoinResolver) -> Self {
        Self { query, resolver }
    }

    /// Ensure the registered join for a table is present
    pub fn join(&mut self, table: &str) -> RepositoryResult<&mut Self> {
        self.resolver.ensure_table(self.query, table)?;
        Ok(self)
    }

    /// Add a clause whose fields are already joined
    pub fn where_clause(&mut self, clause: WhereClause) -> &mut Self {
        self.query.add_where(clause);
        self
    }

    pub fn where_eq(&mut self, field: &str, value: Value) -> RepositoryResult<&mut Self> {
        self.where_op(field, "=", value)
    }

    pub fn where_op(
        &mut self,
        field: &str,
        operator: &str,
        value: Value,
    ) -> RepositoryResult<&mut Self> {
        self.resolver.ensure_for_field(self.query, field)?;
        Ok(self.where_clause(WhereClause::simple(field, operator, value)))
    }

    pub fn where_in(&mut self, field: &str, values: Vec<Value>) -> RepositoryResult<&mut Self> {
        self.resolver.ensure_for_field(self.query, field)?;
        Ok(self.where_clause(WhereClause::in_condition(field, values)))
    }

    pub fn where_not_in(&mut self, field: &str, values: Vec<Value>) -> RepositoryResult<&mut Self> {
        self.resolver.ensure_for_field(self.query, field)?;
        Ok(self.where_clause(WhereClause::not_in_condition(field, values)))
    }

    pub fn where_between(
        &mut self,
        field: &str,
        start: Value,
        end: Value,
    ) -> RepositoryResult<&mut Self> {
        self.resolver.ensure_for_field(self.query, field)?;
        Ok(self.where_clause(WhereClause::between(field, start, end)))
    }

    pub fn where_null(&mut self, field: &str) -> RepositoryResult<&mut Self> {
        self.resolver.ensure_for_field(self.query, field)?;
        Ok(self.where_clause(WhereClause::is_null(field)))
    }

    pub fn where_not_null(&mut self, field: &str) -> RepositoryResult<&mut Self> {
        self.resolver.ensure_for_field(self.query, field)?;
        Ok(self.where_clause(WhereClause::is_not_null(field)))
    }

    /// The query being filtered, for conditions the helpers above don't cover
    pub fn query(&mut self) -> &mut SelectQuery {
        &mut *self.query
    }

    pub fn resolver(&self) -> &JoinResolver {
        self.resolver
    }
}
