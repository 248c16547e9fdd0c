use super::entity::Entity;
use super::filter::{DynFilter, Filter};
use super::order::OrderSpec;
use crate::error::{RepositoryError, RepositoryResult};
use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Per-call query criteria for entity `E`
///
/// A plain value: build it with the `with_*` methods and hand it to a
/// [`QueryComposer`](super::QueryComposer) operation, or let a
/// [`Repository`](super::Repository) accumulate one through its setters.
pub struct QuerySpec<E> {
    filter: Option<Arc<dyn DynFilter>>,
    order: Option<OrderSpec>,
    limit: Option<u64>,
    columns: Vec<String>,
    aggregate: bool,
    additional_tables: Vec<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Default for QuerySpec<E> {
    fn default() -> Self {
        Self {
            filter: None,
            order: None,
            limit: None,
            columns: Vec::new(),
            aggregate: false,
            additional_tables: Vec::new(),
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for QuerySpec<E> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            order: self.order.clone(),
            limit: self.limit,
            columns: self.columns.clone(),
            aggregate: self.aggregate,
            additional_tables: self.additional_tables.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for QuerySpec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySpec")
            .field("entity", &type_name::<E>())
            .field("filter", &self.filter)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("columns", &self.columns)
            .field("aggregate", &self.aggregate)
            .field("additional_tables", &self.additional_tables)
            .finish()
    }
}

impl<E: Entity> QuerySpec<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter<F: Filter<Entity = E>>(mut self, filter: F) -> Self {
        self.set_filter(filter);
        self
    }

    pub fn with_dyn_filter(mut self, filter: Arc<dyn DynFilter>) -> RepositoryResult<Self> {
        self.set_dyn_filter(filter)?;
        Ok(self)
    }

    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.set_limit(Some(limit));
        self
    }

    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.set_columns(columns);
        self
    }

    pub fn with_aggregate(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn with_additional_tables<S: Into<String>>(
        mut self,
        tables: impl IntoIterator<Item = S>,
    ) -> Self {
        self.set_additional_tables(tables);
        self
    }

    pub fn set_filter<F: Filter<Entity = E>>(&mut self, filter: F) {
        self.filter = Some(Arc::new(filter));
    }

    /// Set a type-erased filter, rejecting filters owned by another entity
    pub fn set_dyn_filter(&mut self, filter: Arc<dyn DynFilter>) -> RepositoryResult<()> {
        if filter.entity_type() != TypeId::of::<E>() {
            return Err(RepositoryError::InvalidFilterType {
                expected: type_name::<E>(),
                actual: filter.entity_name(),
            });
        }
        self.filter = Some(filter);
        Ok(())
    }

    pub fn set_order(&mut self, order: Option<OrderSpec>) {
        self.order = order;
    }

    /// Row cap for the next read; `Some(0)` means no limit
    pub fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit.filter(|limit| *limit > 0);
    }

    pub fn set_columns<S: Into<String>>(&mut self, columns: impl IntoIterator<Item = S>) {
        self.columns = columns.into_iter().map(Into::into).collect();
    }

    pub fn set_aggregate(&mut self, aggregate: bool) {
        self.aggregate = aggregate;
    }

    pub fn set_additional_tables<S: Into<String>>(&mut self, tables: impl IntoIterator<Item = S>) {
        self.additional_tables = tables.into_iter().map(Into::into).collect();
    }

    pub fn filter(&self) -> Option<&dyn DynFilter> {
        self.filter.as_deref()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn order(&self) -> Option<&OrderSpec> {
        self.order.as_ref()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_aggregate(&self) -> bool {
        self.aggregate
    }

    pub fn additional_tables(&self) -> &[String] {
        &self.additional_tables
    }
}
