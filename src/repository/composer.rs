use super::aggregate::AggregateSubqueryBuilder;
use super::entity::{AnyEntity, Entity};
use super::filter::FilterScope;
use super::joins::JoinResolver;
use super::order::OrderEvaluator;
use super::pagination::{Page, PaginationSpec};
use super::spec::QuerySpec;
use crate::backend::Backend;
use crate::config::QueryConfig;
use crate::error::{RepositoryError, RepositoryResult};
use crate::query_builder::{
    DeleteStatement, InsertStatement, Pagination, SelectQuery, UpdateStatement, WhereClause,
};
use serde_json::{Map, Value};
use std::any::type_name;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// Stateless composition engine for entity `E`
///
/// Every operation takes the criteria as a [`QuerySpec`] value, composes the
/// query (filter, aggregate wrapping, columns, forced joins, ordering, limit)
/// and executes it on the backend. Nothing is retained between calls; see
/// [`Repository`](super::Repository) for the setter-driven form.
pub struct QueryComposer<E, B> {
    backend: B,
    resolver: JoinResolver,
    _entity: PhantomData<fn() -> E>,
}

impl<E, B: Clone> Clone for QueryComposer<E, B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            resolver: self.resolver.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, B: Backend<E>> QueryComposer<E, B> {
    /// Composer with the default query configuration (strict joins)
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, &QueryConfig::default())
    }

    pub fn with_config(backend: B, config: &QueryConfig) -> Self {
        Self {
            backend,
            resolver: JoinResolver::for_entity::<E>(config.strict_joins),
            _entity: PhantomData,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn resolver(&self) -> &JoinResolver {
        &self.resolver
    }

    /// Base query with the filter applied, wrapped when aggregate mode is on
    fn filtered(&self, spec: &QuerySpec<E>) -> RepositoryResult<SelectQuery> {
        if spec.is_aggregate() {
            return AggregateSubqueryBuilder::new(&self.resolver).build(spec.filter());
        }
        let mut query = SelectQuery::new(E::TABLE);
        if let Some(filter) = spec.filter() {
            filter.apply_to(&mut FilterScope::new(&mut query, &self.resolver))?;
        }
        Ok(query)
    }

    fn force_joins(&self, query: &mut SelectQuery, spec: &QuerySpec<E>) -> RepositoryResult<()> {
        for table in spec.additional_tables() {
            self.resolver.ensure_table(query, table)?;
        }
        Ok(())
    }

    /// Query whose rows `count` and `exists` measure
    ///
    /// In aggregate mode forced joins are left out, so each base row is
    /// measured once.
    fn measured(&self, spec: &QuerySpec<E>) -> RepositoryResult<SelectQuery> {
        let mut query = self.filtered(spec)?;
        if !spec.is_aggregate() {
            self.force_joins(&mut query, spec)?;
        }
        Ok(query)
    }

    fn select_columns(&self, query: &mut SelectQuery, columns: &[String]) -> RepositoryResult<()> {
        for column in columns {
            self.resolver.ensure_for_field(query, column)?;
        }
        query.set_select(columns.to_vec());
        Ok(())
    }

    /// The row-returning query `spec` describes
    pub fn compose(&self, spec: &QuerySpec<E>) -> RepositoryResult<SelectQuery> {
        let mut query = self.filtered(spec)?;
        self.force_joins(&mut query, spec)?;
        if !spec.columns().is_empty() {
            self.select_columns(&mut query, spec.columns())?;
        }
        OrderEvaluator::new(&self.resolver).apply(&mut query, spec.order())?;
        if let Some(limit) = spec.limit() {
            query.set_pagination(Some(Pagination::limit_only(limit)));
        }
        Ok(query)
    }

    /// All rows matching the criteria
    pub async fn collection(&self, spec: &QuerySpec<E>) -> RepositoryResult<Vec<E>> {
        let query = self.compose(spec)?;
        self.backend.all(&query).await
    }

    /// One column of every matching row
    pub async fn pluck(&self, spec: &QuerySpec<E>, value_field: &str) -> RepositoryResult<Vec<Value>> {
        let mut query = self.compose(spec)?;
        self.select_columns(&mut query, &[value_field.to_string()])?;
        let rows = self.backend.values(&query).await?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or(Value::Null))
            .collect())
    }

    /// (key, value) pairs of every matching row, in row order
    pub async fn pluck_keyed(
        &self,
        spec: &QuerySpec<E>,
        value_field: &str,
        key_field: &str,
    ) -> RepositoryResult<Vec<(Value, Value)>> {
        let mut query = self.compose(spec)?;
        self.select_columns(&mut query, &[key_field.to_string(), value_field.to_string()])?;
        let rows = self.backend.values(&query).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let mut columns = row.into_iter();
                let key = columns.next().unwrap_or(Value::Null);
                let value = columns.next().unwrap_or(Value::Null);
                (key, value)
            })
            .collect())
    }

    /// Identities of every matching row
    pub async fn list_ids(&self, spec: &QuerySpec<E>) -> RepositoryResult<Vec<i64>> {
        let mut query = self.compose(spec)?;
        query.set_select(vec![self.resolver.identity_field()]);
        self.backend.ids(&query).await
    }

    /// Whether the filter matches anything; `false` without a filter
    pub async fn exists(&self, spec: &QuerySpec<E>) -> RepositoryResult<bool> {
        if !spec.has_filter() {
            debug!(entity = E::TABLE, "exists() without a filter");
            return Ok(false);
        }
        let query = self.measured(spec)?;
        self.backend.exists(&query).await
    }

    pub async fn first(&self, spec: &QuerySpec<E>) -> RepositoryResult<Option<E>> {
        let mut query = self.compose(spec)?;
        query.set_pagination(Some(Pagination::limit_only(1)));
        self.backend.first(&query).await
    }

    /// Number of matching rows
    ///
    /// Ordering, columns and limit do not take part. Without aggregate mode a
    /// filter or forced join over a one-to-many relation counts each joined
    /// row; with it every base row counts once.
    pub async fn count(&self, spec: &QuerySpec<E>) -> RepositoryResult<u64> {
        let query = self.measured(spec)?;
        self.backend.count(&query).await
    }

    /// Direct lookup by identity, ignoring every criterion
    pub async fn by_id(&self, id: i64) -> RepositoryResult<Option<E>> {
        let query = SelectQuery::new(E::TABLE)
            .where_eq(&self.resolver.identity_field(), Value::from(id))
            .limit(1);
        self.backend.first(&query).await
    }

    pub async fn find_or_fail(&self, id: i64) -> RepositoryResult<E> {
        self.by_id(id).await?.ok_or(RepositoryError::NotFound {
            entity: E::TABLE,
            id,
        })
    }

    /// One window of matching rows plus the total match count
    #[instrument(skip(self, spec), fields(entity = E::TABLE, page = pagination.page(), limit = pagination.limit()))]
    pub async fn page(
        &self,
        spec: &QuerySpec<E>,
        pagination: &PaginationSpec,
    ) -> RepositoryResult<Page<E>> {
        pagination.validate()?;
        let total = self.count(spec).await?;

        let mut query = self.compose(spec)?;
        query.set_pagination(Some(pagination.window()));
        let items = self.backend.all(&query).await?;

        Ok(Page::new(items, total, pagination))
    }

    /// Insert an entity without an identity (assigning the generated one), update it otherwise
    pub async fn store(&self, entity: &mut E) -> RepositoryResult<()> {
        let values = entity.to_values()?;
        match entity.id() {
            None => {
                let insert = values.into_iter().fold(
                    InsertStatement::new(E::TABLE, E::PRIMARY_KEY),
                    |insert, (column, value)| insert.value(&column, value),
                );
                let id = self.backend.insert(&insert).await?;
                entity.set_id(id);
                debug!(entity = E::TABLE, id, "Inserted entity");
                Ok(())
            }
            Some(id) => {
                let affected = if values.is_empty() {
                    u64::from(self.by_id(id).await?.is_some())
                } else {
                    let update = values.into_iter().fold(
                        UpdateStatement::new(E::TABLE)
                            .where_clause(WhereClause::simple(E::PRIMARY_KEY, "=", Value::from(id))),
                        |update, (column, value)| update.set(&column, value),
                    );
                    self.backend.update(&update).await?
                };
                if affected == 0 {
                    return Err(RepositoryError::NotFound {
                        entity: E::TABLE,
                        id,
                    });
                }
                Ok(())
            }
        }
    }

    /// Delete a persisted entity; `false` when it has no identity or was already gone
    pub async fn delete(&self, entity: &E) -> RepositoryResult<bool> {
        let Some(id) = entity.id() else {
            return Ok(false);
        };
        let delete = DeleteStatement::new(E::TABLE)
            .where_clause(WhereClause::simple(E::PRIMARY_KEY, "=", Value::from(id)));
        Ok(self.backend.delete(&delete).await? > 0)
    }

    fn downcast<'a>(&self, entity: &'a mut dyn AnyEntity) -> RepositoryResult<&'a mut E> {
        let actual = entity.entity_type_name();
        entity
            .as_any_mut()
            .downcast_mut::<E>()
            .ok_or(RepositoryError::InvalidEntityType {
                expected: type_name::<E>(),
                actual,
            })
    }

    /// [`store`](Self::store) for a type-erased entity
    pub async fn store_any(&self, entity: &mut dyn AnyEntity) -> RepositoryResult<()> {
        let entity = self.downcast(entity)?;
        self.store(entity).await
    }

    /// [`delete`](Self::delete) for a type-erased entity
    pub async fn delete_any(&self, entity: &mut dyn AnyEntity) -> RepositoryResult<bool> {
        let entity = self.downcast(entity)?;
        self.delete(entity).await
    }

    /// Apply `patch` to every row in the current id set
    #[instrument(skip(self, spec, patch), fields(entity = E::TABLE))]
    pub async fn update_all(
        &self,
        spec: &QuerySpec<E>,
        patch: &Map<String, Value>,
    ) -> RepositoryResult<u64> {
        if patch.is_empty() {
            return Ok(0);
        }
        let ids = self.list_ids(spec).await?;
        if ids.is_empty() {
            debug!("No rows matched; skipping bulk update");
            return Ok(0);
        }
        let update = patch.iter().fold(
            UpdateStatement::new(E::TABLE).where_clause(Self::identity_in(ids)),
            |update, (column, value)| update.set(column, value.clone()),
        );
        self.backend.update(&update).await
    }

    /// Delete every row in the current id set
    #[instrument(skip(self, spec), fields(entity = E::TABLE))]
    pub async fn delete_all(&self, spec: &QuerySpec<E>) -> RepositoryResult<u64> {
        let ids = self.list_ids(spec).await?;
        if ids.is_empty() {
            debug!("No rows matched; skipping bulk delete");
            return Ok(0);
        }
        let delete = DeleteStatement::new(E::TABLE).where_clause(Self::identity_in(ids));
        self.backend.delete(&delete).await
    }

    fn identity_in(ids: Vec<i64>) -> WhereClause {
        WhereClause::in_condition(E::PRIMARY_KEY, ids.into_iter().map(Value::from).collect())
    }
}
