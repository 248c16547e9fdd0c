use super::composer::QueryComposer;
use super::entity::{AnyEntity, Entity};
use super::filter::{DynFilter, Filter};
use super::order::OrderSpec;
use super::pagination::{Page, PaginationSpec};
use super::spec::QuerySpec;
use crate::backend::Backend;
use crate::config::QueryConfig;
use crate::error::RepositoryResult;
use crate::query_builder::SelectQuery;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Setter-driven repository over a [`QueryComposer`]
///
/// Criteria accumulate through the `set_*` methods and are consumed by the
/// next operation: every operation moves the pending [`QuerySpec`] out before
/// doing anything else, so the following call starts clean whether the
/// operation succeeded or failed.
///
/// ```rust,no_run
/// # use query_composer::backend::SqliteBackend;
/// # use query_composer::repository::{Entity, OrderSpec, Repository};
/// # use query_composer::query_builder::OrderDirection;
/// # #[derive(serde::Serialize, sqlx::FromRow)]
/// # struct User { id: Option<i64>, name: String }
/// # impl Entity for User {
/// #     const TABLE: &'static str = "users";
/// #     fn id(&self) -> Option<i64> { self.id }
/// #     fn set_id(&mut self, id: i64) { self.id = Some(id); }
/// # }
/// # async fn run(backend: SqliteBackend) -> query_composer::error::RepositoryResult<()> {
/// let mut users = Repository::<User, _>::new(backend);
///
/// let newest = users
///     .set_order(Some(OrderSpec::by("users.id", OrderDirection::Desc)))
///     .set_limit(Some(10))
///     .collection()
///     .await?;
///
/// // criteria were consumed by the previous call
/// let everyone = users.count().await?;
/// # Ok(())
/// # }
/// ```
pub struct Repository<E, B> {
    composer: QueryComposer<E, B>,
    state: QuerySpec<E>,
}

impl<E: Entity, B: Backend<E>> Repository<E, B> {
    pub fn new(backend: B) -> Self {
        Self::from_composer(QueryComposer::new(backend))
    }

    pub fn with_config(backend: B, config: &QueryConfig) -> Self {
        Self::from_composer(QueryComposer::with_config(backend, config))
    }

    pub fn from_composer(composer: QueryComposer<E, B>) -> Self {
        Self {
            composer,
            state: QuerySpec::default(),
        }
    }

    pub fn composer(&self) -> &QueryComposer<E, B> {
        &self.composer
    }

    /// Criteria the next operation will use
    pub fn pending(&self) -> &QuerySpec<E> {
        &self.state
    }

    fn take_state(&mut self) -> QuerySpec<E> {
        std::mem::take(&mut self.state)
    }

    pub fn set_filter<F: Filter<Entity = E>>(&mut self, filter: F) -> &mut Self {
        self.state.set_filter(filter);
        self
    }

    /// Set a type-erased filter; fails if it belongs to another entity type
    pub fn set_dyn_filter(&mut self, filter: Arc<dyn DynFilter>) -> RepositoryResult<&mut Self> {
        self.state.set_dyn_filter(filter)?;
        Ok(self)
    }

    pub fn set_order(&mut self, order: Option<OrderSpec>) -> &mut Self {
        self.state.set_order(order);
        self
    }

    /// Cap the next read at `limit` rows; `Some(0)` and `None` both mean no cap
    pub fn set_limit(&mut self, limit: Option<u64>) -> &mut Self {
        self.state.set_limit(limit);
        self
    }

    pub fn set_columns<S: Into<String>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.state.set_columns(columns);
        self
    }

    pub fn set_is_aggregate_query(&mut self, aggregate: bool) -> &mut Self {
        self.state.set_aggregate(aggregate);
        self
    }

    pub fn set_additional_tables<S: Into<String>>(
        &mut self,
        tables: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.state.set_additional_tables(tables);
        self
    }

    pub fn is_aggregate_query(&self) -> bool {
        self.state.is_aggregate()
    }

    /// The query the pending criteria would execute
    pub fn prepared_query(&mut self) -> RepositoryResult<SelectQuery> {
        let spec = self.take_state();
        self.composer.compose(&spec)
    }

    pub async fn collection(&mut self) -> RepositoryResult<Vec<E>> {
        let spec = self.take_state();
        self.composer.collection(&spec).await
    }

    pub async fn pluck(&mut self, value_field: &str) -> RepositoryResult<Vec<Value>> {
        let spec = self.take_state();
        self.composer.pluck(&spec, value_field).await
    }

    pub async fn pluck_keyed(
        &mut self,
        value_field: &str,
        key_field: &str,
    ) -> RepositoryResult<Vec<(Value, Value)>> {
        let spec = self.take_state();
        self.composer.pluck_keyed(&spec, value_field, key_field).await
    }

    pub async fn list_ids(&mut self) -> RepositoryResult<Vec<i64>> {
        let spec = self.take_state();
        self.composer.list_ids(&spec).await
    }

    pub async fn exists(&mut self) -> RepositoryResult<bool> {
        let spec = self.take_state();
        self.composer.exists(&spec).await
    }

    pub async fn first(&mut self) -> RepositoryResult<Option<E>> {
        let spec = self.take_state();
        self.composer.first(&spec).await
    }

    pub async fn count(&mut self) -> RepositoryResult<u64> {
        let spec = self.take_state();
        self.composer.count(&spec).await
    }

    pub async fn by_id(&mut self, id: i64) -> RepositoryResult<Option<E>> {
        self.take_state();
        self.composer.by_id(id).await
    }

    pub async fn find_or_fail(&mut self, id: i64) -> RepositoryResult<E> {
        self.take_state();
        self.composer.find_or_fail(id).await
    }

    pub async fn page(&mut self, pagination: &PaginationSpec) -> RepositoryResult<Page<E>> {
        let spec = self.take_state();
        self.composer.page(&spec, pagination).await
    }

    pub async fn store(&mut self, entity: &mut E) -> RepositoryResult<()> {
        self.take_state();
        self.composer.store(entity).await
    }

    pub async fn delete(&mut self, entity: &E) -> RepositoryResult<bool> {
        self.take_state();
        self.composer.delete(entity).await
    }

    pub async fn store_any(&mut self, entity: &mut dyn AnyEntity) -> RepositoryResult<()> {
        self.take_state();
        self.composer.store_any(entity).await
    }

    pub async fn delete_any(&mut self, entity: &mut dyn AnyEntity) -> RepositoryResult<bool> {
        self.take_state();
        self.composer.delete_any(entity).await
    }

    pub async fn update_all(&mut self, patch: &Map<String, Value>) -> RepositoryResult<u64> {
        let spec = self.take_state();
        self.composer.update_all(&spec, patch).await
    }

    pub async fn delete_all(&mut self) -> RepositoryResult<u64> {
        let spec = self.take_state();
        self.composer.delete_all(&spec).await
    }
}
