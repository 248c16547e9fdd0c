use super::filter::{DynFilter, FilterScope};
use super::joins::JoinResolver;
use crate::error::RepositoryResult;
use crate::query_builder::SelectQuery;

/// Rewraps a filtered query as `base.id IN (SELECT base.id ...)`
///
/// One-to-many joins pulled in by a filter multiply base rows. Keeping the
/// filter and its joins in the inner identity selection leaves the outer
/// query join-free, so counts and windows see each base row once.
pub struct AggregateSubqueryBuilder<'a> {
    resolver: &'a JoinResolver,
}

impl<'a> AggregateSubqueryBuilder<'a> {
    pub fn new(resolver: &'a JoinResolver) -> Self {
        Self { resolver }
    }

    /// Inner query selecting the identities matched by the filter
    pub fn identity_query(&self, filter: Option<&dyn DynFilter>) -> RepositoryResult<SelectQuery> {
        let identity = self.resolver.identity_field();
        let mut inner = SelectQuery::new(self.resolver.base_table());
        inner.set_select(vec![identity]);
        if let Some(filter) = filter {
            filter.apply_to(&mut FilterScope::new(&mut inner, self.resolver))?;
        }
        Ok(inner)
    }

    /// Outer query over the base table restricted to the inner identity set
    pub fn build(&self, filter: Option<&dyn DynFilter>) -> RepositoryResult<SelectQuery> {
        let inner = self.identity_query(filter)?;
        Ok(SelectQuery::new(self.resolver.base_table())
            .where_in_subquery(&self.resolver.identity_field(), inner))
    }
}
