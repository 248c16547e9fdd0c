//! Ordering criteria and their evaluation into ORDER BY terms

use super::joins::JoinResolver;
use crate::error::{RepositoryError, RepositoryResult};
use crate::query_builder::{OrderClause, OrderDirection, SelectQuery};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Values of one field that sort ahead of every other row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedGroup {
    pub field: String,
    pub values: Vec<Value>,
}

/// Ordering criteria: explicit (field, direction) pairs plus pinned groups
///
/// Pinned groups are evaluated first, in declaration order, then the explicit
/// pairs. Deserialised specs may carry mismatched `fields`/`directions`
/// lengths; evaluating one fails with [`RepositoryError::MalformedOrder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    directions: Vec<OrderDirection>,
    #[serde(default)]
    pinned: Vec<PinnedGroup>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single sort field
    pub fn by(field: &str, direction: OrderDirection) -> Self {
        Self::new().then_by(field, direction)
    }

    pub fn then_by(mut self, field: &str, direction: OrderDirection) -> Self {
        self.fields.push(field.to_string());
        self.directions.push(direction);
        self
    }

    /// Pin rows whose field holds one of `values`; replaces an earlier group for the same field
    pub fn pin(mut self, field: &str, values: Vec<Value>) -> Self {
        match self.pinned.iter_mut().find(|group| group.field == field) {
            Some(group) => group.values = values,
            None => self.pinned.push(PinnedGroup {
                field: field.to_string(),
                values,
            }),
        }
        self
    }

    /// Build from parallel field and direction lists
    pub fn from_parts(
        fields: Vec<String>,
        directions: Vec<OrderDirection>,
    ) -> RepositoryResult<Self> {
        let spec = Self {
            fields,
            directions,
            pinned: Vec::new(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Build from request-style strings, parsing directions case-insensitively
    pub fn from_strings<S: AsRef<str>>(fields: &[S], directions: &[S]) -> RepositoryResult<Self> {
        let directions = directions
            .iter()
            .map(|d| d.as_ref().parse::<OrderDirection>())
            .collect::<RepositoryResult<Vec<_>>>()?;
        Self::from_parts(
            fields.iter().map(|f| f.as_ref().to_string()).collect(),
            directions,
        )
    }

    pub fn validate(&self) -> RepositoryResult<()> {
        if self.fields.len() != self.directions.len() {
            return Err(RepositoryError::MalformedOrder {
                fields: self.fields.len(),
                directions: self.directions.len(),
            });
        }
        Ok(())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn directions(&self) -> &[OrderDirection] {
        &self.directions
    }

    pub fn pinned(&self) -> &[PinnedGroup] {
        &self.pinned
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, OrderDirection)> {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.directions.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.pinned.is_empty()
    }
}

/// Translates an [`OrderSpec`] into join-aware ORDER BY terms
pub struct OrderEvaluator<'a> {
    resolver: &'a JoinResolver,
}

impl<'a> OrderEvaluator<'a> {
    pub fn new(resolver: &'a JoinResolver) -> Self {
        Self { resolver }
    }

    /// Append the ordering for `spec` to the query
    ///
    /// Without a spec rows come back in identity order. A spec with only
    /// pinned groups gets an identity tie-break so pinned rows keep their
    /// natural order.
    pub fn apply(&self, query: &mut SelectQuery, spec: Option<&OrderSpec>) -> RepositoryResult<()> {
        let Some(spec) = spec else {
            query.add_order(self.identity_order());
            return Ok(());
        };
        spec.validate()?;

        for group in spec.pinned() {
            if group.values.is_empty() {
                continue;
            }
            self.resolver.ensure_for_field(query, &group.field)?;
            query.add_order(OrderClause::Pinned {
                field: group.field.clone(),
                values: group.values.clone(),
            });
        }

        for (field, direction) in spec.pairs() {
            self.resolver.ensure_for_field(query, field)?;
            query.add_order(OrderClause::Column {
                field: field.to_string(),
                direction,
            });
        }

        if spec.fields().is_empty() {
            query.add_order(self.identity_order());
        }
        Ok(())
    }

    fn identity_order(&self) -> OrderClause {
        OrderClause::Column {
            field: self.resolver.identity_field(),
            direction: OrderDirection::Asc,
        }
    }
}
