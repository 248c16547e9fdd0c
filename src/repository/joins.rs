//! Join registration and resolution
//!
//! Every entity declares, once, how its base table reaches each related table.
//! The [`JoinResolver`] consults that registry whenever a filter, an order
//! term, a selected column or a forced-join list references a qualified field
//! (`table.column`), and injects the join at most once per query.

use super::entity::Entity;
use crate::error::{RepositoryError, RepositoryResult};
use crate::query_builder::{Join, SelectQuery};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// A registered join plus the joins it must follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinDefinition {
    pub join: Join,
    pub requires: Vec<String>,
}

/// Map from a table (or alias) name to the join that brings it into a query
#[derive(Debug, Clone, Default)]
pub struct JoinRegistry {
    definitions: HashMap<String, JoinDefinition>,
}

static REGISTRIES: OnceLock<RwLock<HashMap<TypeId, Arc<JoinRegistry>>>> = OnceLock::new();

impl JoinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a join keyed by the name field references use for it
    pub fn register(&mut self, join: Join) -> &mut Self {
        self.register_through(join, &[])
    }

    /// Register a join that can only be applied after the joins for `requires`
    pub fn register_through(&mut self, join: Join, requires: &[&str]) -> &mut Self {
        let key = join.reference_name().to_string();
        self.definitions.insert(
            key,
            JoinDefinition {
                join,
                requires: requires.iter().map(|r| r.to_string()).collect(),
            },
        );
        self
    }

    pub fn get(&self, table: &str) -> Option<&JoinDefinition> {
        self.definitions.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.definitions.contains_key(table)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Registry built from `E::register_joins`, cached per entity type
    pub fn for_entity<E: Entity>() -> Arc<JoinRegistry> {
        let registries = REGISTRIES.get_or_init(|| RwLock::new(HashMap::new()));
        let key = TypeId::of::<E>();

        if let Some(registry) = registries.read().get(&key) {
            return Arc::clone(registry);
        }

        let mut registry = JoinRegistry::new();
        E::register_joins(&mut registry);
        debug!(
            entity = E::TABLE,
            joins = registry.len(),
            "Registered entity joins"
        );

        Arc::clone(
            registries
                .write()
                .entry(key)
                .or_insert_with(|| Arc::new(registry)),
        )
    }
}

/// Injects registered joins for qualified field references
#[derive(Debug, Clone)]
pub struct JoinResolver {
    base_table: &'static str,
    primary_key: &'static str,
    registry: Arc<JoinRegistry>,
    strict: bool,
}

impl JoinResolver {
    pub fn new(
        base_table: &'static str,
        primary_key: &'static str,
        registry: Arc<JoinRegistry>,
        strict: bool,
    ) -> Self {
        Self {
            base_table,
            primary_key,
            registry,
            strict,
        }
    }

    pub fn for_entity<E: Entity>(strict: bool) -> Self {
        Self::new(E::TABLE, E::PRIMARY_KEY, JoinRegistry::for_entity::<E>(), strict)
    }

    pub fn base_table(&self) -> &'static str {
        self.base_table
    }

    /// Qualified identity column of the base table
    pub fn identity_field(&self) -> String {
        format!("{}.{}", self.base_table, self.primary_key)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn registry(&self) -> &JoinRegistry {
        &self.registry
    }

    /// Table token of a qualified field reference
    ///
    /// Returns `None` for unqualified fields and for expressions whose prefix
    /// is not a plain identifier (`COUNT(orders.id)`), neither of which can
    /// name a join.
    pub fn table_of(field: &str) -> Option<&str> {
        let (table, _) = field.trim().split_once('.')?;
        let is_identifier = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        is_identifier.then_some(table)
    }

    /// Ensure the table a field belongs to is joined
    pub fn ensure_for_field(&self, query: &mut SelectQuery, field: &str) -> RepositoryResult<()> {
        match Self::table_of(field) {
            Some(table) => self.ensure_table(query, table),
            None => Ok(()),
        }
    }

    /// Ensure a table is joined, applying the joins it depends on first
    pub fn ensure_table(&self, query: &mut SelectQuery, table: &str) -> RepositoryResult<()> {
        let mut visiting = Vec::new();
        self.ensure_table_inner(query, table, &mut visiting)
    }

    fn ensure_table_inner(
        &self,
        query: &mut SelectQuery,
        table: &str,
        visiting: &mut Vec<String>,
    ) -> RepositoryResult<()> {
        if table == self.base_table || query.has_join(table) {
            return Ok(());
        }
        if visiting.iter().any(|t| t == table) {
            let mut path = visiting.clone();
            path.push(table.to_string());
            return Err(RepositoryError::JoinCycle {
                base_table: self.base_table,
                path,
            });
        }

        let Some(definition) = self.registry.get(table) else {
            if self.strict {
                return Err(RepositoryError::UnregisteredJoin {
                    base_table: self.base_table,
                    table: table.to_string(),
                });
            }
            warn!(
                base_table = self.base_table,
                table = table,
                "No join registered for referenced table; skipping"
            );
            return Ok(());
        };

        visiting.push(table.to_string());
        for required in &definition.requires {
            self.ensure_table_inner(query, required, visiting)?;
        }
        visiting.pop();

        debug!(base_table = self.base_table, table = table, "Injecting join");
        query.add_join(definition.join.clone());
        Ok(())
    }
}
