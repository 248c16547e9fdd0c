use super::joins::JoinRegistry;
use crate::error::{RepositoryError, RepositoryResult};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;

/// A record type managed by a repository
///
/// Each entity maps to one base table with an integer identity column. Rows
/// are decoded with `sqlx::FromRow` by the backend; columns are written from
/// the entity's `serde` representation.
///
/// ```rust
/// use query_composer::query_builder::Join;
/// use query_composer::repository::{Entity, JoinRegistry};
/// use serde::Serialize;
///
/// #[derive(Debug, Clone, Serialize, sqlx::FromRow)]
/// struct User {
///     id: Option<i64>,
///     name: String,
/// }
///
/// impl Entity for User {
///     const TABLE: &'static str = "users";
///
///     fn id(&self) -> Option<i64> {
///         self.id
///     }
///
///     fn set_id(&mut self, id: i64) {
///         self.id = Some(id);
///     }
///
///     fn register_joins(joins: &mut JoinRegistry) {
///         joins.register(Join::inner("orders", "orders.user_id = users.id"));
///     }
/// }
///
/// assert_eq!(User::identity_field(), "users.id");
/// ```
pub trait Entity: Serialize + Send + Sync + Unpin + Sized + 'static {
    /// Base table name
    const TABLE: &'static str;

    /// Identity column on the base table
    const PRIMARY_KEY: &'static str = "id";

    /// Identity of a persisted entity, `None` before the first store
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Declare the joins qualified field references on this entity may need
    fn register_joins(_joins: &mut JoinRegistry) {}

    /// Column/value pairs to persist, excluding the identity column
    fn to_values(&self) -> RepositoryResult<Vec<(String, Value)>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .filter(|(column, _)| column != Self::PRIMARY_KEY)
                .collect()),
            other => Err(RepositoryError::Serialization(
                <serde_json::Error as serde::ser::Error>::custom(format!(
                    "{} must serialize to an object, got {other}",
                    Self::TABLE
                )),
            )),
        }
    }

    /// `table.primary_key`
    fn identity_field() -> String {
        format!("{}.{}", Self::TABLE, Self::PRIMARY_KEY)
    }
}

/// Type-erased entity accepted by the `*_any` persistence entry points
pub trait AnyEntity: Any + Send + Sync {
    fn entity_type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Entity> AnyEntity for T {
    fn entity_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
