//! # Repository Composition
//!
//! The composition engine: entities declare their base table and joins,
//! filters restrict queries through a join-aware scope, and the composer turns
//! (filter, order, limit, columns, aggregate flag) into executable queries.
//!
//! ## Key Components
//!
//! - [`entity`] - the `Entity` trait and its type-erased form
//! - [`joins`] - per-entity join registry and the resolver that injects joins
//! - [`filter`] - typed and type-erased filters plus `FilterScope`
//! - [`order`] - `OrderSpec` with pinned-value groups and its evaluator
//! - [`aggregate`] - duplicate-safe identity subquery wrapping
//! - [`pagination`] - `PaginationSpec` and the counted `Page` window
//! - [`spec`] - `QuerySpec`, the per-call criteria value
//! - [`composer`] - `QueryComposer`, the stateless engine
//! - [`scoped`] - `Repository`, setter-driven state consumed by each call

pub mod aggregate;
pub mod composer;
pub mod entity;
pub mod filter;
pub mod joins;
pub mod order;
pub mod pagination;
pub mod scoped;
pub mod spec;

pub use aggregate::AggregateSubqueryBuilder;
pub use composer::QueryComposer;
pub use entity::{AnyEntity, Entity};
pub use filter::{DynFilter, Filter, FilterScope};
pub use joins::{JoinDefinition, JoinRegistry, JoinResolver};
pub use order::{OrderEvaluator, OrderSpec, PinnedGroup};
pub use pagination::{Page, PaginationSpec};
pub use scoped::Repository;
pub use spec::QuerySpec;
