#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Query Composer
//!
//! Filter/order/pagination composition for relational repositories.
//!
//! ## Overview
//!
//! A repository turns a triple of filter criteria, ordering criteria and
//! pagination criteria into executable SQL. Criteria that reference related
//! tables (`orders.status`) get their joins injected from a per-entity
//! registry, pinned values can be sorted ahead of everything else, and count
//! or paging operations can be rewrapped as an identity subquery so that
//! one-to-many joins never inflate results.
//!
//! ## Module Organization
//!
//! - [`repository`] - entities, filters, ordering, pagination and the composer
//! - [`query_builder`] - backend-neutral SQL statements
//! - [`backend`] - the backend trait with PostgreSQL and SQLite drivers
//! - [`config`] - layered configuration
//! - [`logging`] - structured `tracing` setup
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use query_composer::backend::SqliteBackend;
//! use query_composer::config::ConfigLoader;
//! use query_composer::query_builder::Join;
//! use query_composer::repository::{Entity, Filter, FilterScope, JoinRegistry, Repository};
//! use query_composer::error::RepositoryResult;
//! use serde_json::json;
//!
//! #[derive(Debug, serde::Serialize, sqlx::FromRow)]
//! struct User {
//!     id: Option<i64>,
//!     name: String,
//! }
//!
//! impl Entity for User {
//!     const TABLE: &'static str = "users";
//!
//!     fn id(&self) -> Option<i64> {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: i64) {
//!         self.id = Some(id);
//!     }
//!
//!     fn register_joins(joins: &mut JoinRegistry) {
//!         joins.register(Join::inner("orders", "orders.user_id = users.id"));
//!     }
//! }
//!
//! struct HasPaidOrders;
//!
//! impl Filter for HasPaidOrders {
//!     type Entity = User;
//!
//!     fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
//!         scope.where_eq("orders.status", json!("paid"))?;
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! let backend = SqliteBackend::connect(&config.database).await?;
//! let mut users = Repository::<User, _>::with_config(backend, &config.query);
//!
//! // one row per user even when a user has several paid orders
//! let customers = users
//!     .set_filter(HasPaidOrders)
//!     .set_is_aggregate_query(true)
//!     .count()
//!     .await?;
//! println!("{customers} paying customers");
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod query_builder;
pub mod repository;

pub use config::{ComposerConfig, ConfigLoader};
pub use error::{RepositoryError, RepositoryResult};
pub use logging::init_structured_logging;
pub use repository::{Entity, Filter, OrderSpec, PaginationSpec, QueryComposer, QuerySpec, Repository};
