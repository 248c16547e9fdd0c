//! Shared fixtures for repository integration tests
//!
//! A small users/orders/order_items schema on a private in-memory SQLite
//! database, the entities mapped onto it, and the filters the tests use.

#![allow(dead_code)]

use query_composer::backend::SqliteBackend;
use query_composer::error::RepositoryResult;
use query_composer::query_builder::Join;
use query_composer::repository::{Entity, Filter, FilterScope, JoinRegistry, Repository};
use serde::Serialize;
use serde_json::json;

const SCHEMA: &[&str] = &[
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        status TEXT NOT NULL,
        age INTEGER NOT NULL
    )",
    "CREATE TABLE orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        status TEXT NOT NULL,
        total REAL NOT NULL
    )",
    "CREATE TABLE order_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders(id),
        sku TEXT NOT NULL
    )",
];

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub status: String,
    pub age: i64,
}

impl User {
    pub fn new(name: &str, status: &str, age: i64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            status: status.to_string(),
            age,
        }
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn register_joins(joins: &mut JoinRegistry) {
        joins
            .register(Join::inner("orders", "orders.user_id = users.id"))
            .register_through(
                Join::inner("order_items", "order_items.order_id = orders.id"),
                &["orders"],
            );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: Option<i64>,
    pub user_id: i64,
    pub status: String,
    pub total: f64,
}

impl Order {
    pub fn new(user_id: i64, status: &str, total: f64) -> Self {
        Self {
            id: None,
            user_id,
            status: status.to_string(),
            total,
        }
    }
}

impl Entity for Order {
    const TABLE: &'static str = "orders";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn register_joins(joins: &mut JoinRegistry) {
        joins.register(Join::inner("users", "users.id = orders.user_id"));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Option<i64>,
    pub order_id: i64,
    pub sku: String,
}

impl Entity for OrderItem {
    const TABLE: &'static str = "order_items";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// Users with the given status
pub struct StatusIs(pub &'static str);

impl Filter for StatusIs {
    type Entity = User;

    fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
        scope.where_eq("users.status", json!(self.0))?;
        Ok(())
    }
}

/// Users having at least one order with the given status
pub struct HasOrderWithStatus(pub &'static str);

impl Filter for HasOrderWithStatus {
    type Entity = User;

    fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
        scope.where_eq("orders.status", json!(self.0))?;
        Ok(())
    }
}

/// Users who ordered the given SKU
pub struct OrderedSku(pub &'static str);

impl Filter for OrderedSku {
    type Entity = User;

    fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
        scope.where_eq("order_items.sku", json!(self.0))?;
        Ok(())
    }
}

/// References a table users have no join for
pub struct InvoiceNumber(pub &'static str);

impl Filter for InvoiceNumber {
    type Entity = User;

    fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
        scope.where_eq("invoices.number", json!(self.0))?;
        Ok(())
    }
}

/// Orders placed by users with the given status
pub struct PlacedByStatus(pub &'static str);

impl Filter for PlacedByStatus {
    type Entity = Order;

    fn apply(&self, scope: &mut FilterScope<'_>) -> RepositoryResult<()> {
        scope.where_eq("users.status", json!(self.0))?;
        Ok(())
    }
}

/// Fresh in-memory database with the test schema
pub async fn setup_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory()
        .await
        .expect("in-memory SQLite should open");
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(backend.pool())
            .await
            .expect("schema should apply");
    }
    backend
}

/// Insert users in order, returning them with their assigned ids
pub async fn seed_users(backend: &SqliteBackend, users: &[(&str, &str, i64)]) -> Vec<User> {
    let mut repository = Repository::<User, _>::new(backend.clone());
    let mut stored = Vec::with_capacity(users.len());
    for (name, status, age) in users {
        let mut user = User::new(name, status, *age);
        repository.store(&mut user).await.expect("user should insert");
        stored.push(user);
    }
    stored
}

pub async fn seed_order(backend: &SqliteBackend, user_id: i64, status: &str, skus: &[&str]) -> Order {
    let mut orders = Repository::<Order, _>::new(backend.clone());
    let mut order = Order::new(user_id, status, 10.0 * skus.len() as f64);
    orders.store(&mut order).await.expect("order should insert");

    let mut items = Repository::<OrderItem, _>::new(backend.clone());
    for sku in skus {
        let mut item = OrderItem {
            id: None,
            order_id: order.id.expect("stored order has an id"),
            sku: sku.to_string(),
        };
        items.store(&mut item).await.expect("item should insert");
    }
    order
}

/// Four users whose statuses interleave: v2, other, v1, other
pub async fn interleaved_statuses(backend: &SqliteBackend) -> Vec<User> {
    seed_users(
        backend,
        &[
            ("ada", "v2", 36),
            ("brian", "other", 41),
            ("carla", "v1", 29),
            ("dmitri", "other", 52),
        ],
    )
    .await
}

pub fn ids(users: &[User]) -> Vec<i64> {
    users.iter().filter_map(|user| user.id).collect()
}
