use query_composer::query_builder::{Dialect, OrderDirection, SelectQuery, WhereClause};
use serde_json::json;

#[test]
fn test_basic_query_building() {
    let query = SelectQuery::new("orders")
        .select(&["orders.id", "orders.status", "orders.total"])
        .where_eq("orders.user_id", json!(1))
        .order_desc("orders.created_at")
        .limit(10);

    let sql = query.build_sql();
    assert!(sql.contains("SELECT orders.id, orders.status, orders.total"));
    assert!(sql.contains("FROM orders"));
    assert!(sql.contains("ORDER BY orders.created_at DESC"));
    assert!(sql.contains("LIMIT 10"));
}

#[test]
fn test_join_query_building() {
    let query = SelectQuery::new("orders o")
        .inner_join("users u", "u.id = o.user_id")
        .left_join("order_items oi", "oi.order_id = o.id")
        .where_eq("u.status", json!("active"));

    let sql = query.build_sql();
    assert!(sql.contains("INNER JOIN users u"));
    assert!(sql.contains("LEFT JOIN order_items oi"));
    assert!(query.has_join("u"));
    assert!(query.has_join("oi"));
}

#[test]
fn test_sqlite_placeholders() {
    let query = SelectQuery::new("users")
        .where_eq("users.status", json!("active"))
        .where_in("users.id", vec![json!(1), json!(2)])
        .order_by("users.name", OrderDirection::Asc)
        .paginate(3, 25);

    let statement = query.to_statement(Dialect::Sqlite);
    assert_eq!(
        statement.sql,
        "SELECT users.* FROM users WHERE users.status = ? AND users.id IN (?, ?) \
         ORDER BY users.name ASC LIMIT 25 OFFSET 50"
    );
    assert_eq!(statement.params, vec![json!("active"), json!(1), json!(2)]);
}

#[test]
fn test_inline_rendering_escapes_literals() {
    let query = SelectQuery::new("users").where_eq("users.name", json!("O'Brien"));
    assert_eq!(
        query.build_sql(),
        "SELECT users.* FROM users WHERE users.name = 'O''Brien'"
    );
}

#[test]
fn test_exists_subquery() {
    let orders = SelectQuery::new("orders")
        .select(&["1"])
        .where_clause(WhereClause::raw("orders.user_id = users.id"));
    let query = SelectQuery::new("users").where_clause(WhereClause::exists(orders));
    assert_eq!(
        query.build_sql(),
        "SELECT users.* FROM users WHERE EXISTS (SELECT 1 FROM orders WHERE orders.user_id = users.id)"
    );
}

#[test]
fn test_count_query_keeps_joins_and_filters() {
    let query = SelectQuery::new("users")
        .inner_join("orders", "orders.user_id = users.id")
        .where_eq("orders.status", json!("paid"))
        .order_pinned("users.status", vec![json!("vip")])
        .limit(5);

    let statement = query.count_query().to_statement(Dialect::Postgres);
    assert_eq!(
        statement.sql,
        "SELECT COUNT(*) FROM users INNER JOIN orders ON orders.user_id = users.id \
         WHERE orders.status = $1"
    );
    assert_eq!(statement.params, vec![json!("paid")]);
}
