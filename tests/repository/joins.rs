use crate::common::*;
use query_composer::config::QueryConfig;
use query_composer::error::RepositoryError;
use query_composer::query_builder::OrderDirection;
use query_composer::repository::{OrderSpec, Repository};

#[tokio::test]
async fn test_unregistered_join_is_an_error_by_default() {
    let backend = setup_backend().await;
    let mut repository = Repository::<User, _>::new(backend);

    let error = repository
        .set_order(Some(OrderSpec::by("invoices.number", OrderDirection::Asc)))
        .prepared_query()
        .unwrap_err();
    assert!(matches!(
        error,
        RepositoryError::UnregisteredJoin { base_table: "users", ref table } if table == "invoices"
    ));
}

#[tokio::test]
async fn test_lenient_joins_skip_unregistered_tables() {
    let backend = setup_backend().await;
    let config = QueryConfig {
        strict_joins: false,
        ..QueryConfig::default()
    };
    let mut repository = Repository::<User, _>::with_config(backend, &config);

    let query = repository
        .set_order(Some(OrderSpec::by("invoices.number", OrderDirection::Asc)))
        .prepared_query()
        .unwrap();
    assert!(query.joins().is_empty());
    assert_eq!(
        query.build_sql(),
        "SELECT users.* FROM users ORDER BY invoices.number ASC"
    );
}

#[tokio::test]
async fn test_each_table_is_joined_once() {
    let backend = setup_backend().await;
    let mut repository = Repository::<User, _>::new(backend);

    let query = repository
        .set_filter(HasOrderWithStatus("paid"))
        .set_order(Some(OrderSpec::by("orders.total", OrderDirection::Desc)))
        .set_columns(["users.id", "orders.status"])
        .set_additional_tables(["orders"])
        .prepared_query()
        .unwrap();
    assert_eq!(query.joins().len(), 1);
    assert_eq!(query.build_sql().matches("JOIN orders").count(), 1);
}

#[tokio::test]
async fn test_dependent_joins_apply_in_order() {
    let backend = setup_backend().await;
    let mut repository = Repository::<User, _>::new(backend);

    let query = repository
        .set_filter(OrderedSku("A"))
        .prepared_query()
        .unwrap();
    let tables: Vec<&str> = query.joins().iter().map(|join| join.reference_name()).collect();
    assert_eq!(tables, vec!["orders", "order_items"]);
}

#[tokio::test]
async fn test_reverse_join_from_orders() {
    let backend = setup_backend().await;
    let users = interleaved_statuses(&backend).await;
    seed_order(&backend, users[0].id.unwrap(), "paid", &[]).await;
    let brian_order = seed_order(&backend, users[1].id.unwrap(), "paid", &[]).await;
    let mut orders = Repository::<Order, _>::new(backend);

    let rows = orders
        .set_filter(PlacedByStatus("other"))
        .collection()
        .await
        .unwrap();
    assert_eq!(rows, vec![brian_order]);
}

#[tokio::test]
async fn test_filter_on_unregistered_table_fails_and_resets_state() {
    let backend = setup_backend().await;
    interleaved_statuses(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let error = repository
        .set_filter(InvoiceNumber("INV-1"))
        .count()
        .await
        .unwrap_err();
    assert!(matches!(error, RepositoryError::UnregisteredJoin { .. }));
    assert_eq!(repository.count().await.unwrap(), 4);
}
