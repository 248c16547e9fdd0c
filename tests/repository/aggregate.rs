use crate::common::*;
use query_composer::backend::SqliteBackend;
use query_composer::repository::{PaginationSpec, Repository};

/// ada: three paid orders, brian: one paid order, carla: one pending order
async fn fan_out(backend: &SqliteBackend) -> Vec<User> {
    let users = seed_users(
        backend,
        &[("ada", "active", 36), ("brian", "active", 41), ("carla", "active", 29)],
    )
    .await;
    let (ada, brian, carla) = (
        users[0].id.unwrap(),
        users[1].id.unwrap(),
        users[2].id.unwrap(),
    );
    seed_order(backend, ada, "paid", &["A"]).await;
    seed_order(backend, ada, "paid", &["A", "B"]).await;
    seed_order(backend, ada, "paid", &[]).await;
    seed_order(backend, brian, "paid", &["B"]).await;
    seed_order(backend, carla, "pending", &["A"]).await;
    users
}

#[tokio::test]
async fn test_aggregate_count_is_distinct() {
    let backend = setup_backend().await;
    fan_out(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let multiplied = repository
        .set_filter(HasOrderWithStatus("paid"))
        .count()
        .await
        .unwrap();
    assert_eq!(multiplied, 4);

    let distinct = repository
        .set_filter(HasOrderWithStatus("paid"))
        .set_is_aggregate_query(true)
        .count()
        .await
        .unwrap();
    assert_eq!(distinct, 2);
}

#[tokio::test]
async fn test_aggregate_count_ignores_forced_joins() {
    let backend = setup_backend().await;
    fan_out(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let forced = repository
        .set_additional_tables(["orders"])
        .count()
        .await
        .unwrap();
    assert_eq!(forced, 5);

    let distinct = repository
        .set_filter(HasOrderWithStatus("paid"))
        .set_is_aggregate_query(true)
        .set_additional_tables(["orders"])
        .count()
        .await
        .unwrap();
    assert_eq!(distinct, 2);

    let exists = repository
        .set_filter(HasOrderWithStatus("pending"))
        .set_is_aggregate_query(true)
        .set_additional_tables(["orders"])
        .exists()
        .await
        .unwrap();
    assert!(exists);
}

#[tokio::test]
async fn test_aggregate_collection_has_no_duplicates() {
    let backend = setup_backend().await;
    let users = fan_out(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let plain = repository
        .set_filter(HasOrderWithStatus("paid"))
        .collection()
        .await
        .unwrap();
    assert_eq!(plain.len(), 4);

    let wrapped = repository
        .set_filter(HasOrderWithStatus("paid"))
        .set_is_aggregate_query(true)
        .collection()
        .await
        .unwrap();
    assert_eq!(ids(&wrapped), ids(&users[..2]));
}

#[tokio::test]
async fn test_aggregate_list_ids() {
    let backend = setup_backend().await;
    let users = fan_out(&backend).await;
    let (ada, brian) = (users[0].id.unwrap(), users[1].id.unwrap());
    let mut repository = Repository::<User, _>::new(backend);

    let plain = repository
        .set_filter(HasOrderWithStatus("paid"))
        .list_ids()
        .await
        .unwrap();
    assert_eq!(plain, vec![ada, ada, ada, brian]);

    let wrapped = repository
        .set_filter(HasOrderWithStatus("paid"))
        .set_is_aggregate_query(true)
        .list_ids()
        .await
        .unwrap();
    assert_eq!(wrapped, vec![ada, brian]);
}

#[tokio::test]
async fn test_join_chain_through_dependency() {
    let backend = setup_backend().await;
    let users = fan_out(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    // ada ordered A twice, carla once
    let plain = repository
        .set_filter(OrderedSku("A"))
        .count()
        .await
        .unwrap();
    assert_eq!(plain, 3);

    let wrapped = repository
        .set_filter(OrderedSku("A"))
        .set_is_aggregate_query(true)
        .collection()
        .await
        .unwrap();
    assert_eq!(ids(&wrapped), vec![users[0].id.unwrap(), users[2].id.unwrap()]);
}

#[tokio::test]
async fn test_aggregate_page_total() {
    let backend = setup_backend().await;
    let users = fan_out(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let page = repository
        .set_filter(HasOrderWithStatus("paid"))
        .set_is_aggregate_query(true)
        .page(&PaginationSpec::new(1, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.last_page, 2);
    assert_eq!(ids(&page.items), vec![users[0].id.unwrap()]);
}

#[tokio::test]
async fn test_aggregate_exists() {
    let backend = setup_backend().await;
    fan_out(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    assert!(repository
        .set_filter(HasOrderWithStatus("pending"))
        .set_is_aggregate_query(true)
        .exists()
        .await
        .unwrap());
    assert!(!repository
        .set_filter(HasOrderWithStatus("refunded"))
        .set_is_aggregate_query(true)
        .exists()
        .await
        .unwrap());
}

#[tokio::test]
async fn test_wrapped_query_shape() {
    let backend = setup_backend().await;
    let mut repository = Repository::<User, _>::new(backend);

    let query = repository
        .set_filter(HasOrderWithStatus("paid"))
        .set_is_aggregate_query(true)
        .prepared_query()
        .unwrap();
    assert!(query.joins().is_empty());
    assert_eq!(
        query.build_sql(),
        "SELECT users.* FROM users WHERE users.id IN (SELECT users.id FROM users \
         INNER JOIN orders ON orders.user_id = users.id WHERE orders.status = 'paid') \
         ORDER BY users.id ASC"
    );
}
