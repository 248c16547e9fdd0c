use crate::common::*;
use query_composer::error::RepositoryError;
use query_composer::query_builder::OrderDirection;
use query_composer::repository::{OrderSpec, Repository};
use serde_json::json;

#[tokio::test]
async fn test_pinned_rows_first_in_natural_order() {
    let backend = setup_backend().await;
    let users = interleaved_statuses(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let order = OrderSpec::new().pin("users.status", vec![json!("v2"), json!("v1")]);
    let rows = repository.set_order(Some(order)).collection().await.unwrap();

    assert_eq!(
        ids(&rows),
        vec![
            users[0].id.unwrap(),
            users[2].id.unwrap(),
            users[1].id.unwrap(),
            users[3].id.unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_pinned_group_then_explicit_fields() {
    let backend = setup_backend().await;
    let users = interleaved_statuses(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let order = OrderSpec::by("users.age", OrderDirection::Desc)
        .pin("users.status", vec![json!("other")]);
    let rows = repository.set_order(Some(order)).collection().await.unwrap();

    // dmitri (52) and brian (41) are pinned; ada (36) and carla (29) follow
    assert_eq!(
        ids(&rows),
        vec![
            users[3].id.unwrap(),
            users[1].id.unwrap(),
            users[0].id.unwrap(),
            users[2].id.unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_explicit_direction() {
    let backend = setup_backend().await;
    interleaved_statuses(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let names = repository
        .set_order(Some(OrderSpec::by("users.name", OrderDirection::Desc)))
        .pluck("users.name")
        .await
        .unwrap();
    assert_eq!(
        names,
        vec![json!("dmitri"), json!("carla"), json!("brian"), json!("ada")]
    );
}

#[tokio::test]
async fn test_ordering_by_joined_field() {
    let backend = setup_backend().await;
    let users = interleaved_statuses(&backend).await;
    let first = seed_order(&backend, users[0].id.unwrap(), "paid", &[]).await;
    let second = seed_order(&backend, users[1].id.unwrap(), "paid", &[]).await;
    let third = seed_order(&backend, users[0].id.unwrap(), "pending", &[]).await;

    let mut orders = Repository::<Order, _>::new(backend);
    let order = OrderSpec::by("users.name", OrderDirection::Desc).then_by("orders.id", OrderDirection::Asc);
    let rows = orders.set_order(Some(order)).collection().await.unwrap();

    let order_ids: Vec<i64> = rows.iter().filter_map(|order| order.id).collect();
    assert_eq!(
        order_ids,
        vec![second.id.unwrap(), first.id.unwrap(), third.id.unwrap()]
    );
}

#[tokio::test]
async fn test_order_from_request_strings() {
    let backend = setup_backend().await;
    let users = interleaved_statuses(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let order = OrderSpec::from_strings(&["users.status", "users.name"], &["ASC", "desc"]).unwrap();
    let rows = repository.set_order(Some(order)).collection().await.unwrap();

    // other: dmitri, brian; v1: carla; v2: ada
    assert_eq!(
        ids(&rows),
        vec![
            users[3].id.unwrap(),
            users[1].id.unwrap(),
            users[2].id.unwrap(),
            users[0].id.unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_malformed_order_fails_and_clears() {
    let backend = setup_backend().await;
    let users = interleaved_statuses(&backend).await;
    let mut repository = Repository::<User, _>::new(backend);

    let order: OrderSpec = serde_json::from_value(json!({
        "fields": ["users.name", "users.age"],
        "directions": ["desc"]
    }))
    .unwrap();
    let error = repository
        .set_order(Some(order))
        .collection()
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RepositoryError::MalformedOrder {
            fields: 2,
            directions: 1
        }
    ));

    let rows = repository.collection().await.unwrap();
    assert_eq!(ids(&rows), ids(&users));
}
