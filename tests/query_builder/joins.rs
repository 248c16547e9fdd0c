use query_composer::query_builder::joins::Join;

#[test]
fn test_inner_join() {
    let join = Join::inner("users u", "u.id = posts.user_id");
    assert_eq!(join.to_sql(), "INNER JOIN users u ON u.id = posts.user_id");
    assert_eq!(join.reference_name(), "u");
}

#[test]
fn test_left_join() {
    let join = Join::left("profiles p", "p.user_id = u.id");
    assert_eq!(join.to_sql(), "LEFT JOIN profiles p ON p.user_id = u.id");
}

#[test]
fn test_cross_join() {
    let join = Join::cross("categories");
    assert_eq!(join.to_sql(), "CROSS JOIN categories");
    assert_eq!(join.reference_name(), "categories");
}

#[test]
fn test_as_alias_reference() {
    let join = Join::inner("order_items AS oi", "oi.order_id = orders.id");
    assert_eq!(join.reference_name(), "oi");
}
