use query_composer::query_builder::pagination::Pagination;
use query_composer::query_builder::{Dialect, SelectQuery};

#[test]
fn test_offset_only_per_dialect() {
    let query = SelectQuery::new("users").offset(15);
    assert_eq!(
        query.to_statement(Dialect::Sqlite).sql,
        "SELECT users.* FROM users LIMIT -1 OFFSET 15"
    );
    assert_eq!(
        query.to_statement(Dialect::Postgres).sql,
        "SELECT users.* FROM users LIMIT ALL OFFSET 15"
    );
}

#[test]
fn test_paginate_replaces_earlier_limit() {
    let query = SelectQuery::new("users").limit(3).paginate(4, 20);
    assert_eq!(query.pagination(), Some(Pagination::limit_offset(20, 60)));
    assert!(query.build_sql().ends_with(" LIMIT 20 OFFSET 60"));
}

#[test]
fn test_window_metadata_past_the_end() {
    let pagination = Pagination::new(5, 10);
    assert_eq!(pagination.total_pages(31), 4);
    assert_eq!(pagination.current_page(), 5);
    assert!(!pagination.has_next_page(31));
    assert!(pagination.has_previous_page());
}
