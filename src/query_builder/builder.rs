use super::conditions::WhereClause;
use super::joins::Join;
use super::order::{OrderClause, OrderDirection};
use super::pagination::Pagination;
use super::writer::{Dialect, SqlStatement, SqlWriter};
use serde_json::Value;

/// Backend-neutral SELECT statement
///
/// Built either by chaining (`SelectQuery::new("users").where_eq(..).limit(10)`)
/// or mutated in place through the `add_*`/`set_*` methods, which is what the
/// composer and join resolver do. Rendering happens once, at execution time,
/// through [`to_statement`](SelectQuery::to_statement).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    base_table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<WhereClause>,
    order_by: Vec<OrderClause>,
    pagination: Option<Pagination>,
}

impl SelectQuery {
    /// Create a query selecting every column of the given table
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec![format!("{table}.*")],
            joins: Vec::new(),
            where_clauses: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    pub fn base_table(&self) -> &str {
        &self.base_table
    }

    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        &self.where_clauses
    }

    pub fn order_clauses(&self) -> &[OrderClause] {
        &self.order_by
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    /// Whether a join is already present for the given table or alias
    pub fn has_join(&self, reference: &str) -> bool {
        self.joins.iter().any(|join| join.reference_name() == reference)
    }

    pub fn set_select(&mut self, fields: Vec<String>) {
        self.select_fields = fields;
    }

    pub fn add_join(&mut self, join: Join) {
        self.joins.push(join);
    }

    pub fn add_where(&mut self, clause: WhereClause) {
        self.where_clauses.push(clause);
    }

    pub fn add_order(&mut self, clause: OrderClause) {
        self.order_by.push(clause);
    }

    pub fn clear_order(&mut self) {
        self.order_by.clear();
    }

    pub fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.set_select(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.add_join(join);
        self
    }

    /// Add an INNER JOIN
    pub fn inner_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::inner(table, on_condition))
    }

    /// Add a LEFT JOIN
    pub fn left_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::left(table, on_condition))
    }

    /// Add a WHERE clause
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.add_where(clause);
        self
    }

    /// Add a simple WHERE condition
    pub fn where_eq(self, field: &str, value: Value) -> Self {
        self.where_clause(WhereClause::simple(field, "=", value))
    }

    /// Add WHERE IN condition
    pub fn where_in(self, field: &str, values: Vec<Value>) -> Self {
        self.where_clause(WhereClause::in_condition(field, values))
    }

    /// Add WHERE field IN (subquery) condition
    pub fn where_in_subquery(self, field: &str, subquery: SelectQuery) -> Self {
        self.where_clause(WhereClause::in_subquery(field, subquery))
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, field: &str, direction: OrderDirection) -> Self {
        self.add_order(OrderClause::Column {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Add ORDER BY ASC
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, OrderDirection::Asc)
    }

    /// Add ORDER BY DESC
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, OrderDirection::Desc)
    }

    /// Sort rows whose field holds one of `values` first
    pub fn order_pinned(mut self, field: &str, values: Vec<Value>) -> Self {
        self.add_order(OrderClause::Pinned {
            field: field.to_string(),
            values,
        });
        self
    }

    /// Add pagination (LIMIT/OFFSET)
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        let mut pagination = self.pagination.unwrap_or_default();
        pagination.limit = Some(limit);
        self.pagination = Some(pagination);
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, offset: u64) -> Self {
        let mut pagination = self.pagination.unwrap_or_default();
        pagination.offset = Some(offset);
        self.pagination = Some(pagination);
        self
    }

    /// Query counting the rows this query would return, ignoring order and window
    pub fn count_query(&self) -> SelectQuery {
        let mut count = self.clone();
        count.select_fields = vec!["COUNT(*)".to_string()];
        count.order_by.clear();
        count.pagination = None;
        count
    }

    /// Query returning at most one constant row if this query matches anything
    pub fn exists_query(&self) -> SelectQuery {
        let mut probe = self.clone();
        probe.select_fields = vec!["1".to_string()];
        probe.order_by.clear();
        probe.pagination = Some(Pagination::limit_only(1));
        probe
    }

    pub(crate) fn write(&self, w: &mut SqlWriter) {
        w.push("SELECT ");
        w.push(&self.select_fields.join(", "));
        w.push(&format!(" FROM {}", self.base_table));

        for join in &self.joins {
            w.push(" ");
            w.push(&join.to_sql());
        }

        if !self.where_clauses.is_empty() {
            w.push(" WHERE ");
            for (index, clause) in self.where_clauses.iter().enumerate() {
                if index > 0 {
                    w.push(" AND ");
                }
                clause.write(w);
            }
        }

        if !self.order_by.is_empty() {
            w.push(" ORDER BY ");
            for (index, clause) in self.order_by.iter().enumerate() {
                if index > 0 {
                    w.push(", ");
                }
                clause.write(w);
            }
        }

        if let Some(ref pagination) = self.pagination {
            pagination.write(w);
        }
    }

    /// Build the complete SQL query string with values inlined
    ///
    /// Intended for logging and inspection; execution goes through
    /// [`to_statement`](SelectQuery::to_statement).
    pub fn build_sql(&self) -> String {
        let mut w = SqlWriter::inline();
        self.write(&mut w);
        w.into_sql()
    }

    /// Render with bound parameters for the given dialect
    pub fn to_statement(&self, dialect: Dialect) -> SqlStatement {
        let mut w = SqlWriter::bound(dialect);
        self.write(&mut w);
        w.finish()
    }
}
