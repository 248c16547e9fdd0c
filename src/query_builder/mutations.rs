use super::conditions::WhereClause;
use super::writer::{Dialect, SqlStatement, SqlWriter};
use serde_json::Value;

/// `INSERT INTO table (columns) VALUES (...) RETURNING key`
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub values: Vec<(String, Value)>,
    pub returning: String,
}

impl InsertStatement {
    pub fn new(table: &str, returning: &str) -> Self {
        Self {
            table: table.to_string(),
            values: Vec::new(),
            returning: returning.to_string(),
        }
    }

    pub fn value(mut self, column: &str, value: Value) -> Self {
        self.values.push((column.to_string(), value));
        self
    }

    fn write(&self, w: &mut SqlWriter) {
        if self.values.is_empty() {
            w.push(&format!(
                "INSERT INTO {} DEFAULT VALUES RETURNING {}",
                self.table, self.returning
            ));
            return;
        }
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.as_str()).collect();
        w.push(&format!(
            "INSERT INTO {} ({}) VALUES (",
            self.table,
            columns.join(", ")
        ));
        for (index, (_, value)) in self.values.iter().enumerate() {
            if index > 0 {
                w.push(", ");
            }
            w.push_value(value);
        }
        w.push(&format!(") RETURNING {}", self.returning));
    }

    pub fn build_sql(&self) -> String {
        let mut w = SqlWriter::inline();
        self.write(&mut w);
        w.into_sql()
    }

    pub fn to_statement(&self, dialect: Dialect) -> SqlStatement {
        let mut w = SqlWriter::bound(dialect);
        self.write(&mut w);
        w.finish()
    }
}

/// `UPDATE table SET column = value, ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub where_clauses: Vec<WhereClause>,
}

impl UpdateStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            assignments: Vec::new(),
            where_clauses: Vec::new(),
        }
    }

    pub fn set(mut self, column: &str, value: Value) -> Self {
        self.assignments.push((column.to_string(), value));
        self
    }

    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    fn write(&self, w: &mut SqlWriter) {
        w.push(&format!("UPDATE {} SET ", self.table));
        for (index, (column, value)) in self.assignments.iter().enumerate() {
            if index > 0 {
                w.push(", ");
            }
            w.push(&format!("{column} = "));
            w.push_value(value);
        }
        write_where(w, &self.where_clauses);
    }

    pub fn build_sql(&self) -> String {
        let mut w = SqlWriter::inline();
        self.write(&mut w);
        w.into_sql()
    }

    pub fn to_statement(&self, dialect: Dialect) -> SqlStatement {
        let mut w = SqlWriter::bound(dialect);
        self.write(&mut w);
        w.finish()
    }
}

/// `DELETE FROM table WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub where_clauses: Vec<WhereClause>,
}

impl DeleteStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_clauses: Vec::new(),
        }
    }

    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    fn write(&self, w: &mut SqlWriter) {
        w.push(&format!("DELETE FROM {}", self.table));
        write_where(w, &self.where_clauses);
    }

    pub fn build_sql(&self) -> String {
        let mut w = SqlWriter::inline();
        self.write(&mut w);
        w.into_sql()
    }

    pub fn to_statement(&self, dialect: Dialect) -> SqlStatement {
        let mut w = SqlWriter::bound(dialect);
        self.write(&mut w);
        w.finish()
    }
}

fn write_where(w: &mut SqlWriter, clauses: &[WhereClause]) {
    for (index, clause) in clauses.iter().enumerate() {
        w.push(if index == 0 { " WHERE " } else { " AND " });
        clause.write(w);
    }
}
