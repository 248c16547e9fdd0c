use serde_json::Value;

/// SQL dialect a statement is rendered for
///
/// Only the placeholder style differs between the supported backends; every
/// other construct the composer emits is portable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Numbered placeholders (`$1`, `$2`, ...)
    Postgres,
    /// Positional placeholders (`?`)
    Sqlite,
}

/// A rendered statement with its bound parameters, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Copy)]
enum Placeholders {
    Inline,
    Bound(Dialect),
}

/// Accumulates SQL text and parameters
///
/// In inline mode values are written as SQL literals, which is what
/// `build_sql()` uses for logging and inspection. In bound mode values become
/// placeholders and are collected for binding.
#[derive(Debug)]
pub(crate) struct SqlWriter {
    sql: String,
    params: Vec<Value>,
    placeholders: Placeholders,
}

impl SqlWriter {
    pub(crate) fn inline() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            placeholders: Placeholders::Inline,
        }
    }

    pub(crate) fn bound(dialect: Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            placeholders: Placeholders::Bound(dialect),
        }
    }

    pub(crate) fn dialect(&self) -> Option<Dialect> {
        match self.placeholders {
            Placeholders::Inline => None,
            Placeholders::Bound(dialect) => Some(dialect),
        }
    }

    pub(crate) fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub(crate) fn push_value(&mut self, value: &Value) {
        match self.placeholders {
            Placeholders::Inline => self.sql.push_str(&format_value(value)),
            Placeholders::Bound(dialect) => {
                self.params.push(value.clone());
                match dialect {
                    Dialect::Postgres => {
                        self.sql.push('$');
                        self.sql.push_str(&self.params.len().to_string());
                    }
                    Dialect::Sqlite => self.sql.push('?'),
                }
            }
        }
    }

    /// Write a comma separated list of values
    pub(crate) fn push_values(&mut self, values: &[Value]) {
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.push_value(value);
        }
    }

    pub(crate) fn into_sql(self) -> String {
        self.sql
    }

    pub(crate) fn finish(self) -> SqlStatement {
        SqlStatement {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Format a JSON value as an SQL literal
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Array(_) | Value::Object(_) => format!("'{}'", value.to_string().replace('\'', "''")),
    }
}
