use super::builder::SelectQuery;
use super::writer::SqlWriter;
use serde_json::Value;

/// Represents different types of SQL conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Simple {
        field: String,
        operator: String,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    NotIn {
        field: String,
        values: Vec<Value>,
    },
    InSubquery {
        field: String,
        subquery: Box<SelectQuery>,
    },
    Between {
        field: String,
        start: Value,
        end: Value,
    },
    IsNull {
        field: String,
    },
    IsNotNull {
        field: String,
    },
    Exists {
        subquery: Box<SelectQuery>,
    },
    NotExists {
        subquery: Box<SelectQuery>,
    },
    Group(WhereClause),
    Raw {
        sql: String,
    },
}

impl Condition {
    pub(crate) fn write(&self, w: &mut SqlWriter) {
        match self {
            Condition::Simple {
                field,
                operator,
                value,
            } => {
                w.push(&format!("{field} {operator} "));
                w.push_value(value);
            }
            // An empty IN list is invalid SQL; it matches nothing
            Condition::In { values, .. } if values.is_empty() => w.push("1 = 0"),
            Condition::In { field, values } => {
                w.push(&format!("{field} IN ("));
                w.push_values(values);
                w.push(")");
            }
            Condition::NotIn { values, .. } if values.is_empty() => w.push("1 = 1"),
            Condition::NotIn { field, values } => {
                w.push(&format!("{field} NOT IN ("));
                w.push_values(values);
                w.push(")");
            }
            Condition::InSubquery { field, subquery } => {
                w.push(&format!("{field} IN ("));
                subquery.write(w);
                w.push(")");
            }
            Condition::Between { field, start, end } => {
                w.push(&format!("{field} BETWEEN "));
                w.push_value(start);
                w.push(" AND ");
                w.push_value(end);
            }
            Condition::IsNull { field } => w.push(&format!("{field} IS NULL")),
            Condition::IsNotNull { field } => w.push(&format!("{field} IS NOT NULL")),
            Condition::Exists { subquery } => {
                w.push("EXISTS (");
                subquery.write(w);
                w.push(")");
            }
            Condition::NotExists { subquery } => {
                w.push("NOT EXISTS (");
                subquery.write(w);
                w.push(")");
            }
            Condition::Group(clause) => clause.write(w),
            Condition::Raw { sql } => w.push(sql),
        }
    }

    /// Convert condition to SQL string with inlined values
    pub fn to_sql(&self) -> String {
        let mut w = SqlWriter::inline();
        self.write(&mut w);
        w.into_sql()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    fn to_sql(self) -> &'static str {
        match self {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        }
    }
}

/// Represents a WHERE clause that can contain multiple conditions
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

impl WhereClause {
    fn single(condition: Condition) -> Self {
        Self {
            conditions: vec![condition],
            operator: LogicalOperator::And,
        }
    }

    /// Create a simple WHERE clause with a single condition
    pub fn simple(field: &str, operator: &str, value: Value) -> Self {
        Self::single(Condition::Simple {
            field: field.to_string(),
            operator: operator.to_string(),
            value,
        })
    }

    /// Create WHERE IN clause
    pub fn in_condition(field: &str, values: Vec<Value>) -> Self {
        Self::single(Condition::In {
            field: field.to_string(),
            values,
        })
    }

    /// Create WHERE NOT IN clause
    pub fn not_in_condition(field: &str, values: Vec<Value>) -> Self {
        Self::single(Condition::NotIn {
            field: field.to_string(),
            values,
        })
    }

    /// Create WHERE field IN (subquery) clause
    pub fn in_subquery(field: &str, subquery: SelectQuery) -> Self {
        Self::single(Condition::InSubquery {
            field: field.to_string(),
            subquery: Box::new(subquery),
        })
    }

    /// Create WHERE BETWEEN clause
    pub fn between(field: &str, start: Value, end: Value) -> Self {
        Self::single(Condition::Between {
            field: field.to_string(),
            start,
            end,
        })
    }

    /// Create WHERE IS NULL clause
    pub fn is_null(field: &str) -> Self {
        Self::single(Condition::IsNull {
            field: field.to_string(),
        })
    }

    /// Create WHERE IS NOT NULL clause
    pub fn is_not_null(field: &str) -> Self {
        Self::single(Condition::IsNotNull {
            field: field.to_string(),
        })
    }

    /// Create WHERE EXISTS clause
    pub fn exists(subquery: SelectQuery) -> Self {
        Self::single(Condition::Exists {
            subquery: Box::new(subquery),
        })
    }

    /// Create WHERE NOT EXISTS clause
    pub fn not_exists(subquery: SelectQuery) -> Self {
        Self::single(Condition::NotExists {
            subquery: Box::new(subquery),
        })
    }

    /// Create raw SQL WHERE clause
    pub fn raw(sql: &str) -> Self {
        Self::single(Condition::Raw {
            sql: sql.to_string(),
        })
    }

    /// Create an OR group from several conditions
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    /// Wrap the current conditions in a parenthesised group if mixing operators
    fn regroup(&mut self, next: LogicalOperator) {
        if self.operator != next && self.conditions.len() > 1 {
            let grouped = std::mem::take(&mut self.conditions);
            self.conditions = vec![Condition::Group(WhereClause {
                conditions: grouped,
                operator: self.operator,
            })];
        }
        self.operator = next;
    }

    /// Add another condition with AND
    pub fn and(mut self, condition: Condition) -> Self {
        self.regroup(LogicalOperator::And);
        self.conditions.push(condition);
        self
    }

    /// Add another condition with OR
    pub fn or(mut self, condition: Condition) -> Self {
        self.regroup(LogicalOperator::Or);
        self.conditions.push(condition);
        self
    }

    pub(crate) fn write(&self, w: &mut SqlWriter) {
        let grouped = self.conditions.len() > 1;
        if grouped {
            w.push("(");
        }
        for (index, condition) in self.conditions.iter().enumerate() {
            if index > 0 {
                w.push(self.operator.to_sql());
            }
            condition.write(w);
        }
        if grouped {
            w.push(")");
        }
    }

    /// Convert to SQL string with inlined values
    pub fn to_sql(&self) -> String {
        let mut w = SqlWriter::inline();
        self.write(&mut w);
        w.into_sql()
    }
}
