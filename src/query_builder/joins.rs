/// Represents different types of SQL JOINs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Cross,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// Represents a SQL JOIN clause
///
/// `table` may carry an alias (`"orders o"` or `"orders AS o"`). Qualified
/// field references address the join by its [`reference_name`](Join::reference_name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on_condition: Option<String>,
}

impl Join {
    fn with_condition(join_type: JoinType, table: &str, on_condition: &str) -> Self {
        Self {
            join_type,
            table: table.to_string(),
            on_condition: Some(on_condition.to_string()),
        }
    }

    /// Create an INNER JOIN
    pub fn inner(table: &str, on_condition: &str) -> Self {
        Self::with_condition(JoinType::Inner, table, on_condition)
    }

    /// Create a LEFT JOIN
    pub fn left(table: &str, on_condition: &str) -> Self {
        Self::with_condition(JoinType::Left, table, on_condition)
    }

    /// Create a CROSS JOIN
    pub fn cross(table: &str) -> Self {
        Self {
            join_type: JoinType::Cross,
            table: table.to_string(),
            on_condition: None,
        }
    }

    /// Name the joined table is referenced by: the alias if present, else the table
    pub fn reference_name(&self) -> &str {
        let mut parts = self.table.split_whitespace();
        let table = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (Some(as_kw), Some(alias)) if as_kw.eq_ignore_ascii_case("as") => alias,
            (Some(alias), _) => alias,
            _ => table,
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        match self.on_condition {
            Some(ref condition) => format!("{} {} ON {condition}", self.join_type.to_sql(), self.table),
            None => format!("{} {}", self.join_type.to_sql(), self.table),
        }
    }
}
