use super::writer::SqlWriter;
use crate::error::RepositoryError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Sort direction for an ORDER BY term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

impl FromStr for OrderDirection {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(OrderDirection::Asc),
            "desc" | "descending" => Ok(OrderDirection::Desc),
            _ => Err(RepositoryError::InvalidOrderDirection(s.to_string())),
        }
    }
}

/// A single ORDER BY term
#[derive(Debug, Clone, PartialEq)]
pub enum OrderClause {
    /// `field ASC|DESC`
    Column {
        field: String,
        direction: OrderDirection,
    },
    /// `CASE WHEN field IN (values) THEN 0 ELSE 1 END ASC`
    ///
    /// Rows whose field holds one of the pinned values sort before all others.
    Pinned { field: String, values: Vec<Value> },
    Raw { sql: String },
}

impl OrderClause {
    pub(crate) fn write(&self, w: &mut SqlWriter) {
        match self {
            OrderClause::Column { field, direction } => {
                w.push(&format!("{field} {}", direction.to_sql()));
            }
            OrderClause::Pinned { field, values } => {
                w.push(&format!("CASE WHEN {field} IN ("));
                w.push_values(values);
                w.push(") THEN 0 ELSE 1 END ASC");
            }
            OrderClause::Raw { sql } => w.push(sql),
        }
    }
}
