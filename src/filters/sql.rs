//! SQL pushdown for compiled predicates.
//!
//! Translates a [`Predicate`] into a `WHERE` clause plus positional
//! parameters. Substring tests go through the `dirhist_contains` scalar
//! function, which the store registers on every connection, so SQL results
//! match [`Predicate::matches`] exactly (SQLite's `LIKE` only folds ASCII).

use super::apply::{CompiledCondition, Predicate};
use super::ast::FilterField;

/// Name of the scalar function the store registers for substring tests
pub const CONTAINS_FUNCTION: &str = "dirhist_contains";

/// A `WHERE` clause and its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFilter {
    pub clause: String,
    pub params: Vec<String>,
}

impl SqlFilter {
    fn always() -> Self {
        Self { clause: "1".to_string(), params: Vec::new() }
    }
}

fn column(field: FilterField) -> &'static str {
    match field {
        FilterField::Command => "command",
        FilterField::Directory => "executing_dir",
        FilterField::Host => "executing_host",
    }
}

fn condition_sql(condition: &CompiledCondition) -> String {
    let test = format!("{}({}, ?)", CONTAINS_FUNCTION, column(condition.field));
    if condition.negated { format!("NOT {}", test) } else { test }
}

impl Predicate {
    /// Equivalent SQL filter over the `history` table
    pub fn to_sql(&self) -> SqlFilter {
        if self.groups.is_empty() {
            return SqlFilter::always();
        }

        let mut params = Vec::new();
        let groups: Vec<String> = self
            .groups
            .iter()
            .map(|group| {
                let parts: Vec<String> = group
                    .iter()
                    .map(|condition| {
                        params.push(condition.needle.clone());
                        condition_sql(condition)
                    })
                    .collect();
                format!("({})", parts.join(" AND "))
            })
            .collect();

        SqlFilter { clause: groups.join(" OR "), params }
    }
}
