use super::ast::{BooleanQuery, FilterField};
use crate::models::HistoryEntry;

/// A condition ready for evaluation, with its term already case-folded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCondition {
    pub field: FilterField,
    pub needle: String,
    pub negated: bool,
}

/// Executable match test compiled from a [`BooleanQuery`]
///
/// An immutable value: compile once per query, evaluate against any number of
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub(crate) groups: Vec<Vec<CompiledCondition>>,
}

impl Predicate {
    /// Predicate that accepts every entry
    pub fn always() -> Self {
        Self::default()
    }

    pub fn matches_everything(&self) -> bool {
        self.groups.is_empty()
    }

    /// Any group whose conditions all hold
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        if self.groups.is_empty() {
            return true;
        }
        self.groups
            .iter()
            .any(|group| group.iter().all(|condition| evaluate_condition(entry, condition)))
    }
}

/// Compile a parsed query into a [`Predicate`]
pub fn compile(query: &BooleanQuery) -> Predicate {
    let groups = query
        .groups
        .iter()
        .map(|group| {
            group
                .conditions
                .iter()
                .map(|c| CompiledCondition {
                    field: c.field,
                    needle: fold_case(&c.term),
                    negated: c.negated,
                })
                .collect()
        })
        .collect();
    Predicate { groups }
}

/// Keep entries accepted by the predicate, preserving their order
pub fn apply_filters(entries: Vec<HistoryEntry>, predicate: &Predicate) -> Vec<HistoryEntry> {
    if predicate.matches_everything() {
        return entries;
    }
    entries.into_iter().filter(|entry| predicate.matches(entry)).collect()
}

/// Case folding shared by the in-memory and SQL evaluation paths
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive substring test
pub fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    fold_case(haystack).contains(folded_needle)
}

fn field_value(entry: &HistoryEntry, field: FilterField) -> &str {
    match field {
        FilterField::Command => &entry.command,
        FilterField::Directory => &entry.directory,
        FilterField::Host => &entry.hostname,
    }
}

fn evaluate_condition(entry: &HistoryEntry, condition: &CompiledCondition) -> bool {
    let found = contains_folded(field_value(entry, condition.field), &condition.needle);
    found != condition.negated
}
