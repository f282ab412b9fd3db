/// Entry field a condition is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Command text (default for unqualified terms)
    Command,
    /// Directory the command ran in (`dir:` / `directory:`)
    Directory,
    /// Host the command ran on (`host:` / `hostname:`)
    Host,
}

impl FilterField {
    /// Resolve a field qualifier, accepting synonyms case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "command" => Some(Self::Command),
            "dir" | "directory" => Some(Self::Directory),
            "host" | "hostname" => Some(Self::Host),
            _ => None,
        }
    }
}

/// Single field/term test, optionally negated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: FilterField,
    pub term: String,
    pub negated: bool,
}

impl Condition {
    /// Build a condition; returns `None` when the term is blank after trimming
    pub fn new(field: FilterField, term: &str, negated: bool) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self { field, term: term.to_string(), negated })
    }

    pub fn command(term: &str) -> Option<Self> {
        Self::new(FilterField::Command, term, false)
    }
}

/// Conditions that must all match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrGroup {
    pub conditions: Vec<Condition>,
}

impl OrGroup {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Parsed search: OR of AND-groups
///
/// - `git push` → one group with two command conditions
/// - `git OR make` → two groups
/// - No groups → matches every entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BooleanQuery {
    pub groups: Vec<OrGroup>,
}

impl BooleanQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from groups, discarding any that ended up empty
    pub fn from_groups(groups: Vec<OrGroup>) -> Self {
        Self { groups: groups.into_iter().filter(|g| !g.is_empty()).collect() }
    }

    /// Query that matches the whole text literally against the command field
    pub fn literal(raw: &str) -> Self {
        match Condition::command(raw) {
            Some(condition) => Self { groups: vec![OrGroup::new(vec![condition])] },
            None => Self::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
