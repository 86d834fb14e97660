//! Free-text search over a single named column.
//!
//! Invalid input never fails a listing: an over-long query is treated as no
//! query at all, but is still echoed back for redisplay.

use std::collections::HashMap;

pub const MAX_QUERY_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPredicate {
    /// Identity predicate, matches every row.
    All,
    /// Case-insensitive substring match on `field`.
    Contains { field: String, needle: String },
}

impl FilterPredicate {
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Contains { field, .. } => Some(field.as_str()),
        }
    }

    /// Evaluates the predicate against the value of its field.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Contains { needle, .. } => icontains(value, needle),
        }
    }
}

/// Unicode-lowercase substring test. Registered in SQLite under the same
/// name so queries and [`FilterPredicate::matches`] agree.
pub fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Builds the predicate for `field_name` from raw query parameters and
/// returns the submitted value (or `""`) alongside it.
pub fn resolve_filter(
    params: &HashMap<String, String>,
    field_name: &str,
) -> (FilterPredicate, String) {
    let raw = params.get(field_name).cloned().unwrap_or_default();

    if raw.chars().count() > MAX_QUERY_LEN {
        tracing::debug!(field = field_name, "ignoring over-long search value");
        return (FilterPredicate::All, raw);
    }

    let needle = raw.trim();
    let predicate = if needle.is_empty() {
        FilterPredicate::All
    } else {
        FilterPredicate::contains(field_name, needle)
    };
    (predicate, raw)
}
