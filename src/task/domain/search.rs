//! Case-insensitive substring search over task text fields.

use super::Task;

/// Normalized search term.
///
/// A task matches when the term occurs, ignoring case, in its title,
/// description, any context, or any tag. The empty term occurs in every
/// string and therefore matches every task.
///
/// Case is folded one character at a time with the simple Unicode lowercase
/// mapping, so the result never depends on neighbouring characters: `Σ`
/// always folds to `σ` and `İ` folds to `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    /// Creates a query from raw caller input.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            needle: fold_case(raw),
        }
    }

    /// Returns the lowercased search term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Returns `true` when the query matches every task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Returns `true` when the task contains the term in any searchable field.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.contained_in(task.title())
            || task
                .description()
                .is_some_and(|description| self.contained_in(description))
            || task.contexts().iter().any(|context| self.contained_in(context))
            || task.tags().iter().any(|tag| self.contained_in(tag))
    }

    fn contained_in(&self, haystack: &str) -> bool {
        fold_case(haystack).contains(&self.needle)
    }
}

fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

// `char::to_lowercase` yields more than one character only where the full
// mapping differs from the simple one; the first character is the simple
// mapping.
fn fold_char(character: char) -> char {
    character.to_lowercase().next().unwrap_or(character)
}
