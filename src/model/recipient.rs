//! Recipient type.

use serde::{Deserialize, Serialize};

/// A certificate recipient loaded from the attendee list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient {
    /// 1-based position in the attendee list
    pub index: usize,

    /// Display name substituted for `[NAME]`
    pub name: String,
}

impl Recipient {
    /// Create a new recipient.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    /// Build recipients from names, numbering them from 1.
    pub fn from_names<I, S>(names: I) -> Vec<Recipient>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Recipient::new(i + 1, name))
            .collect()
    }

    /// A filesystem-safe form of the name.
    ///
    /// Alphanumerics are kept, whitespace and separators become `_`,
    /// everything else is dropped. Falls back to `recipient`.
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for c in self.name.chars() {
            if c.is_alphanumeric() {
                slug.push(c);
            } else if (c.is_whitespace() || c == '-' || c == '_' || c == '.')
                && !slug.ends_with('_')
                && !slug.is_empty()
            {
                slug.push('_');
            }
        }
        let slug: String = slug.trim_end_matches('_').chars().take(64).collect();
        if slug.is_empty() {
            "recipient".to_string()
        } else {
            slug
        }
    }
}
