//! Keyword tables that drive capability classification.
//!
//! The built-in tables are immutable statics. A `KeywordOverrides` document,
//! usually deserialized from TOML, may replace any of them wholesale; tables
//! it does not mention keep their built-in contents.
//!
//! Example override file:
//! ```toml
//! symbolic = ["container number", "seal id", "plate"]
//! noisy = ["warehouse", "forklift", "noisy"]
//! ```

use serde::{Deserialize, Serialize};

/// Identifiers, codes and numbers that must be captured character-exact.
pub const SYMBOLIC_KEYWORDS: &[&str] = &[
    "vehicle id",
    "vehicle ids",
    "code",
    "alphanumeric",
    "plate",
    "number",
    "numbers",
    "dispatch",
    "id",
    "ids",
    "reference",
    "reference number",
    "tracking number",
];

pub const NOISY_KEYWORDS: &[&str] = &["noise", "noisy", "call", "environment", "field", "outdoor"];

pub const EXECUTION_KEYWORDS: &[&str] =
    &["dispatch", "route", "execute", "execution", "action", "trigger"];

pub const CONFIRMATION_KEYWORDS: &[&str] = &["confirm", "readback", "verify", "acknowledge"];

pub const PRONUNCIATION_KEYWORDS: &[&str] = &["pronounce", "spell", "phonetic"];

pub const MEMORY_KEYWORDS: &[&str] = &["memory", "context", "remember", "history"];

/// The six keyword lists the classifier matches against.
///
/// All entries are stored lower-cased; matching is plain substring
/// membership against the lower-cased use case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub symbolic: Vec<String>,
    pub noisy: Vec<String>,
    pub execution: Vec<String>,
    pub confirmation: Vec<String>,
    pub pronunciation: Vec<String>,
    pub memory: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            symbolic: owned(SYMBOLIC_KEYWORDS),
            noisy: owned(NOISY_KEYWORDS),
            execution: owned(EXECUTION_KEYWORDS),
            confirmation: owned(CONFIRMATION_KEYWORDS),
            pronunciation: owned(PRONUNCIATION_KEYWORDS),
            memory: owned(MEMORY_KEYWORDS),
        }
    }
}

impl KeywordTable {
    /// Replace every list `overrides` provides, keeping the rest.
    pub fn with_overrides(mut self, overrides: KeywordOverrides) -> Self {
        let apply = |slot: &mut Vec<String>, list: Option<Vec<String>>| {
            if let Some(list) = list {
                *slot = normalize(list);
            }
        };
        apply(&mut self.symbolic, overrides.symbolic);
        apply(&mut self.noisy, overrides.noisy);
        apply(&mut self.execution, overrides.execution);
        apply(&mut self.confirmation, overrides.confirmation);
        apply(&mut self.pronunciation, overrides.pronunciation);
        apply(&mut self.memory, overrides.memory);
        self
    }
}

/// Optional replacement lists, one per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordOverrides {
    pub symbolic: Option<Vec<String>>,
    pub noisy: Option<Vec<String>>,
    pub execution: Option<Vec<String>>,
    pub confirmation: Option<Vec<String>>,
    pub pronunciation: Option<Vec<String>>,
    pub memory: Option<Vec<String>>,
}

/// True if `text` (already lower-cased) contains any of `keywords`.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// Empty entries would match every input.
fn normalize(list: Vec<String>) -> Vec<String> {
    list.into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
