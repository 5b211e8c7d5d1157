//! Entity identifiers
//!
//! Graph nodes are keyed by a plain language code (`en`) or by a composite
//! `<label>_<language>` id (`animal_en`). The composite form is split on the
//! last underscore so labels may themselves contain underscores.

use std::fmt;

/// A borrowed view of a node id split into its label and language parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId<'a> {
    raw: &'a str,
    label: Option<&'a str>,
    language: &'a str,
}

impl<'a> EntityId<'a> {
    /// Split an id on its last underscore
    ///
    /// `animal_en` yields label `animal` and language `en`; `en` yields no
    /// label and language `en`.
    pub fn parse(raw: &'a str) -> Self {
        match raw.rsplit_once('_') {
            Some((label, language)) => Self {
                raw,
                label: (!label.is_empty()).then_some(label),
                language,
            },
            None => Self {
                raw,
                label: None,
                language: raw,
            },
        }
    }

    /// The full id as given
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Label part of a composite id, as stored (not capitalized)
    pub fn label(&self) -> Option<&'a str> {
        self.label
    }

    /// Language part of a composite id, or the whole id for a simple one
    pub fn language(&self) -> &'a str {
        self.language
    }

    /// Leading segment: the label for composite ids, the whole id otherwise
    ///
    /// Language-level graphs key their nodes by bare codes, so this is the
    /// language code there.
    pub fn head(&self) -> &'a str {
        self.label.unwrap_or(self.language)
    }

    /// Whether the id carries a separate label part
    pub fn is_composite(&self) -> bool {
        self.label.is_some()
    }

    /// Capitalized label for display, if the id has one
    pub fn display_label(&self) -> Option<String> {
        self.label.map(capitalize_first)
    }
}

impl fmt::Display for EntityId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

/// Upper-case the first character of a string, leaving the rest untouched
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
