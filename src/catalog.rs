//! The three-level graph catalog
//!
//! Holds word-, topic- and language-level graphs side by side. The catalog is
//! built once from three documents and is read-only afterwards, so it can be
//! shared between readers by plain reference.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::graph::GraphRecord;
use crate::loader::{self, GraphMap, LoadError};

/// Granularity of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// One graph per word, nodes are `<word>_<language>`
    Word,
    /// One graph per topic, nodes are `<topic>_<language>`
    Topic,
    /// Whole-corpus graphs, nodes are bare language codes
    Language,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Word, Level::Topic, Level::Language];

    /// Depth number, 1 (finest) to 3 (coarsest)
    pub fn depth(&self) -> u8 {
        match self {
            Level::Word => 1,
            Level::Topic => 2,
            Level::Language => 3,
        }
    }

    pub fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            1 => Some(Level::Word),
            2 => Some(Level::Topic),
            3 => Some(Level::Language),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Word => "word",
            Level::Topic => "topic",
            Level::Language => "language",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown level '{0}' (expected word, topic or language)")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word" | "1" => Ok(Level::Word),
            "topic" | "2" => Ok(Level::Topic),
            "language" | "3" => Ok(Level::Language),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Errors that can occur while building a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to load {level} graphs: {source}")]
    Load {
        level: Level,
        #[source]
        source: LoadError,
    },
}

/// Word-, topic- and language-level graphs
#[derive(Debug, Clone, Default)]
pub struct GraphCatalog {
    word: GraphMap,
    topic: GraphMap,
    language: GraphMap,
}

impl GraphCatalog {
    /// Assemble a catalog from already loaded graph maps
    pub fn new(word: GraphMap, topic: GraphMap, language: GraphMap) -> Self {
        let catalog = Self {
            word,
            topic,
            language,
        };
        info!(
            word = catalog.word.len(),
            topic = catalog.topic.len(),
            language = catalog.language.len(),
            "graph catalog built"
        );
        catalog
    }

    /// Build from three parsed documents
    pub fn build_from(
        word_json: &Value,
        topic_json: &Value,
        language_json: &Value,
    ) -> Result<Self, CatalogError> {
        let word = load_level(Level::Word, || loader::load(word_json))?;
        let topic = load_level(Level::Topic, || loader::load(topic_json))?;
        let language = load_level(Level::Language, || loader::load(language_json))?;
        Ok(Self::new(word, topic, language))
    }

    /// Build from three JSON strings
    pub fn from_strs(word: &str, topic: &str, language: &str) -> Result<Self, CatalogError> {
        let word = load_level(Level::Word, || loader::load_str(word))?;
        let topic = load_level(Level::Topic, || loader::load_str(topic))?;
        let language = load_level(Level::Language, || loader::load_str(language))?;
        Ok(Self::new(word, topic, language))
    }

    /// Build from three JSON files
    pub fn from_paths(word: &Path, topic: &Path, language: &Path) -> Result<Self, CatalogError> {
        let word = load_level(Level::Word, || loader::load_file(word))?;
        let topic = load_level(Level::Topic, || loader::load_file(topic))?;
        let language = load_level(Level::Language, || loader::load_file(language))?;
        Ok(Self::new(word, topic, language))
    }

    fn level_map(&self, level: Level) -> &GraphMap {
        match level {
            Level::Word => &self.word,
            Level::Topic => &self.topic,
            Level::Language => &self.language,
        }
    }

    /// Graphs of a level in document order
    pub fn graphs_at(&self, level: Level) -> impl ExactSizeIterator<Item = &GraphRecord> {
        self.level_map(level).values()
    }

    /// Graph ids of a level in document order
    pub fn graph_ids(&self, level: Level) -> impl ExactSizeIterator<Item = &str> {
        self.level_map(level).keys().map(String::as_str)
    }

    /// Look up a graph by id, ignoring case
    pub fn find(&self, id: &str, level: Level) -> Option<&GraphRecord> {
        let map = self.level_map(level);
        map.get(id).or_else(|| map.get(&id.to_lowercase()))
    }

    /// Distinct topic tags of the word-level graphs, first seen first
    pub fn topics(&self) -> Vec<&str> {
        self.word
            .values()
            .filter_map(GraphRecord::topic)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Word-level graphs tagged with `topic` (case-insensitive)
    pub fn words_in_topic<'a>(
        &'a self,
        topic: &str,
    ) -> impl Iterator<Item = &'a GraphRecord> + use<'a> {
        let topic = topic.to_lowercase();
        self.word
            .values()
            .filter(move |g| g.topic() == Some(topic.as_str()))
    }

    pub fn len(&self, level: Level) -> usize {
        self.level_map(level).len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty() && self.topic.is_empty() && self.language.is_empty()
    }
}

fn load_level(
    level: Level,
    load: impl FnOnce() -> Result<GraphMap, LoadError>,
) -> Result<GraphMap, CatalogError> {
    load().map_err(|source| CatalogError::Load { level, source })
}
