//! Proximity tables
//!
//! For a main language, walks every node of a graph whose id ends with that
//! language and records the weight of each incident edge under the language
//! of the opposite node. One row is produced per graph of the working set,
//! followed by an `AVERAGE` row drawn from the next-coarser level:
//!
//! | topic filter | working set                     | baseline graph            |
//! |--------------|---------------------------------|---------------------------|
//! | none         | every topic-level graph         | language-level `language` |
//! | `t`          | word-level graphs tagged `t`    | topic-level `t`           |
//!
//! Missing nodes, edges or baseline graphs yield empty mappings, never errors.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{GraphCatalog, Level};
use crate::graph::GraphRecord;

/// Name of the baseline row
pub const AVERAGE_ROW: &str = "AVERAGE";

/// Default id of the language-level baseline graph
pub const DEFAULT_LANGUAGE_BASELINE: &str = "language";

/// One table row: a name and a proximity value per language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityRow {
    name: String,
    proximity: IndexMap<String, f64>,
}

impl ProximityRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            proximity: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a value; a repeated language keeps its position and the last value
    pub fn insert(&mut self, language: &str, value: f64) {
        self.proximity.insert(language.to_string(), value);
    }

    pub fn get(&self, language: &str) -> Option<f64> {
        self.proximity.get(language).copied()
    }

    /// `(language, value)` pairs in first-seen order
    pub fn values(&self) -> impl ExactSizeIterator<Item = (&str, f64)> {
        self.proximity.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn languages(&self) -> impl ExactSizeIterator<Item = &str> {
        self.proximity.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.proximity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proximity.is_empty()
    }

    pub fn is_average(&self) -> bool {
        self.name == AVERAGE_ROW
    }
}

/// Result of one proximity query
///
/// Always holds at least the `AVERAGE` row, which is the last row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityTable {
    main_language: String,
    topic: Option<String>,
    rows: Vec<ProximityRow>,
}

impl ProximityTable {
    fn new(
        main_language: &str,
        topic: Option<String>,
        mut rows: Vec<ProximityRow>,
        average: ProximityRow,
    ) -> Self {
        rows.push(average);
        Self {
            main_language: main_language.to_string(),
            topic,
            rows,
        }
    }

    pub fn main_language(&self) -> &str {
        &self.main_language
    }

    /// Lower-cased topic filter the table was built with
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// All rows, `AVERAGE` last
    pub fn rows(&self) -> &[ProximityRow] {
        &self.rows
    }

    /// Rows of the working set, without the `AVERAGE` row
    pub fn entries(&self) -> &[ProximityRow] {
        &self.rows[..self.rows.len() - 1]
    }

    pub fn average(&self) -> &ProximityRow {
        &self.rows[self.rows.len() - 1]
    }

    pub fn into_rows(self) -> Vec<ProximityRow> {
        self.rows
    }

    /// Table columns: the union of every row's languages, first seen first
    pub fn languages(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flat_map(ProximityRow::languages)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Header of the name column
    pub fn key_header(&self) -> &'static str {
        if self.topic.is_some() { "Word" } else { "Topic" }
    }

    /// Baseline value for a language column
    pub fn baseline(&self, language: &str) -> Option<f64> {
        self.average().get(language)
    }
}

/// Which part of the opposite node's id keys the proximity value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPart {
    /// Language part of a composite id
    Language,
    /// Leading segment; the bare code on language-level graphs
    Head,
}

/// Builds proximity tables from a catalog
#[derive(Debug, Clone)]
pub struct ProximityAggregator<'a> {
    catalog: &'a GraphCatalog,
    language_baseline: String,
}

impl<'a> ProximityAggregator<'a> {
    pub fn new(catalog: &'a GraphCatalog) -> Self {
        Self {
            catalog,
            language_baseline: DEFAULT_LANGUAGE_BASELINE.to_string(),
        }
    }

    /// Use another language-level graph as the unfiltered baseline
    pub fn with_language_baseline(mut self, id: &str) -> Self {
        self.language_baseline = id.to_lowercase();
        self
    }

    /// Build the proximity table for `main_language`, optionally within a topic
    pub fn query(&self, main_language: &str, topic: Option<&str>) -> ProximityTable {
        let topic = topic.map(str::to_lowercase);

        let (working_set, baseline, baseline_key): (Vec<&GraphRecord>, _, _) = match &topic {
            Some(topic) => (
                self.catalog.words_in_topic(topic).collect(),
                self.catalog.find(topic, Level::Topic),
                KeyPart::Language,
            ),
            None => (
                self.catalog.graphs_at(Level::Topic).collect(),
                self.catalog.find(&self.language_baseline, Level::Language),
                KeyPart::Head,
            ),
        };

        let mut average = ProximityRow::new(AVERAGE_ROW);
        match baseline {
            Some(graph) => collect(graph, main_language, baseline_key, &mut average),
            None => warn!(
                topic = topic.as_deref(),
                baseline = %topic.as_deref().unwrap_or(&self.language_baseline),
                "baseline graph not found, AVERAGE row left empty"
            ),
        }

        let rows: Vec<ProximityRow> = working_set
            .into_iter()
            .map(|graph| {
                let mut row = ProximityRow::new(graph.id());
                collect(graph, main_language, KeyPart::Language, &mut row);
                row
            })
            .collect();

        debug!(
            main_language,
            topic = topic.as_deref(),
            rows = rows.len(),
            baseline_languages = average.len(),
            "proximity query"
        );

        ProximityTable::new(main_language, topic, rows, average)
    }
}

/// Walk the edges of every node ending with `main_language` into `row`
///
/// Untagged edges carry no proximity and are skipped.
fn collect(graph: &GraphRecord, main_language: &str, key: KeyPart, row: &mut ProximityRow) {
    for node in graph.nodes_ending_with(main_language) {
        for (edge, opposite) in graph.edges_of(node.id()) {
            let Some(weight) = edge.weight() else {
                continue;
            };
            let entity = opposite.entity();
            let language = match key {
                KeyPart::Language => entity.language(),
                KeyPart::Head => entity.head(),
            };
            row.insert(language, weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(word: &str, topic: &str, language: &str) -> GraphCatalog {
        GraphCatalog::from_strs(word, topic, language).unwrap()
    }

    const WORDS: &str = r#"{
        "animal": {
            "topic": "animal",
            "nodes": [{ "id": "animal_en" }, { "id": "animal_es" }],
            "edges": [{ "source": "animal_en", "target": "animal_es", "weight": 0.8 }]
        }
    }"#;

    const TOPICS: &str = r#"{
        "animal": {
            "nodes": [{ "id": "animal_en" }, { "id": "animal_es" }],
            "edges": [{ "source": "animal_en", "target": "animal_es", "weight": 0.75 }]
        }
    }"#;

    const LANGUAGES: &str = r#"{
        "language": {
            "nodes": [{ "id": "en" }, { "id": "es" }, { "id": "fr" }],
            "edges": [
                { "source": "en", "target": "es", "weight": 0.6 },
                { "source": "fr", "target": "en", "weight": 0.3 },
                { "source": "es", "target": "fr", "weight": 0.5 }
            ]
        }
    }"#;

    #[test]
    fn test_topic_filtered_query() {
        let catalog = catalog(WORDS, TOPICS, LANGUAGES);
        let table = ProximityAggregator::new(&catalog).query("en", Some("animal"));

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name(), "animal");
        assert_eq!(rows[0].values().collect::<Vec<_>>(), vec![("es", 0.8)]);
        assert_eq!(rows[1].name(), AVERAGE_ROW);
        assert_eq!(rows[1].values().collect::<Vec<_>>(), vec![("es", 0.75)]);
        assert_eq!(table.key_header(), "Word");
    }

    #[test]
    fn test_topic_filter_ignores_case() {
        let catalog = catalog(WORDS, TOPICS, LANGUAGES);
        let table = ProximityAggregator::new(&catalog).query("en", Some("Animal"));
        assert_eq!(table.topic(), Some("animal"));
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.baseline("es"), Some(0.75));
    }

    #[test]
    fn test_baseline_with_bare_language_nodes() {
        let topics = r#"{ "animal": {
            "nodes": [{ "id": "en" }, { "id": "es" }],
            "edges": [{ "source": "en", "target": "es", "weight": 0.75 }]
        } }"#;
        let catalog = catalog(WORDS, topics, LANGUAGES);
        let table = ProximityAggregator::new(&catalog).query("en", Some("animal"));
        assert_eq!(table.average().get("es"), Some(0.75));
    }

    #[test]
    fn test_unfiltered_query_uses_language_graph() {
        let catalog = catalog(WORDS, TOPICS, LANGUAGES);
        let table = ProximityAggregator::new(&catalog).query("en", None);

        assert_eq!(table.key_header(), "Topic");
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.entries()[0].name(), "animal");
        assert_eq!(table.entries()[0].get("es"), Some(0.75));

        let average = table.average();
        assert_eq!(
            average.values().collect::<Vec<_>>(),
            vec![("es", 0.6), ("fr", 0.3)]
        );
    }

    #[test]
    fn test_unknown_main_language_yields_empty_rows() {
        let languages = r#"{ "language": {
            "nodes": [{ "id": "es" }, { "id": "fr" }],
            "edges": [{ "source": "es", "target": "fr", "weight": 0.5 }]
        } }"#;
        let topics = r#"{
            "animal": {
                "nodes": [{ "id": "animal_es" }, { "id": "animal_fr" }],
                "edges": [{ "source": "animal_es", "target": "animal_fr", "weight": 0.4 }]
            },
            "food": { "nodes": [], "edges": [] }
        }"#;
        let catalog = catalog(WORDS, topics, languages);
        let table = ProximityAggregator::new(&catalog).query("en", None);

        assert_eq!(table.rows().len(), 3);
        assert!(table.rows().iter().all(ProximityRow::is_empty));
        assert!(table.average().is_average());
        assert!(table.languages().is_empty());
    }

    #[test]
    fn test_missing_baseline_graph() {
        let catalog = catalog(WORDS, r#"{}"#, r#"{}"#);
        let table = ProximityAggregator::new(&catalog).query("en", Some("animal"));
        assert_eq!(table.entries()[0].get("es"), Some(0.8));
        assert!(table.average().is_empty());

        let table = ProximityAggregator::new(&catalog).query("en", None);
        assert_eq!(table.rows().len(), 1);
        assert!(table.average().is_empty());
    }

    #[test]
    fn test_custom_language_baseline() {
        let languages = r#"{ "Global": {
            "nodes": [{ "id": "en" }, { "id": "pl" }],
            "edges": [{ "source": "en", "target": "pl", "weight": 0.2 }]
        } }"#;
        let catalog = catalog(WORDS, TOPICS, languages);
        let table = ProximityAggregator::new(&catalog)
            .with_language_baseline("GLOBAL")
            .query("en", None);
        assert_eq!(table.baseline("pl"), Some(0.2));
    }

    #[test]
    fn test_same_language_overwrites() {
        let words = r#"{ "bank": {
            "topic": "money",
            "nodes": [{ "id": "bank_en" }, { "id": "banco_es" }, { "id": "banca_es" }],
            "edges": [
                { "source": "bank_en", "target": "banco_es", "weight": 0.4 },
                { "source": "bank_en", "target": "banca_es", "weight": 0.6 }
            ]
        } }"#;
        let catalog = catalog(words, "{}", "{}");
        let table = ProximityAggregator::new(&catalog).query("en", Some("money"));
        let row = &table.entries()[0];
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("es"), Some(0.6));
    }

    #[test]
    fn test_untagged_edges_are_skipped() {
        let words = r#"{ "sun": {
            "topic": "sky",
            "nodes": [{ "id": "sun_en" }, { "id": "sol_es" }, { "id": "soleil_fr" }],
            "edges": [
                { "source": "sun_en", "target": "sol_es" },
                { "source": "soleil_fr", "target": "sun_en", "weight": 0.1 }
            ]
        } }"#;
        let catalog = catalog(words, "{}", "{}");
        let table = ProximityAggregator::new(&catalog).query("en", Some("sky"));
        assert_eq!(
            table.entries()[0].values().collect::<Vec<_>>(),
            vec![("fr", 0.1)]
        );
    }

    #[test]
    fn test_languages_union_in_first_seen_order() {
        let words = r#"{
            "dog": {
                "topic": "animal",
                "nodes": [{ "id": "dog_en" }, { "id": "dog_pl" }],
                "edges": [{ "source": "dog_en", "target": "dog_pl", "weight": 0.1 }]
            },
            "cat": {
                "topic": "animal",
                "nodes": [{ "id": "cat_en" }, { "id": "cat_es" }, { "id": "cat_pl" }],
                "edges": [
                    { "source": "cat_en", "target": "cat_es", "weight": 0.3 },
                    { "source": "cat_en", "target": "cat_pl", "weight": 0.2 }
                ]
            }
        }"#;
        let topics = r#"{ "animal": {
            "nodes": [{ "id": "animal_en" }, { "id": "animal_fr" }],
            "edges": [{ "source": "animal_en", "target": "animal_fr", "weight": 0.5 }]
        } }"#;
        let catalog = catalog(words, topics, "{}");
        let table = ProximityAggregator::new(&catalog).query("en", Some("animal"));

        let names: Vec<&str> = table.rows().iter().map(ProximityRow::name).collect();
        assert_eq!(names, vec!["dog", "cat", AVERAGE_ROW]);
        assert_eq!(table.languages(), vec!["pl", "es", "fr"]);
        assert_eq!(table.entries()[0].get("es"), None);
    }
}
