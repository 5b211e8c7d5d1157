//! JSON graph document loading
//!
//! A document maps graph ids to `{ "nodes": [...], "edges": [...] }` objects:
//!
//! ```json
//! {
//!   "animal": {
//!     "topic": "animal",
//!     "nodes": [{ "id": "animal_en" }, { "id": "animal_es" }],
//!     "edges": [{ "source": "animal_en", "target": "animal_es", "weight": 0.8 }]
//!   }
//! }
//! ```
//!
//! Graphs keep document order. Loading is all-or-nothing: the first malformed
//! graph aborts the whole document.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::graph::{GraphError, GraphRecord};

/// Errors that can occur while loading a graph document
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read graph file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse graph document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Graph document must be a JSON object")]
    NotAnObject,

    #[error("Malformed graph '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("Invalid graph '{key}': {source}")]
    Graph {
        key: String,
        #[source]
        source: GraphError,
    },
}

impl LoadError {
    fn malformed(key: &str, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Graph key the error refers to, when there is one
    pub fn graph_key(&self) -> Option<&str> {
        match self {
            LoadError::Malformed { key, .. } | LoadError::Graph { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Graphs of one document, keyed by lower-cased graph id
pub type GraphMap = IndexMap<String, GraphRecord>;

/// Build graph records from a parsed document
pub fn load(document: &Value) -> Result<GraphMap, LoadError> {
    let root = document.as_object().ok_or(LoadError::NotAnObject)?;
    let mut graphs = GraphMap::with_capacity(root.len());

    for (key, value) in root {
        let graph = build_graph(key, value)?;
        if graphs.contains_key(graph.id()) {
            return Err(LoadError::malformed(
                key,
                format!("graph id '{}' is declared more than once", graph.id()),
            ));
        }
        debug!(
            graph = graph.id(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph"
        );
        graphs.insert(graph.id().to_string(), graph);
    }

    Ok(graphs)
}

/// Parse and load a document from a JSON string
pub fn load_str(json: &str) -> Result<GraphMap, LoadError> {
    let document: Value = serde_json::from_str(json)?;
    load(&document)
}

/// Read, parse and load a document from a file
pub fn load_file(path: &Path) -> Result<GraphMap, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "read graph document");
    load_str(&content)
}

fn build_graph(key: &str, value: &Value) -> Result<GraphRecord, LoadError> {
    let data = value
        .as_object()
        .ok_or_else(|| LoadError::malformed(key, "graph entry is not an object"))?;

    let mut graph = GraphRecord::new(key);
    match data.get("topic") {
        None | Some(Value::Null) => {}
        Some(Value::String(topic)) => graph = graph.with_topic(topic),
        Some(_) => return Err(LoadError::malformed(key, "'topic' is not a string")),
    }

    let wrap = |source: GraphError| LoadError::Graph {
        key: key.to_string(),
        source,
    };

    for (index, entry) in array_field(key, data, "nodes")?.iter().enumerate() {
        let node = entry
            .as_object()
            .ok_or_else(|| LoadError::malformed(key, format!("node #{} is not an object", index)))?;
        let id = string_field(key, node, "id", "node", index)?;
        graph.add_node(id).map_err(wrap)?;
    }

    for (index, entry) in array_field(key, data, "edges")?.iter().enumerate() {
        let edge = entry
            .as_object()
            .ok_or_else(|| LoadError::malformed(key, format!("edge #{} is not an object", index)))?;
        let source = string_field(key, edge, "source", "edge", index)?;
        let target = string_field(key, edge, "target", "edge", index)?;
        let weight = weight_field(key, edge, index)?;
        graph.add_edge(source, target, weight).map_err(wrap)?;
    }

    Ok(graph)
}

fn array_field<'a>(
    key: &str,
    data: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Vec<Value>, LoadError> {
    match data.get(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(LoadError::malformed(key, format!("'{}' is not an array", field))),
        None => Err(LoadError::malformed(key, format!("missing '{}' array", field))),
    }
}

fn string_field<'a>(
    key: &str,
    entry: &'a Map<String, Value>,
    field: &str,
    kind: &str,
    index: usize,
) -> Result<&'a str, LoadError> {
    entry.get(field).and_then(Value::as_str).ok_or_else(|| {
        LoadError::malformed(
            key,
            format!("{} #{} has no string '{}' field", kind, index, field),
        )
    })
}

fn weight_field(
    key: &str,
    edge: &Map<String, Value>,
    index: usize,
) -> Result<Option<f64>, LoadError> {
    let weight = match edge.get("weight") {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value.as_f64().ok_or_else(|| {
            LoadError::malformed(key, format!("edge #{} has a non-numeric weight", index))
        })?,
    };

    if !(0.0..=1.0).contains(&weight) {
        return Err(LoadError::malformed(
            key,
            format!("edge #{} weight {} is outside [0, 1]", index, weight),
        ));
    }

    Ok(Some(weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SimilarityClass;

    const WORDS: &str = r#"{
        "Animal": {
            "topic": "Animal",
            "nodes": [{ "id": "animal_en" }, { "id": "animal_es" }, { "id": "animal_pl" }],
            "edges": [
                { "source": "animal_en", "target": "animal_es", "weight": 0.8 },
                { "source": "animal_en", "target": "animal_pl", "weight": 0.5 },
                { "source": "animal_es", "target": "animal_pl" }
            ]
        },
        "dog": {
            "topic": "animal",
            "nodes": [{ "id": "dog_en" }, { "id": "dog_es" }],
            "edges": [{ "source": "dog_en", "target": "dog_es", "weight": 0.0 }]
        }
    }"#;

    #[test]
    fn test_one_record_per_key_in_document_order() {
        let graphs = load_str(WORDS).unwrap();
        let ids: Vec<&str> = graphs.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["animal", "dog"]);

        let animal = &graphs["animal"];
        assert_eq!(animal.node_count(), 3);
        assert_eq!(animal.edge_count(), 3);
        assert_eq!(animal.topic(), Some("animal"));
        assert_eq!(graphs["dog"].node_count(), 2);
        assert_eq!(graphs["dog"].edge_count(), 1);
    }

    #[test]
    fn test_derived_attributes() {
        let graphs = load_str(WORDS).unwrap();
        let animal = &graphs["animal"];

        let node = animal.node("animal_pl").unwrap();
        assert_eq!(node.display_label(), Some("Animal"));
        assert_eq!(node.language_class(), "pl");

        let edge = animal.edge_between("animal_en", "animal_pl").unwrap();
        assert_eq!(edge.similarity_class(), Some(SimilarityClass::Different));
        assert_eq!(edge.size_hint(), Some(5.0));

        let untagged = animal.edge_between("animal_es", "animal_pl").unwrap();
        assert_eq!(untagged.weight(), None);

        let dog = graphs["dog"].edge_between("dog_en", "dog_es").unwrap();
        assert_eq!(dog.similarity_class(), Some(SimilarityClass::Unrelated));
    }

    #[test]
    fn test_language_class_round_trip() {
        let json = r#"{ "sun": { "nodes": [
            { "id": "sun_en" }, { "id": "sun_es" }, { "id": "sun_fr" }, { "id": "sun_pl" }
        ], "edges": [] } }"#;
        let graphs = load_str(json).unwrap();
        for node in graphs["sun"].nodes() {
            let rebuilt = format!("sun_{}", node.language_class());
            assert_eq!(rebuilt, node.id());
        }
    }

    #[test]
    fn test_missing_nodes_array() {
        let err = load_str(r#"{ "broken": { "edges": [] } }"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert_eq!(err.graph_key(), Some("broken"));
    }

    #[test]
    fn test_missing_edges_array() {
        let err = load_str(r#"{ "broken": { "nodes": [] } }"#).unwrap_err();
        assert_eq!(err.graph_key(), Some("broken"));
        assert!(err.to_string().contains("edges"), "{}", err);
    }

    #[test]
    fn test_node_without_id() {
        let err = load_str(r#"{ "g": { "nodes": [{ "name": "x" }], "edges": [] } }"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { ref key, .. } if key == "g"));
    }

    #[test]
    fn test_edge_without_target() {
        let json = r#"{ "g": { "nodes": [{ "id": "a" }], "edges": [{ "source": "a" }] } }"#;
        let err = load_str(json).unwrap_err();
        assert!(err.to_string().contains("target"), "{}", err);
    }

    #[test]
    fn test_weight_out_of_range() {
        let json = r#"{ "g": {
            "nodes": [{ "id": "a" }, { "id": "b" }],
            "edges": [{ "source": "a", "target": "b", "weight": 1.5 }]
        } }"#;
        assert!(matches!(load_str(json), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_integrity_errors_abort_load() {
        let json = r#"{
            "ok": { "nodes": [{ "id": "en" }], "edges": [] },
            "dup": { "nodes": [{ "id": "en" }, { "id": "en" }], "edges": [] }
        }"#;
        let err = load_str(json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Graph { ref key, source: GraphError::DuplicateNode { .. } } if key == "dup"
        ));

        let json = r#"{ "g": {
            "nodes": [{ "id": "en" }],
            "edges": [{ "source": "en", "target": "es", "weight": 0.3 }]
        } }"#;
        assert!(matches!(
            load_str(json),
            Err(LoadError::Graph { source: GraphError::UnknownNode { .. }, .. })
        ));
    }

    #[test]
    fn test_ids_colliding_after_lowercase() {
        let json = r#"{
            "Food": { "nodes": [], "edges": [] },
            "food": { "nodes": [], "edges": [] }
        }"#;
        assert!(matches!(load_str(json), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_non_object_document() {
        assert!(matches!(load_str("[]"), Err(LoadError::NotAnObject)));
        assert!(matches!(load_str("{ not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("/nonexistent/graphs.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
