//! Weighted undirected graph records
//!
//! A [`GraphRecord`] holds the nodes and edges of one proximity graph. Edge
//! weights are similarities in `[0.0, 1.0]`; the rendering attributes an
//! external layout engine needs (size hint, layout weight, similarity class)
//! are derived from the weight on demand.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::entity::EntityId;

/// Integrity violations while building a single graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{node}' already exists in graph '{graph}'")]
    DuplicateNode { graph: String, node: String },

    #[error("Edge '{from}' - '{to}' already exists in graph '{graph}'")]
    DuplicateEdge {
        graph: String,
        from: String,
        to: String,
    },

    #[error("Node '{node}' does not exist in graph '{graph}'")]
    UnknownNode { graph: String, node: String },
}

/// Qualitative class of an edge weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityClass {
    /// Weight of exactly 1.0
    Identical,
    /// Weight of exactly 0.0
    Unrelated,
    /// Weight above 0.5
    Similar,
    /// Anything else (0.5 itself included)
    Different,
}

impl SimilarityClass {
    /// Classify a weight
    pub fn from_weight(weight: f64) -> Self {
        if weight == 1.0 {
            SimilarityClass::Identical
        } else if weight == 0.0 {
            SimilarityClass::Unrelated
        } else if weight > 0.5 {
            SimilarityClass::Similar
        } else {
            SimilarityClass::Different
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityClass::Identical => "identical",
            SimilarityClass::Unrelated => "unrelated",
            SimilarityClass::Similar => "similar",
            SimilarityClass::Different => "different",
        }
    }
}

impl fmt::Display for SimilarityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual size of an edge (`weight * 10`)
pub fn size_hint(weight: f64) -> f64 {
    weight * 10.0
}

/// Edge length multiplier for force layouts
///
/// Maps `[0.0, 1.0]` onto `[2.0, 0.5]`: the more similar two entities are,
/// the shorter the edge between them.
pub fn layout_weight(weight: f64) -> f64 {
    2.0 - 1.5 * weight
}

/// A node of a proximity graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: String,
    display_label: Option<String>,
    language_class: String,
}

impl Node {
    /// Create a node, deriving label and language class from its id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let entity = EntityId::parse(&id);
        let display_label = entity.display_label();
        let language_class = entity.language().to_string();
        Self {
            id,
            display_label,
            language_class,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Capitalized label part of a composite id
    pub fn display_label(&self) -> Option<&str> {
        self.display_label.as_deref()
    }

    /// Language code the node belongs to
    pub fn language_class(&self) -> &str {
        &self.language_class
    }

    /// The node id split into label and language parts
    pub fn entity(&self) -> EntityId<'_> {
        EntityId::parse(&self.id)
    }
}

/// An undirected edge between two nodes of the same graph
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
    weight: Option<f64>,
}

impl Edge {
    fn new(source: &str, target: &str, weight: Option<f64>) -> Self {
        Self {
            id: format!("{}_{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            weight,
        }
    }

    /// Edge id, `<source>_<target>` as first declared
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Similarity weight, absent for untagged edges
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn size_hint(&self) -> Option<f64> {
        self.weight.map(size_hint)
    }

    pub fn layout_weight(&self) -> Option<f64> {
        self.weight.map(layout_weight)
    }

    pub fn similarity_class(&self) -> Option<SimilarityClass> {
        self.weight.map(SimilarityClass::from_weight)
    }

    /// Weight formatted for an edge label (two decimals)
    pub fn label(&self) -> Option<String> {
        self.weight.map(|w| format!("{:.2}", w))
    }

    /// The endpoint across from `node_id`
    ///
    /// For a self-loop this is the node itself.
    pub fn opposite(&self, node_id: &str) -> &str {
        if self.source == node_id {
            &self.target
        } else {
            &self.source
        }
    }

    /// Whether this edge joins `a` and `b`, in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// One named, undirected, weighted graph
///
/// Nodes keep their insertion order, and so do the edges incident to each
/// node. Records are built by the loader and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GraphRecord {
    id: String,
    topic: Option<String>,
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    /// Unordered endpoint pair -> index into `edges`
    pairs: HashMap<(String, String), usize>,
    /// Node id -> indices of incident edges
    adjacency: HashMap<String, Vec<usize>>,
}

impl GraphRecord {
    /// Create an empty graph; the id is stored lower-cased
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_lowercase(),
            topic: None,
            nodes: IndexMap::new(),
            edges: Vec::new(),
            pairs: HashMap::new(),
            adjacency: HashMap::new(),
        }
    }

    /// Tag the graph with a topic (stored lower-cased)
    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = Some(topic.to_lowercase());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Topic tag carried by word-level graphs
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn add_node(&mut self, id: &str) -> Result<&Node, GraphError> {
        if self.nodes.contains_key(id) {
            return Err(GraphError::DuplicateNode {
                graph: self.id.clone(),
                node: id.to_string(),
            });
        }
        let (index, _) = self.nodes.insert_full(id.to_string(), Node::new(id));
        Ok(&self.nodes[index])
    }

    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        weight: Option<f64>,
    ) -> Result<&Edge, GraphError> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::UnknownNode {
                    graph: self.id.clone(),
                    node: endpoint.to_string(),
                });
            }
        }

        let key = pair_key(source, target);
        if self.pairs.contains_key(&key) {
            return Err(GraphError::DuplicateEdge {
                graph: self.id.clone(),
                from: source.to_string(),
                to: target.to_string(),
            });
        }

        let index = self.edges.len();
        self.edges.push(Edge::new(source, target, weight));
        self.pairs.insert(key, index);
        self.adjacency
            .entry(source.to_string())
            .or_default()
            .push(index);
        if source != target {
            self.adjacency
                .entry(target.to_string())
                .or_default()
                .push(index);
        }

        Ok(&self.edges[index])
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge between `a` and `b`, regardless of declaration order
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.pairs.get(&pair_key(a, b)).map(|&i| &self.edges[i])
    }

    /// Edges incident to `node_id`, each paired with the opposite node
    ///
    /// Yields nothing for an unknown node.
    pub fn edges_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = (&'a Edge, &'a Node)> {
        self.adjacency
            .get(node_id)
            .into_iter()
            .flatten()
            .filter_map(move |&index| {
                let edge = &self.edges[index];
                self.nodes
                    .get(edge.opposite(node_id))
                    .map(|opposite| (edge, opposite))
            })
    }

    /// Nodes whose id ends with `suffix`, in insertion order
    pub fn nodes_ending_with<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes.values().filter(move |n| n.id.ends_with(suffix))
    }
}
