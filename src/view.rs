//! Serialisable view data for external renderers
//!
//! Converts graph records and proximity tables into plain JSON-ready
//! structures. Layout, drawing and interaction stay with the consumer; these
//! types only carry the attributes it needs (labels, classes, sizes, layout
//! weights, cell colours).

use serde::Serialize;

use crate::catalog::Level;
use crate::entity::capitalize_first;
use crate::graph::{GraphRecord, SimilarityClass};
use crate::heat::HeatMapper;
use crate::proximity::{ProximityRow, ProximityTable};

/// Complete graph data for visualization
#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub id: String,
    pub title: String,
    pub level: Level,
    pub topic: Option<String>,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub summary: GraphSummary,
}

/// A node of the rendered graph
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: String,
    pub label: Option<String>,
    /// Style class: the node's language code
    pub class: String,
    pub degree: usize,
}

/// An edge of the rendered graph
#[derive(Debug, Clone, Serialize)]
pub struct EdgeView {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: Option<f64>,
    pub label: Option<String>,
    pub size: Option<f64>,
    pub layout_weight: Option<f64>,
    pub class: Option<SimilarityClass>,
}

/// Summary statistics for the graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub weighted_edges: usize,
    pub mean_weight: Option<f64>,
    pub classes: ClassCounts,
}

/// Edge counts by similarity class
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassCounts {
    pub identical: usize,
    pub similar: usize,
    pub different: usize,
    pub unrelated: usize,
}

/// Convert a graph record to renderer data
pub fn graph_to_view(graph: &GraphRecord, level: Level) -> GraphView {
    let nodes: Vec<NodeView> = graph
        .nodes()
        .map(|node| NodeView {
            id: node.id().to_string(),
            label: node.display_label().map(str::to_string),
            class: node.language_class().to_string(),
            degree: graph.edges_of(node.id()).count(),
        })
        .collect();

    let mut classes = ClassCounts::default();
    let mut weight_sum = 0.0;
    let mut weighted_edges = 0;

    let edges: Vec<EdgeView> = graph
        .edges()
        .map(|edge| {
            if let Some(weight) = edge.weight() {
                weight_sum += weight;
                weighted_edges += 1;
            }
            match edge.similarity_class() {
                Some(SimilarityClass::Identical) => classes.identical += 1,
                Some(SimilarityClass::Similar) => classes.similar += 1,
                Some(SimilarityClass::Different) => classes.different += 1,
                Some(SimilarityClass::Unrelated) => classes.unrelated += 1,
                None => {}
            }
            EdgeView {
                id: edge.id().to_string(),
                source: edge.source().to_string(),
                target: edge.target().to_string(),
                weight: edge.weight(),
                label: edge.label(),
                size: edge.size_hint(),
                layout_weight: edge.layout_weight(),
                class: edge.similarity_class(),
            }
        })
        .collect();

    let mean_weight = (weighted_edges > 0).then(|| weight_sum / weighted_edges as f64);

    GraphView {
        id: graph.id().to_string(),
        title: capitalize_first(graph.id()),
        level,
        topic: graph.topic().map(str::to_string),
        summary: GraphSummary {
            node_count: nodes.len(),
            edge_count: edges.len(),
            weighted_edges,
            mean_weight,
            classes,
        },
        nodes,
        edges,
    }
}

/// A proximity table laid out for display
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub main_language: String,
    pub topic: Option<String>,
    /// Header of the name column ("Topic" or "Word")
    pub key_header: String,
    pub languages: Vec<String>,
    pub rows: Vec<RowView>,
}

/// One display row; `cells` line up with `TableView::languages`
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub name: String,
    pub display_name: String,
    pub is_average: bool,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellView {
    pub language: String,
    pub value: Option<f64>,
    /// Value with three decimals, empty when missing
    pub text: String,
    /// CSS background colour, absent when the cell or its baseline is missing
    pub color: Option<String>,
}

/// Lay out a proximity table, colouring each cell against the AVERAGE row
pub fn table_to_view(table: &ProximityTable, heat: &HeatMapper) -> TableView {
    let languages = table.languages();

    let rows = table
        .rows()
        .iter()
        .map(|row| row_to_view(row, &languages, table, heat))
        .collect();

    TableView {
        main_language: table.main_language().to_string(),
        topic: table.topic().map(str::to_string),
        key_header: table.key_header().to_string(),
        languages: languages.iter().map(|l| l.to_string()).collect(),
        rows,
    }
}

fn row_to_view(
    row: &ProximityRow,
    languages: &[&str],
    table: &ProximityTable,
    heat: &HeatMapper,
) -> RowView {
    let cells = languages
        .iter()
        .map(|&language| {
            let value = row.get(language);
            let color = value
                .zip(table.baseline(language))
                .map(|(v, avg)| heat.rgb_for(v, avg).to_css());
            CellView {
                language: language.to_string(),
                value,
                text: value.map(|v| format!("{:.3}", v)).unwrap_or_default(),
                color,
            }
        })
        .collect();

    RowView {
        name: row.name().to_string(),
        display_name: capitalize_first(row.name()),
        is_average: row.is_average(),
        cells,
    }
}
