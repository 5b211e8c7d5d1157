//! # language-proximity - Multi-level Language Proximity Graphs
//!
//! A library for loading lexical proximity graphs between languages and
//! deriving heat-mapped comparison tables from them.
//!
//! ## Overview
//!
//! Proximity is measured at three granularities:
//!
//! 1. **Word** - one graph per word, nodes like `dog_en`, `perro_es`
//! 2. **Topic** - one graph per topic, nodes like `animal_en`
//! 3. **Language** - corpus-wide graphs keyed by bare language codes
//!
//! Edge weights are similarities in `[0, 1]` (1.0 = identical words).
//!
//! ## Usage
//!
//! ```bash
//! # Proximity of English to every other language, per topic
//! language-proximity table --lang en
//!
//! # Per word, within one topic, with heat-map colours
//! language-proximity table --lang en --topic animal --color
//!
//! # Renderer data for one graph
//! language-proximity graph animal --level topic
//! ```
//!
//! ## Heat Map
//!
//! Each cell is compared with the `AVERAGE` row of its column:
//! ```text
//! norm = clamp((value - average) / max(average, 1 - average), -1, 1)
//! ```
//!
//! - Below average = blue, fading to white
//! - At average = white
//! - Above average = white, deepening to orange

pub mod catalog;
pub mod config;
pub mod entity;
pub mod graph;
pub mod heat;
pub mod loader;
pub mod proximity;
pub mod report;
pub mod service;
pub mod view;

pub use catalog::{CatalogError, GraphCatalog, Level, ParseLevelError};
pub use config::{
    AnalysisConfig, ConfigError, DataConfig, DataFiles, HeatmapConfig, ProximityConfig,
    find_config_file, load_config, load_config_file,
};
pub use entity::{EntityId, capitalize_first};
pub use graph::{Edge, GraphError, GraphRecord, Node, SimilarityClass, layout_weight, size_hint};
pub use heat::{COOL_HUE, HeatColor, HeatMapper, Rgb, WARM_HUE};
pub use loader::{GraphMap, LoadError, load, load_file, load_str};
pub use proximity::{
    AVERAGE_ROW, DEFAULT_LANGUAGE_BASELINE, ProximityAggregator, ProximityRow, ProximityTable,
};
pub use report::{write_json, write_list, write_table, write_table_json};
pub use service::ProximityService;
pub use view::{
    CellView, ClassCounts, EdgeView, GraphSummary, GraphView, NodeView, RowView, TableView,
    graph_to_view, table_to_view,
};
