//! Query interface for presentation layers
//!
//! [`ProximityService`] owns the catalog for the lifetime of the process and
//! exposes the handful of read-only queries a UI needs: graph listings, topic
//! listings, proximity tables, cell colours and graph records for external
//! rendering. Construct it once at start-up and pass it by reference.

use tracing::info;

use crate::catalog::{CatalogError, GraphCatalog, Level};
use crate::config::ProximityConfig;
use crate::graph::GraphRecord;
use crate::heat::{HeatColor, HeatMapper};
use crate::proximity::{DEFAULT_LANGUAGE_BASELINE, ProximityAggregator, ProximityTable};

#[derive(Debug, Clone)]
pub struct ProximityService {
    catalog: GraphCatalog,
    heat: HeatMapper,
    language_baseline: String,
}

impl ProximityService {
    pub fn new(catalog: GraphCatalog) -> Self {
        Self {
            catalog,
            heat: HeatMapper::default(),
            language_baseline: DEFAULT_LANGUAGE_BASELINE.to_string(),
        }
    }

    /// Load the catalog from the files named by `config`
    pub fn from_config(config: &ProximityConfig) -> Result<Self, CatalogError> {
        let files = config.data_files();
        info!(
            word = %files.word.display(),
            topic = %files.topic.display(),
            language = %files.language.display(),
            "loading graph documents"
        );
        let catalog = GraphCatalog::from_paths(&files.word, &files.topic, &files.language)?;
        Ok(Self::new(catalog)
            .with_heat_mapper(config.heatmap.mapper())
            .with_language_baseline(&config.analysis.language_baseline))
    }

    pub fn with_heat_mapper(mut self, heat: HeatMapper) -> Self {
        self.heat = heat;
        self
    }

    pub fn with_language_baseline(mut self, id: &str) -> Self {
        self.language_baseline = id.to_lowercase();
        self
    }

    pub fn catalog(&self) -> &GraphCatalog {
        &self.catalog
    }

    pub fn heat_mapper(&self) -> &HeatMapper {
        &self.heat
    }

    /// Graph ids of a level, in document order
    pub fn list_graph_ids(&self, level: Level) -> Vec<String> {
        self.catalog.graph_ids(level).map(str::to_string).collect()
    }

    /// Distinct word-level topics, first seen first
    pub fn list_topics(&self) -> Vec<String> {
        self.catalog
            .topics()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn query_proximity(&self, main_language: &str, topic: Option<&str>) -> ProximityTable {
        ProximityAggregator::new(&self.catalog)
            .with_language_baseline(&self.language_baseline)
            .query(main_language, topic)
    }

    pub fn color_for(&self, value: f64, average: f64) -> HeatColor {
        self.heat.color_for(value, average)
    }

    /// Graph record for an external renderer, `None` when unknown
    pub fn get_graph_record(&self, id: &str, level: Level) -> Option<&GraphRecord> {
        self.catalog.find(id, level)
    }
}
