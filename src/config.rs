//! Configuration file support
//!
//! This module handles parsing `.proximity.toml` configuration files that
//! point at the three graph documents and tune the analysis defaults.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .proximity.toml
//!
//! [data]
//! # Graph documents, relative to the directory holding this file
//! word = "data/analysis/word_distance.json"
//! topic = "data/analysis/topic_proximity.json"
//! language = "data/analysis/global_proximity.json"
//!
//! [analysis]
//! # Language the tables are computed for when none is given
//! main_language = "en"
//!
//! # Languages offered for selection
//! languages = ["en", "es", "fr", "pl"]
//!
//! # Language-level graph used as the baseline of unfiltered tables
//! language_baseline = "language"
//!
//! [heatmap]
//! # Hues (degrees) for below- and above-average cells
//! cool_hue = 210.0
//! warm_hue = 30.0
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::heat::{COOL_HUE, HeatMapper, WARM_HUE};
use crate::proximity::DEFAULT_LANGUAGE_BASELINE;

/// File names searched for, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = [".proximity.toml", "proximity.toml"];

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Locations of the three graph documents
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_word_path")]
    pub word: PathBuf,

    #[serde(default = "default_topic_path")]
    pub topic: PathBuf,

    #[serde(default = "default_language_path")]
    pub language: PathBuf,
}

fn default_word_path() -> PathBuf {
    PathBuf::from("data/analysis/word_distance.json")
}

fn default_topic_path() -> PathBuf {
    PathBuf::from("data/analysis/topic_proximity.json")
}

fn default_language_path() -> PathBuf {
    PathBuf::from("data/analysis/global_proximity.json")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            word: default_word_path(),
            topic: default_topic_path(),
            language: default_language_path(),
        }
    }
}

impl DataConfig {
    /// Resolve relative paths against `base`
    pub fn resolve(&self, base: &Path) -> DataFiles {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        DataFiles {
            word: join(&self.word),
            topic: join(&self.topic),
            language: join(&self.language),
        }
    }
}

/// Resolved paths of the three graph documents
#[derive(Debug, Clone, PartialEq)]
pub struct DataFiles {
    pub word: PathBuf,
    pub topic: PathBuf,
    pub language: PathBuf,
}

/// Analysis defaults section
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_main_language")]
    pub main_language: String,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    #[serde(default = "default_language_baseline")]
    pub language_baseline: String,
}

fn default_main_language() -> String {
    "en".to_string()
}

fn default_languages() -> Vec<String> {
    ["en", "es", "fr", "pl"].map(String::from).to_vec()
}

fn default_language_baseline() -> String {
    DEFAULT_LANGUAGE_BASELINE.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            main_language: default_main_language(),
            languages: default_languages(),
            language_baseline: default_language_baseline(),
        }
    }
}

/// Heat-map colour section
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HeatmapConfig {
    #[serde(default = "default_cool_hue")]
    pub cool_hue: f64,

    #[serde(default = "default_warm_hue")]
    pub warm_hue: f64,
}

fn default_cool_hue() -> f64 {
    COOL_HUE
}

fn default_warm_hue() -> f64 {
    WARM_HUE
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            cool_hue: default_cool_hue(),
            warm_hue: default_warm_hue(),
        }
    }
}

impl HeatmapConfig {
    pub fn mapper(&self) -> HeatMapper {
        HeatMapper::new(self.cool_hue, self.warm_hue)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProximityConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub heatmap: HeatmapConfig,

    /// Directory relative data paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl ProximityConfig {
    /// Parse a configuration string, resolving data paths against `base_dir`
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: ProximityConfig = toml::from_str(content)?;
        config.base_dir = base_dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at `base_dir`
    pub fn with_base_dir(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, hue) in [
            ("cool_hue", self.heatmap.cool_hue),
            ("warm_hue", self.heatmap.warm_hue),
        ] {
            if !(0.0..360.0).contains(&hue) {
                return Err(ConfigError::Invalid(format!(
                    "heatmap.{} must be in [0, 360), got {}",
                    name, hue
                )));
            }
        }
        if self.analysis.main_language.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "analysis.main_language must not be empty".to_string(),
            ));
        }
        if self.analysis.language_baseline.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "analysis.language_baseline must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Data file paths resolved against the base directory
    pub fn data_files(&self) -> DataFiles {
        self.data.resolve(&self.base_dir)
    }
}

/// Load configuration for a directory
///
/// Searches for `.proximity.toml` in the given directory and parent directories.
/// Without a file, defaults rooted at `start_path` are returned.
pub fn load_config(start_path: &Path) -> Result<ProximityConfig, ConfigError> {
    match find_config_file(start_path) {
        Some(path) => load_config_file(&path),
        None => {
            debug!(start = %start_path.display(), "no config file found, using defaults");
            let base = if start_path.is_file() {
                start_path.parent().unwrap_or(start_path)
            } else {
                start_path
            };
            Ok(ProximityConfig::with_base_dir(base))
        }
    }
}

/// Load a specific configuration file
pub fn load_config_file(path: &Path) -> Result<ProximityConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    debug!(path = %path.display(), "loaded config file");
    ProximityConfig::from_toml(&content, base)
}

/// Find the config file by searching up the directory tree
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let mut current = if start_path.is_file() {
        start_path.parent()?.to_path_buf()
    } else {
        start_path.to_path_buf()
    };

    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // Move to parent directory
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    None
}
