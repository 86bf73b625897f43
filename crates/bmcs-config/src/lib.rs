//! Configuration loading for BmCS.
//! Reads bmcs.toml from the current directory or the path in the BMCS_CONFIG env var.
//!
//! Relative paths in the file are resolved against the directory holding it.

use std::path::{Path, PathBuf};

use bmcs_common::{BmcsError, GroupCutoffs, ThresholdConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}\nCopy bmcs.example.toml to bmcs.toml and edit it.")]
    NotFound(PathBuf),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for BmcsError {
    fn from(e: ConfigError) -> Self {
        BmcsError::Config(e.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub journals: JournalsConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub datasets: DatasetsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_combined")]
    pub combined: GroupCutoffs,
    #[serde(default = "default_precision")]
    pub precision: f64,
    #[serde(default = "default_voting")]
    pub voting: GroupCutoffs,
    #[serde(default = "default_cnn")]
    pub cnn: GroupCutoffs,
}

fn default_combined()  -> GroupCutoffs { ThresholdConfig::default().combined }
fn default_precision() -> f64          { ThresholdConfig::default().precision }
fn default_voting()    -> GroupCutoffs { ThresholdConfig::default().voting }
fn default_cnn()       -> GroupCutoffs { ThresholdConfig::default().cnn }

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            combined: default_combined(),
            precision: default_precision(),
            voting: default_voting(),
            cnn: default_cnn(),
        }
    }
}

impl ThresholdsConfig {
    pub fn to_thresholds(&self) -> ThresholdConfig {
        ThresholdConfig {
            combined: self.combined,
            precision: self.precision,
            voting: self.voting,
            cnn: self.cnn,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalsConfig {
    #[serde(default = "default_selectively_indexed")]
    pub selectively_indexed: PathBuf,
    #[serde(default = "default_misindexed")]
    pub misindexed: PathBuf,
    #[serde(default = "default_groups")]
    pub groups: PathBuf,
}

fn default_selectively_indexed() -> PathBuf { PathBuf::from("config/selectively_indexed_id_mapping.json") }
fn default_misindexed()          -> PathBuf { PathBuf::from("config/misindexed_journal_ids.json") }
fn default_groups()              -> PathBuf { PathBuf::from("config/group_ids.json") }

impl Default for JournalsConfig {
    fn default() -> Self {
        Self {
            selectively_indexed: default_selectively_indexed(),
            misindexed: default_misindexed(),
            groups: default_groups(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_journal_ids")]
    pub journal_ids: PathBuf,
    #[serde(default = "default_word_indices")]
    pub word_indices: PathBuf,
}

fn default_journal_ids()  -> PathBuf { PathBuf::from("models/journal_ids.txt") }
fn default_word_indices() -> PathBuf { PathBuf::from("models/word_indices.txt") }

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self { journal_ids: default_journal_ids(), word_indices: default_word_indices() }
    }
}

/// How the two model artifacts are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelBackend {
    /// Spawn a runner process per model.
    #[default]
    Command,
    /// Artifacts are precomputed `pmid\tscore` tables.
    ScoreTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub backend: ModelBackend,
    /// argv of the CNN runner; the artifact path is appended.
    #[serde(default = "default_cnn_runner")]
    pub cnn_runner: Vec<String>,
    /// argv of the voting-ensemble runner; the artifact path is appended.
    #[serde(default = "default_voting_runner")]
    pub voting_runner: Vec<String>,
}

fn default_cnn_runner()    -> Vec<String> { vec!["bmcs-cnn-runner".to_string()] }
fn default_voting_runner() -> Vec<String> { vec!["bmcs-voting-runner".to_string()] }

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            cnn_runner: default_cnn_runner(),
            voting_runner: default_voting_runner(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetsConfig {
    #[serde(default = "default_validation_set")]
    pub validation: PathBuf,
    #[serde(default = "default_test_set")]
    pub test: PathBuf,
}

fn default_validation_set() -> PathBuf { PathBuf::from("datasets/validation_set.json.gz") }
fn default_test_set()       -> PathBuf { PathBuf::from("datasets/test_set.json.gz") }

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self { validation: default_validation_set(), test: default_test_set() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_destination")]
    pub destination: PathBuf,
}

fn default_destination() -> PathBuf { PathBuf::from("./") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self { destination: default_destination() }
    }
}


impl Config {
    /// Load configuration from bmcs.toml.
    /// Checks BMCS_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("BMCS_CONFIG")
            .unwrap_or_else(|_| "bmcs.toml".to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let mut config = Self::from_toml_str(&content)
            .map_err(|e| match e {
                ConfigError::Parse { source, .. } => ConfigError::Parse { path: path.to_path_buf(), source },
                other => other,
            })?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse and validate a configuration document. Paths are left as written.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)
            .map_err(|source| ConfigError::Parse { path: PathBuf::new(), source })?;
        config
            .thresholds
            .to_thresholds()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Resolve every relative resource path against `base`.
    pub fn rebase(&mut self, base: &Path) {
        let paths = [
            &mut self.journals.selectively_indexed,
            &mut self.journals.misindexed,
            &mut self.journals.groups,
            &mut self.features.journal_ids,
            &mut self.features.word_indices,
            &mut self.datasets.validation,
            &mut self.datasets.test,
        ];
        for p in paths {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    pub fn thresholds(&self) -> ThresholdConfig {
        self.thresholds.to_thresholds()
    }
}
