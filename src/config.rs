//! Analysis configuration.
//!
//! Every knob has a built-in default matching the stock bibliographic-metadata
//! layout (CORD-19 style `metadata.csv`). A YAML file may override any subset
//! of the fields; unknown keys are rejected so typos do not silently fall back
//! to defaults.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

pub const DEFAULT_DATE_CANDIDATES: &[&str] = &[
    "publish_time",
    "publish_time_updated",
    "publish_date",
    "publish_time_str",
];
pub const DEFAULT_JOURNAL_MARKERS: &[&str] = &["journal", "source"];
pub const DEFAULT_SOURCE_CANDIDATES: &[&str] = &["source_x", "source", "publish_source"];
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "of", "in", "to", "a", "for", "on", "with", "by", "from", "is", "that", "as",
    "are", "an", "be", "this", "we", "s", "study", "studies", "using", "use",
];
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Date columns tried in order; the first present one feeds `year`.
    pub date_candidates: Vec<String>,
    /// Substrings marking a journal/source column, matched against column
    /// names in table order.
    pub journal_markers: Vec<String>,
    /// Source columns tried in order for the source distribution.
    pub source_candidates: Vec<String>,
    pub stopwords: Vec<String>,
    pub short_token_len: usize,
    pub drop_threshold: f64,
    pub sparse_threshold: f64,
    pub audit_report_size: usize,
    pub top_journals: usize,
    pub top_sources: usize,
    pub top_words: usize,
    pub sample_fraction: f64,
    pub seed: u64,
    pub unknown_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            date_candidates: to_owned_list(DEFAULT_DATE_CANDIDATES),
            journal_markers: to_owned_list(DEFAULT_JOURNAL_MARKERS),
            source_candidates: to_owned_list(DEFAULT_SOURCE_CANDIDATES),
            stopwords: to_owned_list(DEFAULT_STOPWORDS),
            short_token_len: 2,
            drop_threshold: 0.98,
            sparse_threshold: 0.8,
            audit_report_size: 30,
            top_journals: 20,
            top_sources: 20,
            top_words: 30,
            sample_fraction: 0.2,
            seed: 1,
            unknown_label: UNKNOWN_LABEL.to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let raw = fs::read_to_string(path).map_err(|err| AnalysisError::data_access(path, err))?;
        let config: AnalysisConfig =
            serde_yaml::from_str(&raw).map_err(|err| AnalysisError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        config.validate().map_err(|message| AnalysisError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AnalysisError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("drop_threshold", self.drop_threshold),
            ("sparse_threshold", self.sparse_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be between 0 and 1 (got {value})"));
            }
        }
        if !(self.sample_fraction > 0.0 && self.sample_fraction <= 1.0) {
            return Err(format!(
                "sample_fraction must be in (0, 1] (got {})",
                self.sample_fraction
            ));
        }
        if self.unknown_label.is_empty() {
            return Err("unknown_label cannot be empty".to_string());
        }
        Ok(())
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
