#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bibliometa::{
    config::AnalysisConfig,
    data::parse_cell,
    frame::RecordTable,
};
use tempfile::{TempDir, tempdir};

/// Absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(relative)).expect("read workspace file")
    }
}

/// Builds a table from string literals; `None` and empty strings are missing.
pub fn table_from(columns: &[&str], rows: &[Vec<Option<&str>>]) -> RecordTable {
    let mut table = RecordTable::new(columns.iter().map(|c| c.to_string()).collect())
        .expect("distinct columns");
    for row in rows {
        table
            .push_row(row.iter().map(|cell| cell.and_then(parse_cell)).collect())
            .expect("row width");
    }
    table
}

pub fn default_config() -> AnalysisConfig {
    AnalysisConfig::default()
}
