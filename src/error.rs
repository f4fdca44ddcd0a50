use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Cannot read {path:?}: {source}")]
    DataAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed delimited text in {path:?}{}: {message}", describe_line(.line))]
    Parse {
        path: PathBuf,
        line: Option<u64>,
        message: String,
    },

    #[error("Invalid configuration in {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Cannot write {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AnalysisError {
    pub(crate) fn data_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AnalysisError::DataAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(
        path: impl Into<PathBuf>,
        line: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        AnalysisError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AnalysisError::Output {
            path: path.into(),
            source,
        }
    }
}

fn describe_line(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}
