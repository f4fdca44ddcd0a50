use serde::Serialize;

use crate::config::AnalysisConfig;

pub const TITLE_COLUMN: &str = "title";
pub const ABSTRACT_COLUMN: &str = "abstract";
pub const YEAR_COLUMN: &str = "year";
pub const ABSTRACT_WORDCOUNT_COLUMN: &str = "abstract_wordcount";

pub fn first_present<'a>(columns: &[String], candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .find(|candidate| columns.contains(candidate))
        .map(String::as_str)
}

pub fn first_containing<'a>(columns: &'a [String], markers: &[String]) -> Option<&'a str> {
    columns
        .iter()
        .find(|column| markers.iter().any(|marker| column.contains(marker.as_str())))
        .map(String::as_str)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub date: Option<String>,
    pub journal: Option<String>,
    pub source: Option<String>,
    pub has_title: bool,
    pub has_abstract: bool,
    pub has_year: bool,
}

impl ColumnRoles {
    pub fn resolve(columns: &[String], config: &AnalysisConfig) -> Self {
        Self {
            date: first_present(columns, &config.date_candidates).map(str::to_string),
            journal: first_containing(columns, &config.journal_markers).map(str::to_string),
            source: first_present(columns, &config.source_candidates).map(str::to_string),
            has_title: columns.iter().any(|c| c == TITLE_COLUMN),
            has_abstract: columns.iter().any(|c| c == ABSTRACT_COLUMN),
            has_year: columns.iter().any(|c| c == YEAR_COLUMN),
        }
    }
}
