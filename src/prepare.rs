//! Dataset preparation: derived columns, missing-value audit, cleaning, and
//! aggregate artifacts.
//!
//! [`prepare`] is a pure function of the raw table and an
//! [`AnalysisConfig`]. Missing optional columns never fail the run; each
//! dependent step is skipped and logged instead.

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    columns::{ABSTRACT_COLUMN, ABSTRACT_WORDCOUNT_COLUMN, ColumnRoles, YEAR_COLUMN},
    config::AnalysisConfig,
    data::{Value, publication_year},
    frame::{Cell, RecordTable},
    frequency::{Ranking, YearHistogram, label_ranking, year_histogram},
    words::{TitleTokenizer, top_title_words},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub fraction: f64,
}

/// Missing fraction per column, most-missing first. Ties keep table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MissingAudit {
    entries: Vec<ColumnMissing>,
}

impl MissingAudit {
    pub fn compute(table: &RecordTable) -> Self {
        let rows = table.row_count();
        let mut missing = vec![0usize; table.column_count()];
        for row in table.rows() {
            for (idx, cell) in row.iter().enumerate() {
                if cell.is_none() {
                    missing[idx] += 1;
                }
            }
        }
        let mut entries = table
            .columns()
            .iter()
            .zip(missing)
            .map(|(column, count)| ColumnMissing {
                column: column.clone(),
                fraction: if rows == 0 {
                    0.0
                } else {
                    count as f64 / rows as f64
                },
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.fraction.total_cmp(&a.fraction));
        Self { entries }
    }

    pub fn entries(&self) -> &[ColumnMissing] {
        &self.entries
    }

    pub fn top(&self, n: usize) -> &[ColumnMissing] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn fraction(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.column == column)
            .map(|entry| entry.fraction)
    }

    /// Columns whose missing fraction strictly exceeds `threshold`.
    pub fn above(&self, threshold: f64) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.fraction > threshold)
            .map(|entry| entry.column.clone())
            .collect()
    }
}

pub fn drop_sparse_columns(table: &RecordTable, threshold: f64) -> (RecordTable, Vec<String>) {
    let audit = MissingAudit::compute(table);
    let sparse = audit.above(threshold);
    let dropped = table
        .columns()
        .iter()
        .filter(|column| sparse.contains(column))
        .cloned()
        .collect::<Vec<_>>();
    (table.without_columns(&dropped), dropped)
}

pub fn derive_years(table: &RecordTable, date_column: &str) -> Vec<Cell> {
    match table.column_values(date_column) {
        Some(values) => values
            .map(|cell| publication_year(cell).map(Value::Integer))
            .collect(),
        None => vec![None; table.row_count()],
    }
}

pub fn derive_abstract_wordcounts(table: &RecordTable) -> Vec<Cell> {
    match table.column_values(ABSTRACT_COLUMN) {
        Some(values) => values
            .map(|cell| {
                let words = cell
                    .map(|value| value.as_display().split_whitespace().count())
                    .unwrap_or(0);
                Some(Value::Integer(words as i64))
            })
            .collect(),
        None => vec![None; table.row_count()],
    }
}

#[derive(Debug, Clone)]
pub struct Preparation {
    pub cleaned: RecordTable,
    pub raw_rows: usize,
    pub raw_columns: usize,
    pub audit: MissingAudit,
    pub sparse: Vec<String>,
    pub dropped: Vec<String>,
    pub date_column: Option<String>,
    pub roles: ColumnRoles,
    pub years: YearHistogram,
    pub top_journals: Ranking,
    pub top_sources: Ranking,
    pub top_words: Ranking,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreparationSummary<'a> {
    pub raw_rows: usize,
    pub raw_columns: usize,
    pub cleaned_columns: &'a [String],
    pub date_column: Option<&'a str>,
    pub journal_column: Option<&'a str>,
    pub source_column: Option<&'a str>,
    pub missing: &'a [ColumnMissing],
    pub sparse: &'a [String],
    pub dropped: &'a [String],
    pub years: &'a YearHistogram,
    pub top_journals: &'a Ranking,
    pub top_sources: &'a Ranking,
    pub top_words: &'a Ranking,
}

impl Preparation {
    pub fn summary(&self, audit_size: usize) -> PreparationSummary<'_> {
        PreparationSummary {
            raw_rows: self.raw_rows,
            raw_columns: self.raw_columns,
            cleaned_columns: self.cleaned.columns(),
            date_column: self.date_column.as_deref(),
            journal_column: self.roles.journal.as_deref(),
            source_column: self.roles.source.as_deref(),
            missing: self.audit.top(audit_size),
            sparse: &self.sparse,
            dropped: &self.dropped,
            years: &self.years,
            top_journals: &self.top_journals,
            top_sources: &self.top_sources,
            top_words: &self.top_words,
        }
    }

    pub fn year_span(&self) -> Option<(i64, i64)> {
        let first = self.years.keys().next()?;
        let last = self.years.keys().next_back()?;
        Some((*first, *last))
    }
}

pub fn prepare(raw: RecordTable, config: &AnalysisConfig) -> Preparation {
    let raw_rows = raw.row_count();
    let raw_columns = raw.column_count();
    let mut table = raw;

    let raw_roles = ColumnRoles::resolve(table.columns(), config);
    let date_column = raw_roles.date.clone();
    match &date_column {
        Some(column) => {
            info!("Using date column: {column}");
            let years = derive_years(&table, column);
            let unparsed = table
                .column_values(column)
                .into_iter()
                .flatten()
                .zip(&years)
                .filter(|(raw, year)| raw.is_some() && year.is_none())
                .count();
            if unparsed > 0 {
                warn!("{unparsed} value(s) in '{column}' could not be parsed as dates");
            }
            set_derived(&mut table, YEAR_COLUMN, years);
        }
        None => info!(
            "No obvious date column found. Columns available: {:?}",
            table.columns()
        ),
    }

    if !raw_roles.has_abstract {
        info!("No '{ABSTRACT_COLUMN}' column; {ABSTRACT_WORDCOUNT_COLUMN} will be empty");
    }
    let wordcounts = derive_abstract_wordcounts(&table);
    set_derived(&mut table, ABSTRACT_WORDCOUNT_COLUMN, wordcounts);

    let audit = MissingAudit::compute(&table);
    for entry in audit.top(config.audit_report_size) {
        debug!("missing {:>6.2}%  {}", entry.fraction * 100.0, entry.column);
    }
    let sparse = audit.above(config.sparse_threshold);
    info!(
        "Columns with >{:.0}% missing: {:?}",
        config.sparse_threshold * 100.0,
        sparse
    );
    let (cleaned, dropped) = drop_sparse_columns(&table, config.drop_threshold);
    info!("Dropping columns: {dropped:?}");

    let roles = ColumnRoles::resolve(cleaned.columns(), config);

    let years = year_histogram(&cleaned);
    if let (Some(first), Some(last)) = (years.keys().next(), years.keys().next_back()) {
        info!("Years range: {first} - {last}");
    }

    info!("Journal/source column selected: {:?}", roles.journal);
    let top_journals = match &roles.journal {
        Some(column) => label_ranking(&cleaned, column, &config.unknown_label, config.top_journals),
        None => Ranking::default(),
    };

    let top_sources = match &roles.source {
        Some(column) => label_ranking(&cleaned, column, &config.unknown_label, config.top_sources),
        None => {
            info!("No source column found; skipping source distribution");
            Ranking::default()
        }
    };

    let top_words = if roles.has_title {
        top_title_words(
            &cleaned,
            &TitleTokenizer::from_config(config),
            config.top_words,
        )
    } else {
        info!("No 'title' column; skipping title word frequencies");
        Ranking::default()
    };

    Preparation {
        cleaned,
        raw_rows,
        raw_columns,
        audit,
        sparse,
        dropped,
        date_column,
        roles,
        years,
        top_journals,
        top_sources,
        top_words,
    }
}

fn set_derived(table: &mut RecordTable, name: &str, values: Vec<Cell>) {
    // Derived vectors are built from the same table, so the lengths always agree.
    if let Err(err) = table.set_column(name, values) {
        warn!("Skipping derived column '{name}': {err}");
    }
}
