use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    columns::YEAR_COLUMN,
    data::Value,
    frame::RecordTable,
};

pub type YearHistogram = BTreeMap<i64, usize>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedLabel {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    entries: Vec<RankedLabel>,
}

impl Ranking {
    pub fn entries(&self) -> &[RankedLabel] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.count)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

#[derive(Debug, Default)]
pub struct FrequencyCounter {
    counts: HashMap<String, (usize, usize)>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str) {
        let next = self.counts.len();
        if let Some((count, _)) = self.counts.get_mut(label) {
            *count += 1;
        } else {
            self.counts.insert(label.to_string(), (1, next));
        }
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn into_ranking(self, top: usize) -> Ranking {
        let mut entries = self
            .counts
            .into_iter()
            .sorted_by(|a, b| b.1.0.cmp(&a.1.0).then_with(|| a.1.1.cmp(&b.1.1)))
            .map(|(label, (count, _))| RankedLabel { label, count })
            .collect::<Vec<_>>();
        if top > 0 && entries.len() > top {
            entries.truncate(top);
        }
        Ranking { entries }
    }
}

pub fn cell_label(cell: Option<&Value>, unknown: &str) -> String {
    match cell {
        Some(value) => value.as_display(),
        None => unknown.to_string(),
    }
}

pub fn year_histogram(table: &RecordTable) -> YearHistogram {
    let mut histogram = YearHistogram::new();
    if let Some(values) = table.column_values(YEAR_COLUMN) {
        for year in values.filter_map(|cell| cell.and_then(Value::as_integer)) {
            *histogram.entry(year).or_insert(0) += 1;
        }
    }
    histogram
}

pub fn label_ranking(table: &RecordTable, column: &str, unknown: &str, top: usize) -> Ranking {
    let mut counter = FrequencyCounter::new();
    if let Some(values) = table.column_values(column) {
        for cell in values {
            counter.add(&cell_label(cell, unknown));
        }
    }
    counter.into_ranking(top)
}

pub fn distinct_labels(table: &RecordTable, column: &str, unknown: &str) -> Vec<String> {
    table
        .column_values(column)
        .map(|values| {
            values
                .map(|cell| cell_label(cell, unknown))
                .unique()
                .sorted()
                .collect()
        })
        .unwrap_or_default()
}
