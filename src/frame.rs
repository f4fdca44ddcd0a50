//! In-memory record table.
//!
//! A [`RecordTable`] keeps its column names in input order and its rows as
//! vectors of optional [`Value`] cells. Column order is significant: every
//! "first match wins" column heuristic scans it front to back.

use std::collections::HashSet;

use anyhow::{Result, ensure};

use crate::data::Value;

pub type Cell = Option<Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            ensure!(seen.insert(column.as_str()), "Duplicate column name '{column}'");
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        ensure!(
            row.len() == self.columns.len(),
            "Row has {} cell(s) but the table has {} column(s)",
            row.len(),
            self.columns.len()
        );
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of `name` in row order, or `None` when the column is absent.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = Option<&'a Value>> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_ref()))
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<()> {
        ensure!(
            values.len() == self.rows.len(),
            "Column '{name}' has {} value(s) but the table has {} row(s)",
            values.len(),
            self.rows.len()
        );
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    pub fn without_columns(&self, names: &[String]) -> RecordTable {
        let keep = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| !names.contains(column))
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();
        RecordTable {
            columns: keep.iter().map(|&idx| self.columns[idx].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&idx| row[idx].clone()).collect())
                .collect(),
        }
    }

    pub fn select_rows(&self, indices: &[usize]) -> RecordTable {
        RecordTable {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&idx| self.rows.get(idx).cloned())
                .collect(),
        }
    }

    pub fn filter_rows<F>(&self, mut keep: F) -> RecordTable
    where
        F: FnMut(&[Cell]) -> bool,
    {
        RecordTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row.as_slice()))
                .cloned()
                .collect(),
        }
    }
}
