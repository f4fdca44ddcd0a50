use std::{fs::File, io, path::Path};

use rand::{SeedableRng, rngs::StdRng, seq::index};

use crate::{
    data::cell_to_field,
    error::AnalysisError,
    frame::RecordTable,
    io_utils,
};

pub fn sample_size(total: usize, fraction: f64) -> usize {
    let wanted = (fraction.clamp(0.0, 1.0) * total as f64).round_ties_even();
    (wanted as usize).min(total)
}

pub fn random_rows(table: &RecordTable, amount: usize, seed: u64) -> RecordTable {
    let total = table.row_count();
    let amount = amount.min(total);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, total, amount).into_vec();
    picked.sort_unstable();
    table.select_rows(&picked)
}

pub fn sample_fraction(table: &RecordTable, fraction: f64, seed: u64) -> RecordTable {
    random_rows(table, sample_size(table.row_count(), fraction), seed)
}

pub fn write_table(table: &RecordTable, path: &Path) -> Result<(), AnalysisError> {
    let file = File::create(path).map_err(|err| AnalysisError::output(path, err))?;
    let mut writer = io_utils::open_csv_writer(file);
    let to_output = |err: csv::Error| AnalysisError::output(path, io::Error::from(err));
    writer.write_record(table.columns()).map_err(to_output)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell_to_field(cell.as_ref())))
            .map_err(to_output)?;
    }
    writer
        .flush()
        .map_err(|err| AnalysisError::output(path, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn numbered(rows: usize) -> RecordTable {
        let mut table = RecordTable::new(vec!["id".into()]).unwrap();
        for idx in 0..rows {
            table.push_row(vec![Some(Value::Integer(idx as i64))]).unwrap();
        }
        table
    }

    #[test]
    fn sample_size_rounds_half_to_even() {
        assert_eq!(sample_size(10, 0.2), 2);
        assert_eq!(sample_size(3, 0.5), 2);
        assert_eq!(sample_size(5, 0.5), 2);
        assert_eq!(sample_size(7, 0.2), 1);
        assert_eq!(sample_size(0, 0.2), 0);
        assert_eq!(sample_size(4, 1.0), 4);
    }

    #[test]
    fn random_rows_is_reproducible_and_ordered() {
        let table = numbered(50);
        let first = random_rows(&table, 10, 7);
        let second = random_rows(&table, 10, 7);
        assert_eq!(first, second);
        assert_eq!(first.row_count(), 10);
        let ids = first
            .column_values("id")
            .unwrap()
            .filter_map(|cell| cell.and_then(Value::as_integer))
            .collect::<Vec<_>>();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn random_rows_caps_at_table_size() {
        let table = numbered(3);
        assert_eq!(random_rows(&table, 50, 1).row_count(), 3);
    }

    #[test]
    fn written_sample_keeps_field_text() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "title,arxiv_id,journal\nA,2004.03120,1.50\nB,1e5,J\n").unwrap();
        let table =
            crate::loader::load_table(&input, &crate::loader::LoadOptions::default()).unwrap();
        let output = dir.path().join("out.csv");
        write_table(&table, &output).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "\"title\",\"arxiv_id\",\"journal\"\n\"A\",\"2004.03120\",\"1.50\"\n\"B\",\"1e5\",\"J\"\n"
        );
    }

    #[test]
    fn write_table_leaves_missing_cells_empty() {
        let mut table = RecordTable::new(vec!["title".into(), "year".into()]).unwrap();
        table
            .push_row(vec![Some(Value::String("A, B".into())), None])
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&table, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "\"title\",\"year\"\n\"A, B\",\"\"\n");
    }
}
