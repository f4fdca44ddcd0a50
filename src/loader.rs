use std::{fs::File, io::BufReader, path::Path};

use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::parse_cell,
    error::AnalysisError,
    frame::RecordTable,
    io_utils,
};

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    /// Keep only the first N data rows.
    pub row_limit: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            row_limit: None,
        }
    }
}

pub fn load_table(path: &Path, options: &LoadOptions) -> Result<RecordTable, AnalysisError> {
    let file = File::open(path).map_err(|err| AnalysisError::data_access(path, err))?;
    let mut reader = io_utils::open_csv_reader(BufReader::new(file), options.delimiter);

    let header_record = reader
        .byte_headers()
        .map_err(|err| classify_csv_error(path, err))?
        .clone();
    if header_record.is_empty() {
        return Err(AnalysisError::parse(path, Some(1), "missing header row"));
    }
    let headers = io_utils::decode_record(&header_record, options.encoding)
        .map_err(|err| AnalysisError::parse(path, Some(1), format!("{err:#}")))?;
    let mut table = RecordTable::new(headers)
        .map_err(|err| AnalysisError::parse(path, Some(1), err.to_string()))?;
    let mut record = csv::ByteRecord::new();
    loop {
        if let Some(limit) = options.row_limit
            && table.row_count() >= limit
        {
            debug!("Row limit {limit} reached for {path:?}");
            break;
        }
        let more = reader
            .read_byte_record(&mut record)
            .map_err(|err| classify_csv_error(path, err))?;
        if !more {
            break;
        }
        let line = record.position().map(|p| p.line());
        let fields = io_utils::decode_record(&record, options.encoding)
            .map_err(|err| AnalysisError::parse(path, line, format!("{err:#}")))?;
        table
            .push_row(fields.iter().map(|field| parse_cell(field)).collect())
            .map_err(|err| AnalysisError::parse(path, line, err.to_string()))?;
    }
    debug!(
        "Loaded {} row(s) x {} column(s) from {path:?}",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

fn classify_csv_error(path: &Path, err: csv::Error) -> AnalysisError {
    let line = err.position().map(|p| p.line());
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => AnalysisError::data_access(path, source),
        _ => AnalysisError::parse(path, line, message),
    }
}
