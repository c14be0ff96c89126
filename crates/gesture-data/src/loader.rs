//! CSV Sample Table Loader

use crate::error::DataError;
use crate::sample::{SampleRow, SensorTable, CHANNELS_PER_SAMPLE, REQUIRED_COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Provider of one sample table per gesture label
pub trait SampleSource {
    /// Load the table recorded for `label`
    fn load(&self, label: &str) -> Result<SensorTable, DataError>;
}

/// Directory holding one `<label>.csv` per gesture
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    base_path: PathBuf,
}

impl CsvDirectory {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// File the table for `label` is read from
    pub fn path_for(&self, label: &str) -> PathBuf {
        self.base_path.join(format!("{label}.csv"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl SampleSource for CsvDirectory {
    fn load(&self, label: &str) -> Result<SensorTable, DataError> {
        let path = self.path_for(label);
        let source_name = path.display().to_string();
        debug!("Opening sample table {}", source_name);

        let file = File::open(&path).map_err(|e| DataError::unavailable(&source_name, e.to_string()))?;
        let table = read_table(file, &source_name)?;

        info!("Loaded {} samples for gesture '{}'", table.len(), label);
        Ok(table)
    }
}

/// Parse a sample table from CSV text with a header row.
///
/// Required columns are located by name; extra columns are ignored.
pub fn read_table<R: Read>(reader: R, source_name: &str) -> Result<SensorTable, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DataError::unavailable(source_name, format!("unreadable header: {e}")))?
        .clone();
    let columns = locate_columns(&headers, source_name)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::MalformedRow {
            source_name: source_name.to_string(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            column: "<record>".to_string(),
            value: e.to_string(),
        })?;
        rows.push(parse_row(&record, &columns, source_name)?);
    }

    Ok(SensorTable::new(source_name, rows))
}

/// Header positions of the required columns, in `REQUIRED_COLUMNS` order
fn locate_columns(
    headers: &StringRecord,
    source_name: &str,
) -> Result<[usize; CHANNELS_PER_SAMPLE], DataError> {
    let mut positions = [0usize; CHANNELS_PER_SAMPLE];
    let mut missing = Vec::new();

    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h == *name) {
            Some(pos) => positions[slot] = pos,
            None => missing.push(*name),
        }
    }

    if !missing.is_empty() {
        return Err(DataError::unavailable(
            source_name,
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    Ok(positions)
}

fn parse_row(
    record: &StringRecord,
    columns: &[usize; CHANNELS_PER_SAMPLE],
    source_name: &str,
) -> Result<SampleRow, DataError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let mut values = [0.0; CHANNELS_PER_SAMPLE];

    for (slot, &pos) in columns.iter().enumerate() {
        let raw = record.get(pos).unwrap_or("");
        values[slot] = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DataError::MalformedRow {
                source_name: source_name.to_string(),
                line,
                column: REQUIRED_COLUMNS[slot].to_string(),
                value: raw.to_string(),
            })?;
    }

    Ok(SampleRow::from_channels(values))
}
