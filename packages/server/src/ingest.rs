//! CSV validation and normalization for equipment uploads.
//!
//! Parsing is pure: nothing here touches the database. Callers collect every
//! row with [`normalize_all`] before persisting, so a bad row anywhere in the
//! file rejects the whole upload.

use common::equipment::{
    COL_EQUIPMENT_NAME, COL_FLOWRATE, COL_PRESSURE, COL_TEMPERATURE, COL_TYPE,
};
use common::REQUIRED_COLUMNS;
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required columns {missing:?} (found {found:?})")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("{0}")]
    Malformed(String),

    #[error("row {row}: invalid {column} value {value:?}: {reason}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("file contains a header but no data rows")]
    Empty,
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Malformed(err.to_string())
    }
}

/// One validated measurement row, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRow {
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: i32,
    pub pressure: f64,
    pub temperature: i32,
}

/// Positions of the required columns within a record.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    kind: usize,
    flowrate: usize,
    pressure: usize,
    temperature: usize,
}

/// A CSV whose header passed validation. Rows are coerced lazily.
pub struct NormalizedCsv<'a> {
    columns: Vec<String>,
    index: ColumnIndex,
    reader: csv::Reader<&'a [u8]>,
}

impl<'a> NormalizedCsv<'a> {
    /// Trimmed header names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Typed rows in file order. Each item fails independently; the first
    /// error is where an all-or-nothing caller should stop.
    pub fn rows(self) -> impl Iterator<Item = Result<EquipmentRow, IngestError>> + 'a {
        let index = self.index;
        self.reader
            .into_records()
            .enumerate()
            .map(move |(i, record)| coerce_row(i + 1, &record?, index))
    }
}

/// Parse the header row and check that every required column is present.
pub fn normalize(input: &[u8]) -> Result<NormalizedCsv<'_>, IngestError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(false)
        .from_reader(input);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(IngestError::Malformed(
            "no columns to parse from file".into(),
        ));
    }

    let position = |name: &str| columns.iter().position(|c| c == name);
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| position(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            missing,
            found: columns,
        });
    }

    // Presence was checked above.
    let index = ColumnIndex {
        name: position(COL_EQUIPMENT_NAME).unwrap_or_default(),
        kind: position(COL_TYPE).unwrap_or_default(),
        flowrate: position(COL_FLOWRATE).unwrap_or_default(),
        pressure: position(COL_PRESSURE).unwrap_or_default(),
        temperature: position(COL_TEMPERATURE).unwrap_or_default(),
    };

    Ok(NormalizedCsv {
        columns,
        index,
        reader,
    })
}

/// Validate and coerce the whole file, failing on the first bad row.
pub fn normalize_all(input: &[u8]) -> Result<Vec<EquipmentRow>, IngestError> {
    let rows = normalize(input)?
        .rows()
        .collect::<Result<Vec<_>, _>>()?;
    if rows.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(rows)
}

fn coerce_row(
    row: usize,
    record: &StringRecord,
    index: ColumnIndex,
) -> Result<EquipmentRow, IngestError> {
    Ok(EquipmentRow {
        equipment_name: text_field(row, record, index.name, COL_EQUIPMENT_NAME)?,
        equipment_type: text_field(row, record, index.kind, COL_TYPE)?,
        flowrate: int_field(row, record, index.flowrate, COL_FLOWRATE)?,
        pressure: float_field(row, record, index.pressure, COL_PRESSURE)?,
        temperature: int_field(row, record, index.temperature, COL_TEMPERATURE)?,
    })
}

fn cell<'r>(
    row: usize,
    record: &'r StringRecord,
    pos: usize,
    column: &'static str,
) -> Result<&'r str, IngestError> {
    match record.get(pos) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(IngestError::InvalidValue {
            row,
            column,
            value: String::new(),
            reason: "value is empty".into(),
        }),
    }
}

fn text_field(
    row: usize,
    record: &StringRecord,
    pos: usize,
    column: &'static str,
) -> Result<String, IngestError> {
    cell(row, record, pos, column).map(str::to_string)
}

/// Integers may also be written as floats with no fractional part (`10.0`).
fn int_field(
    row: usize,
    record: &StringRecord,
    pos: usize,
    column: &'static str,
) -> Result<i32, IngestError> {
    let raw = cell(row, record, pos, column)?;
    if let Ok(value) = raw.parse::<i32>() {
        return Ok(value);
    }

    let invalid = |reason: &str| IngestError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: f64 = raw.parse().map_err(|_| invalid("expected an integer"))?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(invalid("expected an integer"));
    }
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(invalid("integer out of range"));
    }
    Ok(value as i32)
}

fn float_field(
    row: usize,
    record: &StringRecord,
    pos: usize,
    column: &'static str,
) -> Result<f64, IngestError> {
    let raw = cell(row, record, pos, column)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(IngestError::InvalidValue {
            row,
            column,
            value: raw.to_string(),
            reason: "expected a finite number".into(),
        }),
        Err(_) => Err(IngestError::InvalidValue {
            row,
            column,
            value: raw.to_string(),
            reason: "expected a number".into(),
        }),
    }
}
