//! File encodings a table can be read from and written to
//!
//! Each [`Encoding`] is a decode/encode pair over raw bytes. The encoding is
//! chosen once from the file suffix; nothing else about the file is inspected.

use crate::error::{Error, Result, Role};
use crate::table::{CellValue, Row, Table};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors raised while converting between bytes and a [`Table`]
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pickle(#[from] serde_pickle::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Delimited text, one record per row, no header handling; fields load as text
    Csv,
    /// UTF-8 JSON array of row arrays
    Json,
    /// Python pickle of a list of lists
    Pickle,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Csv, Encoding::Json, Encoding::Pickle];

    /// File suffix without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Csv => "csv",
            Encoding::Json => "json",
            Encoding::Pickle => "pickle",
        }
    }

    /// Label used in console headings
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Csv => "CSV",
            Encoding::Json => "JSON",
            Encoding::Pickle => "Pickle",
        }
    }

    /// Detect the encoding from a path's suffix (ASCII case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|e| e.extension().eq_ignore_ascii_case(ext))
    }

    /// Like [`Encoding::from_path`], reporting an unsupported suffix as an error
    pub fn for_path<P: AsRef<Path>>(path: P, role: Role) -> Result<Self> {
        let path = path.as_ref();
        Self::from_path(path).ok_or_else(|| Error::UnsupportedEncoding {
            path: path.to_path_buf(),
            role,
        })
    }

    /// Decode raw file bytes into a table
    pub fn decode(self, bytes: &[u8]) -> std::result::Result<Table, CodecError> {
        match self {
            Encoding::Csv => decode_csv(bytes),
            Encoding::Json => Ok(serde_json::from_slice(bytes)?),
            Encoding::Pickle => Ok(serde_pickle::from_slice(
                bytes,
                serde_pickle::DeOptions::new(),
            )?),
        }
    }

    /// Encode a table into the bytes of a complete file
    pub fn encode(self, table: &Table) -> std::result::Result<Vec<u8>, CodecError> {
        match self {
            Encoding::Csv => encode_csv(table),
            Encoding::Json => encode_json(table),
            Encoding::Pickle => Ok(serde_pickle::to_vec(
                table,
                serde_pickle::SerOptions::new(),
            )?),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn decode_csv(bytes: &[u8]) -> std::result::Result<Table, CodecError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Allow varying number of fields
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(csv_field).collect::<Row>());
    }

    Ok(Table::new(rows))
}

// CSV carries no types: every field is text, an empty field is a null cell.
fn csv_field(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::String(field.to_string())
    }
}

fn encode_csv(table: &Table) -> std::result::Result<Vec<u8>, CodecError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    for row in &table.rows {
        writer.write_record(row.cells.iter().map(CellValue::to_string_value))?;
    }

    writer.into_inner().map_err(|e| CodecError::Io(e.into_error()))
}

fn encode_json(table: &Table) -> std::result::Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    table.serialize(&mut serializer)?;
    Ok(out)
}
