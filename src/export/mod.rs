use std::path::Path;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::model::Record;
use crate::table::FieldDescriptor;

/// File stem used when the table has no title.
pub const FALLBACK_FILENAME: &str = "yourmd-csv-export";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<ExportFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".csv") {
        return Some(ExportFormat::Csv);
    }
    if lower.ends_with(".json") {
        return Some(ExportFormat::Json);
    }
    None
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode csv: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("failed to flush csv writer: {message}")]
    CsvFlush { message: String },

    #[error("failed to encode json: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write export file: {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One exported row: the headers' labels paired with the record's values.
/// Serializes as an object whose keys follow header order.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRow {
    pub cells: Vec<(String, String)>,
}

impl Serialize for ExportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.cells.iter().map(|(k, v)| (k, v)))
    }
}

pub fn build_rows(headers: &[FieldDescriptor], data: &[Record]) -> Vec<ExportRow> {
    data.iter()
        .map(|r| ExportRow {
            cells: headers
                .iter()
                .map(|h| (h.display_name.clone(), r.text(&h.sorting_field_name)))
                .collect(),
        })
        .collect()
}

/// Default export file name: the table title, else the fallback stem.
pub fn default_filename(title: Option<&str>, format: ExportFormat) -> String {
    let stem = title
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(FALLBACK_FILENAME);
    format!("{stem}.{}", format.extension())
}

pub fn render_csv(headers: &[FieldDescriptor], data: &[Record]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers.iter().map(|h| h.display_name.as_str()))
        .map_err(|source| ExportError::Csv { source })?;
    for record in data {
        writer
            .write_record(headers.iter().map(|h| record.text(&h.sorting_field_name)))
            .map_err(|source| ExportError::Csv { source })?;
    }
    writer.into_inner().map_err(|e| ExportError::CsvFlush {
        message: e.error().to_string(),
    })
}

pub fn render_json(headers: &[FieldDescriptor], data: &[Record]) -> Result<Vec<u8>, ExportError> {
    serde_json::to_vec_pretty(&build_rows(headers, data))
        .map_err(|source| ExportError::Json { source })
}

pub fn render(
    format: ExportFormat,
    headers: &[FieldDescriptor],
    data: &[Record],
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => render_csv(headers, data),
        ExportFormat::Json => render_json(headers, data),
    }
}

pub fn write_export(
    path: &Path,
    format: ExportFormat,
    headers: &[FieldDescriptor],
    data: &[Record],
) -> Result<usize, ExportError> {
    let rendered = render(format, headers, data)?;
    std::fs::write(path, &rendered).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(data.len())
}
