//! CSV readers for both exports.
//!
//! Both files carry a header row. Key columns are resolved by configured
//! header name, or by position when no name is configured. A leading column
//! with an empty header is a row index written by dataframe exports and is
//! skipped for positional layouts. Empty cells and cells past the end of a
//! short row read as [`MISSING`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::ColumnMapping;
use crate::error::ReconError;
use crate::model::{CandidateRecord, MISSING};

/// Column indices of the three key fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyColumns {
    pub project_id: usize,
    pub customer_id: usize,
    pub project_status: usize,
    /// 1 when a leading row-index column is skipped, else 0.
    pub offset: usize,
}

/// Positional order of the key fields within a source.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Layout {
    /// project_id, customer_id, project_status, ...
    Indexed,
    /// project_status, project_id, customer_id
    Candidate,
}

pub(crate) fn open(path: &Path) -> Result<File, ReconError> {
    File::open(path).map_err(|e| ReconError::io(path.display().to_string(), e))
}

pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

pub(crate) fn resolve_columns(
    source: &str,
    headers: &csv::StringRecord,
    mapping: &ColumnMapping,
    layout: Layout,
) -> Result<KeyColumns, ReconError> {
    let offset = usize::from(headers.get(0).is_some_and(|h| h.trim().is_empty()));
    let (project_pos, customer_pos, status_pos) = match layout {
        Layout::Indexed => (offset, offset + 1, offset + 2),
        Layout::Candidate => (offset + 1, offset + 2, offset),
    };

    // Every unnamed key column falls back to a position the header must cover.
    let idx = |name: &Option<String>, position: usize| -> Result<usize, ReconError> {
        match name {
            None if position < headers.len() => Ok(position),
            None => Err(ReconError::ShortHeader {
                source: source.to_string(),
                fields: headers.len().saturating_sub(offset),
            }),
            Some(name) => headers.iter().position(|h| h == name).ok_or_else(|| {
                ReconError::MissingColumn { source: source.to_string(), column: name.clone() }
            }),
        }
    };

    Ok(KeyColumns {
        project_id: idx(&mapping.project_id, project_pos)?,
        customer_id: idx(&mapping.customer_id, customer_pos)?,
        project_status: idx(&mapping.project_status, status_pos)?,
        offset,
    })
}

impl KeyColumns {
    pub fn is_key(&self, idx: usize) -> bool {
        idx == self.project_id || idx == self.customer_id || idx == self.project_status
    }
}

/// Cell value with the missing-value convention applied.
pub(crate) fn cell(record: &csv::StringRecord, idx: usize) -> String {
    match record.get(idx) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Streaming reader over candidate rows. Rows are decoded one at a time.
pub struct CandidateStream<R: Read> {
    source: String,
    reader: csv::Reader<R>,
    columns: KeyColumns,
    record: csv::StringRecord,
}

impl CandidateStream<File> {
    pub fn open(path: &Path, mapping: &ColumnMapping) -> Result<Self, ReconError> {
        Self::from_reader(&path.display().to_string(), open(path)?, mapping)
    }
}

impl<R: Read> CandidateStream<R> {
    pub fn from_reader(source: &str, reader: R, mapping: &ColumnMapping) -> Result<Self, ReconError> {
        let mut reader = csv_reader(reader);
        let headers = reader.headers().map_err(|e| ReconError::csv(source, &e))?.clone();
        let columns = resolve_columns(source, &headers, mapping, Layout::Candidate)?;
        Ok(Self {
            source: source.to_string(),
            reader,
            columns,
            record: csv::StringRecord::new(),
        })
    }
}

impl<R: Read> Iterator for CandidateStream<R> {
    type Item = Result<CandidateRecord, ReconError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => Some(Ok(CandidateRecord {
                project_status: cell(&self.record, self.columns.project_status),
                project_id: cell(&self.record, self.columns.project_id),
                customer_id: cell(&self.record, self.columns.customer_id),
            })),
            Err(e) => Some(Err(ReconError::csv(self.source.as_str(), &e))),
        }
    }
}
