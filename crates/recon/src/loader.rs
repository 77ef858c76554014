use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::config::ColumnMapping;
use crate::error::ReconError;
use crate::model::IndexedRecord;
use crate::source::{cell, csv_reader, open, resolve_columns, Layout};

/// Source A rows keyed by raw `"{customer_id}-{project_id}"`.
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Default)]
pub struct RecordIndex {
    records: HashMap<String, IndexedRecord>,
    duplicates: usize,
}

impl RecordIndex {
    /// Insert with last-write-wins semantics.
    pub fn from_records(records: impl IntoIterator<Item = IndexedRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            if index.records.insert(record.index_key(), record).is_some() {
                index.duplicates += 1;
            }
        }
        index
    }

    pub fn get(&self, key: &str) -> Option<&IndexedRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows that replaced an earlier row with the same key.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Read Source A from `path` into an index. No validation is applied to the
/// key or status fields.
pub fn load_index(path: &Path, columns: &ColumnMapping) -> Result<RecordIndex, ReconError> {
    info!(path = %path.display(), "reading indexed source");
    let index = load_index_from_reader(&path.display().to_string(), open(path)?, columns)?;
    info!(records = index.len(), duplicates = index.duplicates(), "index built");
    if index.duplicates() > 0 {
        warn!(
            duplicates = index.duplicates(),
            "duplicate keys in indexed source; later rows replaced earlier ones"
        );
    }
    Ok(index)
}

pub fn load_index_from_reader<R: Read>(
    source: &str,
    reader: R,
    columns: &ColumnMapping,
) -> Result<RecordIndex, ReconError> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers().map_err(|e| ReconError::csv(source, &e))?.clone();
    let key_cols = resolve_columns(source, &headers, columns, Layout::Indexed)?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::csv(source, &e))?;
        let extra = (key_cols.offset..record.len())
            .filter(|&i| !key_cols.is_key(i))
            .map(|i| record[i].to_string())
            .collect();

        records.push(IndexedRecord {
            project_id: cell(&record, key_cols.project_id),
            customer_id: cell(&record, key_cols.customer_id),
            project_status: cell(&record, key_cols.project_status),
            extra,
        });
    }

    Ok(RecordIndex::from_records(records))
}
