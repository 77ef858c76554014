//! Append-only CSV outputs, one per [`Outcome`].
//!
//! Handles are acquired once for the whole run and released by
//! [`OutputSinks::finish`]. Files are opened in append mode and created when
//! absent; nothing is ever truncated and no header row is written.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::ReconError;
use crate::model::{Outcome, OutputRow};

struct Sink<W: Write> {
    label: String,
    writer: csv::Writer<W>,
}

pub struct OutputSinks<W: Write> {
    sinks: BTreeMap<Outcome, Sink<W>>,
}

impl OutputSinks<File> {
    /// Open all six output files under `dir`.
    pub fn open(dir: &Path, config: &OutputConfig) -> Result<Self, ReconError> {
        std::fs::create_dir_all(dir).map_err(|e| ReconError::io(dir.display().to_string(), e))?;

        let mut sinks = BTreeMap::new();
        for outcome in Outcome::ALL {
            let path = dir.join(config.file_name(outcome));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| ReconError::io(path.display().to_string(), e))?;
            sinks.insert(outcome, Sink::new(path.display().to_string(), file));
        }
        Ok(Self { sinks })
    }

    /// Output file paths, as [`OutputSinks::open`] resolves them.
    pub fn paths(dir: &Path, config: &OutputConfig) -> BTreeMap<Outcome, PathBuf> {
        Outcome::ALL
            .into_iter()
            .map(|o| (o, dir.join(config.file_name(o))))
            .collect()
    }
}

impl<W: Write> Sink<W> {
    fn new(label: String, inner: W) -> Self {
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        Self { label, writer }
    }
}

impl<W: Write> OutputSinks<W> {
    /// Wrap caller-provided writers, one per outcome.
    pub fn from_writers(mut make: impl FnMut(Outcome) -> W) -> Self {
        let sinks = Outcome::ALL
            .into_iter()
            .map(|o| (o, Sink::new(o.to_string(), make(o))))
            .collect();
        Self { sinks }
    }

    /// Append one row to the sink of its outcome.
    pub fn write(&mut self, row: &OutputRow) -> Result<(), ReconError> {
        let Some(sink) = self.sinks.get_mut(&row.outcome) else {
            return Err(ReconError::io(row.outcome.to_string(), "sink not open"));
        };
        sink.writer
            .write_record(row.fields.iter().map(|f| f.as_deref().unwrap_or("")))
            .map_err(|e| ReconError::csv(sink.label.as_str(), &e))
    }

    /// Flush every sink and hand back the underlying writers.
    pub fn into_inner(self) -> Result<BTreeMap<Outcome, W>, ReconError> {
        let mut out = BTreeMap::new();
        for (outcome, sink) in self.sinks {
            let Sink { label, writer } = sink;
            let inner = writer.into_inner().map_err(|e| ReconError::io(label, e.error()))?;
            out.insert(outcome, inner);
        }
        Ok(out)
    }

    /// Flush and release every handle.
    pub fn finish(self) -> Result<(), ReconError> {
        self.into_inner().map(drop)
    }
}
