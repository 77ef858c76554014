//! `gradesync-recon` — grade record reconciliation engine.
//!
//! Indexes one CSV export, streams the other through key normalization and
//! grade translation, and appends every classified row to one of six output
//! files. No CLI dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod grade;
pub mod key;
pub mod loader;
pub mod model;
pub mod sink;
pub mod source;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{run, ReconInput};
pub use error::ReconError;
pub use loader::RecordIndex;
pub use model::{CandidateRecord, IndexedRecord, Outcome};
pub use summary::{ReconReport, ReconSummary};
