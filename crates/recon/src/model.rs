use std::fmt;

use serde::Serialize;

/// Literal used by both exports for a missing value.
pub const MISSING: &str = "nan";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the indexed source (Source A).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord {
    pub project_id: String,
    pub customer_id: String,
    pub project_status: String,
    /// Remaining fields, in source column order.
    pub extra: Vec<String>,
}

impl IndexedRecord {
    /// Raw index key: `"{customer_id}-{project_id}"`, no normalization.
    pub fn index_key(&self) -> String {
        format!("{}-{}", self.customer_id, self.project_id)
    }
}

/// One row of the streamed source (Source B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub project_status: String,
    pub project_id: String,
    pub customer_id: String,
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Normalized `(customer, project)` pair identifying a record in both sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    pub customer: String,
    pub project: String,
}

impl CompositeKey {
    pub fn as_index_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.customer, self.project)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Output category of a candidate row. Each maps to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Matching,
    NonMatching,
    DiffOnlyInB,
    MissingProjectKey,
    MissingCustomerKey,
    MissingStatus,
}

impl Outcome {
    pub const ALL: [Outcome; 6] = [
        Self::Matching,
        Self::NonMatching,
        Self::DiffOnlyInB,
        Self::MissingProjectKey,
        Self::MissingCustomerKey,
        Self::MissingStatus,
    ];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matching => write!(f, "matching"),
            Self::NonMatching => write!(f, "non_matching"),
            Self::DiffOnlyInB => write!(f, "diff_only_in_b"),
            Self::MissingProjectKey => write!(f, "missing_project_key"),
            Self::MissingCustomerKey => write!(f, "missing_customer_key"),
            Self::MissingStatus => write!(f, "missing_status"),
        }
    }
}

/// A classified output row. `None` fields are written as empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub outcome: Outcome,
    pub fields: Vec<Option<String>>,
}

impl OutputRow {
    pub fn new(outcome: Outcome, fields: Vec<Option<String>>) -> Self {
        Self { outcome, fields }
    }
}
