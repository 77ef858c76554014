use serde::Serialize;

use crate::model::Outcome;

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub index_size: usize,
    pub duplicate_keys: usize,
    pub candidates: usize,
    pub matching: usize,
    pub non_matching: usize,
    pub diff_only_in_b: usize,
    pub missing_project_key: usize,
    pub missing_customer_key: usize,
    pub missing_status: usize,
    /// Rows with an unrecognized status and intact keys; written nowhere.
    pub unclassified: usize,
}

impl ReconSummary {
    pub fn record(&mut self, outcome: Outcome) {
        *self.count_mut(outcome) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Matching => self.matching,
            Outcome::NonMatching => self.non_matching,
            Outcome::DiffOnlyInB => self.diff_only_in_b,
            Outcome::MissingProjectKey => self.missing_project_key,
            Outcome::MissingCustomerKey => self.missing_customer_key,
            Outcome::MissingStatus => self.missing_status,
        }
    }

    fn count_mut(&mut self, outcome: Outcome) -> &mut usize {
        match outcome {
            Outcome::Matching => &mut self.matching,
            Outcome::NonMatching => &mut self.non_matching,
            Outcome::DiffOnlyInB => &mut self.diff_only_in_b,
            Outcome::MissingProjectKey => &mut self.missing_project_key,
            Outcome::MissingCustomerKey => &mut self.missing_customer_key,
            Outcome::MissingStatus => &mut self.missing_status,
        }
    }

    /// Rows routed to one of the three missing-field sinks.
    pub fn rejected(&self) -> usize {
        self.missing_project_key + self.missing_customer_key + self.missing_status
    }

    /// Rows written to any sink.
    pub fn written(&self) -> usize {
        Outcome::ALL.iter().map(|&o| self.count(o)).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub source_a: String,
    pub source_b: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
}
