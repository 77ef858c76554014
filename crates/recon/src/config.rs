use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::Outcome;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every key is optional; an empty document is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub source_a: SourceConfig,
    #[serde(default)]
    pub source_b: SourceConfig,
}

impl ReconConfig {
    pub fn from_toml(s: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(s).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let mut seen = HashSet::new();
        for outcome in Outcome::ALL {
            let name = self.output.file_name(outcome);
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "output.{outcome}: file name is empty"
                )));
            }
            if !seen.insert(name) {
                return Err(ReconError::ConfigValidation(format!(
                    "output.{outcome}: file name '{name}' is used by another sink"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Header names of the three key columns. A column left unset is taken by
/// position: project id, customer id, status for Source A; status, project id,
/// customer id for Source B.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMapping {
    pub project_id: Option<String>,
    pub customer_id: Option<String>,
    pub project_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_matching")]
    pub matching: String,
    #[serde(default = "default_non_matching")]
    pub non_matching: String,
    #[serde(default = "default_diff_only_in_b")]
    pub diff_only_in_b: String,
    #[serde(default = "default_missing_project_key")]
    pub missing_project_key: String,
    #[serde(default = "default_missing_customer_key")]
    pub missing_customer_key: String,
    #[serde(default = "default_missing_status")]
    pub missing_status: String,
}

fn default_matching() -> String {
    "matching_records.csv".into()
}

fn default_non_matching() -> String {
    "non_matching_records.csv".into()
}

fn default_diff_only_in_b() -> String {
    "customers_in_chartio_but_not_in_responsys.csv".into()
}

fn default_missing_project_key() -> String {
    "chartio_records_with_no_project_key.csv".into()
}

fn default_missing_customer_key() -> String {
    "chartio_records_with_no_customer_key.csv".into()
}

fn default_missing_status() -> String {
    "chartio_records_with_no_project_status.csv".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            matching: default_matching(),
            non_matching: default_non_matching(),
            diff_only_in_b: default_diff_only_in_b(),
            missing_project_key: default_missing_project_key(),
            missing_customer_key: default_missing_customer_key(),
            missing_status: default_missing_status(),
        }
    }
}

impl OutputConfig {
    pub fn file_name(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Matching => &self.matching,
            Outcome::NonMatching => &self.non_matching,
            Outcome::DiffOnlyInB => &self.diff_only_in_b,
            Outcome::MissingProjectKey => &self.missing_project_key,
            Outcome::MissingCustomerKey => &self.missing_customer_key,
            Outcome::MissingStatus => &self.missing_status,
        }
    }
}
