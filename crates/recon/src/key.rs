//! Composite key derivation for streamed candidate rows.

use crate::grade::StatusTerm;
use crate::model::{CompositeKey, Outcome, OutputRow, MISSING};

/// Result of normalizing a candidate row's key fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Valid(CompositeKey),
    /// Row routed to one of the missing-field sinks.
    Rejected(OutputRow),
    /// Status present but unrecognized, keys intact. No sink takes these.
    Unclassified,
}

/// Strip a trailing `.0` float artifact from an id.
pub fn strip_float_suffix(id: &str) -> &str {
    id.strip_suffix(".0").unwrap_or(id)
}

/// Derive the composite key for `(project_status, project_id, customer_id)`.
///
/// Rejections are checked in a fixed order: missing status, then missing
/// project key, then missing customer key.
pub fn normalize_key(project_status: &str, project_id: &str, customer_id: &str) -> KeyOutcome {
    let project_key = strip_float_suffix(project_id);
    let customer_key = strip_float_suffix(customer_id);

    let invalid_status = StatusTerm::parse(project_status).is_none();
    let invalid_project = project_key == MISSING;
    let invalid_customer = customer_key == MISSING;

    if !(invalid_status || invalid_project || invalid_customer) {
        return KeyOutcome::Valid(CompositeKey {
            customer: customer_key.to_string(),
            project: project_key.to_string(),
        });
    }

    let status = Some(project_status.to_string());
    let project = Some(project_key.to_string());
    let customer = Some(customer_key.to_string());

    if invalid_status && project_status == MISSING {
        KeyOutcome::Rejected(OutputRow::new(Outcome::MissingStatus, vec![None, project, customer]))
    } else if invalid_project {
        KeyOutcome::Rejected(OutputRow::new(Outcome::MissingProjectKey, vec![status, None, customer]))
    } else if invalid_customer {
        KeyOutcome::Rejected(OutputRow::new(Outcome::MissingCustomerKey, vec![status, project, None]))
    } else {
        KeyOutcome::Unclassified
    }
}
