use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::grade::StatusTerm;
use crate::key::{normalize_key, KeyOutcome};
use crate::loader::{load_index, RecordIndex};
use crate::model::{CandidateRecord, CompositeKey, Outcome, OutputRow};
use crate::sink::OutputSinks;
use crate::source::CandidateStream;
use crate::summary::{ReconMeta, ReconReport, ReconSummary};

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct ReconInput {
    pub source_a: PathBuf,
    pub source_b: PathBuf,
    pub output_dir: PathBuf,
}

/// Run reconciliation: index Source A, stream Source B through the
/// classifier, append every classified row to its output file.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconReport, ReconError> {
    let run_at = chrono::Utc::now().to_rfc3339();

    let index = load_index(&input.source_a, &config.source_a.columns)?;

    info!(path = %input.source_b.display(), "streaming candidate source");
    let candidates = CandidateStream::open(&input.source_b, &config.source_b.columns)?;

    let mut sinks = OutputSinks::open(&input.output_dir, &config.output)?;
    let summary = reconcile(&index, candidates, &mut sinks)?;
    sinks.finish()?;

    info!(
        candidates = summary.candidates,
        matching = summary.matching,
        non_matching = summary.non_matching,
        diff_only_in_b = summary.diff_only_in_b,
        rejected = summary.rejected(),
        unclassified = summary.unclassified,
        "reconciliation complete"
    );

    Ok(ReconReport {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at,
            source_a: input.source_a.display().to_string(),
            source_b: input.source_b.display().to_string(),
            output_dir: input.output_dir.display().to_string(),
        },
        summary,
    })
}

/// Classify every candidate and append the results to `sinks`.
///
/// Stops at the first read or write error.
pub fn reconcile<W: Write>(
    index: &RecordIndex,
    candidates: impl IntoIterator<Item = Result<CandidateRecord, ReconError>>,
    sinks: &mut OutputSinks<W>,
) -> Result<ReconSummary, ReconError> {
    let mut summary = ReconSummary {
        index_size: index.len(),
        duplicate_keys: index.duplicates(),
        ..Default::default()
    };

    for candidate in candidates {
        let candidate = candidate?;
        summary.candidates += 1;

        match classify(index, &candidate) {
            Some(row) => {
                sinks.write(&row)?;
                summary.record(row.outcome);
            }
            None => summary.unclassified += 1,
        }
    }

    Ok(summary)
}

/// Classify one candidate row. `None` means the row is dropped: its status is
/// present but unrecognized while both keys are intact.
pub fn classify(index: &RecordIndex, candidate: &CandidateRecord) -> Option<OutputRow> {
    let key = match normalize_key(
        &candidate.project_status,
        &candidate.project_id,
        &candidate.customer_id,
    ) {
        KeyOutcome::Valid(key) => key,
        KeyOutcome::Rejected(row) => {
            debug!(outcome = %row.outcome, ?candidate, "candidate rejected");
            return Some(row);
        }
        KeyOutcome::Unclassified => {
            debug!(status = %candidate.project_status, ?candidate, "unrecognized status, row dropped");
            return None;
        }
    };

    Some(compare(index, &key, &candidate.project_status))
}

fn compare(index: &RecordIndex, key: &CompositeKey, status: &str) -> OutputRow {
    // A lookup miss and a status that cannot be evaluated land in the same sink.
    let evaluated = index.get(&key.as_index_key()).and_then(|indexed| {
        let term = StatusTerm::parse(status)?;
        match term.agrees_with(&indexed.project_status) {
            Ok(agrees) => Some((indexed, agrees)),
            Err(e) => {
                debug!(error = %e, %key, "status comparison failed");
                None
            }
        }
    });
    let Some((indexed, agrees)) = evaluated else {
        return OutputRow::new(
            Outcome::DiffOnlyInB,
            vec![Some(key.customer.clone()), Some(key.project.clone()), Some(status.to_string())],
        );
    };

    let outcome = if agrees { Outcome::Matching } else { Outcome::NonMatching };

    OutputRow::new(
        outcome,
        vec![
            Some(indexed.customer_id.clone()),
            Some(indexed.project_id.clone()),
            Some(indexed.project_status.clone()),
            Some(status.to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IndexedRecord;

    fn indexed(project_id: &str, customer_id: &str, status: &str) -> IndexedRecord {
        IndexedRecord {
            project_id: project_id.into(),
            customer_id: customer_id.into(),
            project_status: status.into(),
            extra: vec![],
        }
    }

    fn candidate(status: &str, project_id: &str, customer_id: &str) -> CandidateRecord {
        CandidateRecord {
            project_status: status.into(),
            project_id: project_id.into(),
            customer_id: customer_id.into(),
        }
    }

    fn fields(row: &OutputRow) -> Vec<&str> {
        row.fields.iter().map(|f| f.as_deref().unwrap_or("<null>")).collect()
    }

    #[test]
    fn matching_submission_status() {
        let index = RecordIndex::from_records([indexed("5", "9", "exceeded")]);
        let row = classify(&index, &candidate("DISTINCTION", "5.0", "9.0")).unwrap();
        assert_eq!(row.outcome, Outcome::Matching);
        assert_eq!(fields(&row), vec!["9", "5", "exceeded", "DISTINCTION"]);
    }

    #[test]
    fn matching_grade_status() {
        let index = RecordIndex::from_records([indexed("5", "9", "SUBMITTED")]);
        let row = classify(&index, &candidate("ungradeable", "5", "9")).unwrap();
        assert_eq!(row.outcome, Outcome::Matching);
        assert_eq!(fields(&row), vec!["9", "5", "SUBMITTED", "ungradeable"]);
    }

    #[test]
    fn non_matching() {
        let index = RecordIndex::from_records([indexed("5", "9", "failed")]);
        let row = classify(&index, &candidate("PASSED", "5", "9")).unwrap();
        assert_eq!(row.outcome, Outcome::NonMatching);
        assert_eq!(fields(&row), vec!["9", "5", "failed", "PASSED"]);
    }

    #[test]
    fn indexed_status_outside_vocabulary_is_non_matching() {
        let index = RecordIndex::from_records([indexed("5", "9", "nan")]);
        let row = classify(&index, &candidate("passed", "5", "9")).unwrap();
        assert_eq!(row.outcome, Outcome::NonMatching);
    }

    #[test]
    fn lookup_miss_is_diff_only_in_b() {
        let index = RecordIndex::from_records([indexed("5", "9", "PASSED")]);
        let row = classify(&index, &candidate("passed", "6.0", "9.0")).unwrap();
        assert_eq!(row.outcome, Outcome::DiffOnlyInB);
        assert_eq!(fields(&row), vec!["9", "6", "passed"]);
    }

    #[test]
    fn raw_float_key_in_index_does_not_match_normalized_key() {
        // Index keys are raw; candidate keys are stripped.
        let index = RecordIndex::from_records([indexed("5.0", "9", "PASSED")]);
        let row = classify(&index, &candidate("passed", "5.0", "9")).unwrap();
        assert_eq!(row.outcome, Outcome::DiffOnlyInB);
    }

    #[test]
    fn rejections_pass_through() {
        let index = RecordIndex::default();
        let row = classify(&index, &candidate("passed", "5", "nan")).unwrap();
        assert_eq!(row.outcome, Outcome::MissingCustomerKey);
        assert_eq!(fields(&row), vec!["passed", "5", "<null>"]);
    }

    #[test]
    fn unrecognized_status_is_currently_dropped() {
        let index = RecordIndex::from_records([indexed("5", "9", "PASSED")]);
        assert!(classify(&index, &candidate("graded", "5", "9")).is_none());
    }

    #[test]
    fn reconcile_counts_and_writes() {
        let index = RecordIndex::from_records([
            indexed("5", "9", "exceeded"),
            indexed("6", "9", "failed"),
        ]);
        let candidates = vec![
            Ok(candidate("DISTINCTION", "5.0", "9.0")),
            Ok(candidate("PASSED", "6", "9")),
            Ok(candidate("passed", "7", "9")),
            Ok(candidate("nan", "8", "9")),
            Ok(candidate("graded", "5", "9")),
        ];

        let mut sinks = OutputSinks::from_writers(|_| Vec::new());
        let summary = reconcile(&index, candidates, &mut sinks).unwrap();

        assert_eq!(summary.index_size, 2);
        assert_eq!(summary.candidates, 5);
        assert_eq!(summary.matching, 1);
        assert_eq!(summary.non_matching, 1);
        assert_eq!(summary.diff_only_in_b, 1);
        assert_eq!(summary.missing_status, 1);
        assert_eq!(summary.unclassified, 1);
        assert_eq!(summary.written(), 4);

        let out = sinks.into_inner().unwrap();
        assert_eq!(out[&Outcome::MissingStatus], b",8,9\n".to_vec());
        assert_eq!(out[&Outcome::DiffOnlyInB], b"9,7,passed\n".to_vec());
    }

    #[test]
    fn reconcile_stops_on_read_error() {
        let index = RecordIndex::default();
        let candidates = vec![
            Ok(candidate("passed", "1", "2")),
            Err(ReconError::Csv { path: "b.csv".into(), message: "bad record".into() }),
            Ok(candidate("passed", "3", "4")),
        ];
        let mut sinks = OutputSinks::from_writers(|_| Vec::new());
        let err = reconcile(&index, candidates, &mut sinks).unwrap_err();
        assert!(matches!(err, ReconError::Csv { .. }));
        let out = sinks.into_inner().unwrap();
        assert_eq!(out[&Outcome::DiffOnlyInB], b"2,1,passed\n".to_vec());
    }
}
