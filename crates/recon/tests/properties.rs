// Property-based tests for key normalization and grade translation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use gradesync_recon::grade::{translate, Grade, StatusTerm, SubmissionStatus};
use gradesync_recon::key::{normalize_key, KeyOutcome};
use gradesync_recon::loader::RecordIndex;
use gradesync_recon::model::{CompositeKey, IndexedRecord, Outcome};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Numeric id, optionally carrying the `.0` float artifact.
fn arb_id() -> impl Strategy<Value = (String, String)> {
    (r"[1-9][0-9]{0,7}", any::<bool>()).prop_map(|(id, float)| {
        let raw = if float { format!("{id}.0") } else { id.clone() };
        (raw, id)
    })
}

fn arb_grade() -> impl Strategy<Value = Grade> {
    prop::sample::select(Grade::ALL.to_vec())
}

fn arb_status() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_grade().prop_map(|g| g.as_str().to_string()),
        prop::sample::select(SubmissionStatus::ALL.to_vec()).prop_map(|s| s.as_str().to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn valid_rows_produce_stripped_key(
        status in arb_status(),
        (raw_project, project) in arb_id(),
        (raw_customer, customer) in arb_id(),
    ) {
        let outcome = normalize_key(&status, &raw_project, &raw_customer);
        prop_assert_eq!(outcome, KeyOutcome::Valid(CompositeKey { customer, project }));
    }

    #[test]
    fn stripping_is_idempotent((raw, id) in arb_id()) {
        let once = normalize_key("passed", &raw, &raw);
        let twice = normalize_key("passed", &id, &id);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn missing_customer_key_rejection_shape(status in arb_status(), (raw_project, project) in arb_id()) {
        let outcome = normalize_key(&status, &raw_project, "nan");
        let KeyOutcome::Rejected(row) = outcome else {
            return Err(TestCaseError::fail("expected rejection"));
        };
        prop_assert_eq!(row.outcome, Outcome::MissingCustomerKey);
        prop_assert_eq!(row.fields, vec![Some(status), Some(project), None]);
    }

    #[test]
    fn unknown_text_status_never_yields_a_key(
        status in r"[a-z]{1,12}",
        (raw_project, _p) in arb_id(),
        (raw_customer, _c) in arb_id(),
    ) {
        prop_assume!(StatusTerm::parse(&status).is_none());
        prop_assume!(status != "nan");
        prop_assert_eq!(normalize_key(&status, &raw_project, &raw_customer), KeyOutcome::Unclassified);
    }

    #[test]
    fn translation_is_non_empty_and_in_vocabulary(grade in arb_grade()) {
        let terms = translate(grade.as_str()).unwrap();
        prop_assert!(!terms.is_empty());
        for term in terms {
            prop_assert!(SubmissionStatus::parse(term).is_some());
        }
    }

    #[test]
    fn agreement_is_symmetric_across_vocabularies(
        grade in arb_grade(),
        status in prop::sample::select(SubmissionStatus::ALL.to_vec()),
    ) {
        let forward = StatusTerm::Grade(grade).agrees_with(status.as_str()).unwrap();
        let backward = StatusTerm::Submission(status).agrees_with(grade.as_str()).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn index_last_write_wins(
        project in r"[0-9]{1,4}",
        customer in r"[0-9]{1,4}",
        statuses in prop::collection::vec(r"[A-Z]{3,10}", 1..6),
    ) {
        let records = statuses.iter().map(|s| IndexedRecord {
            project_id: project.clone(),
            customer_id: customer.clone(),
            project_status: s.clone(),
            extra: vec![],
        });
        let index = RecordIndex::from_records(records);
        let key = format!("{customer}-{project}");
        prop_assert_eq!(index.len(), 1);
        prop_assert_eq!(index.duplicates(), statuses.len() - 1);
        prop_assert_eq!(&index.get(&key).unwrap().project_status, statuses.last().unwrap());
    }
}
