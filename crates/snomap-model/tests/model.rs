//! Tests for snomap-model types.

use snomap_model::{BatchSummary, MappingOutcome, MappingRecord, SnomedCode};

#[test]
fn summary_counts_skips_and_outcomes() {
    let mut summary = BatchSummary::default();
    summary.record_skip();
    summary.record_outcome(&MappingOutcome::success("J45.9"));
    summary.record_outcome(&MappingOutcome::no_mapping());
    summary.record_outcome(&MappingOutcome::error("timed out"));

    assert_eq!(summary.total, 4);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 2);
}

#[test]
fn record_serializes_with_flattened_outcome() {
    let record = MappingRecord::new(
        SnomedCode::new("73211009").unwrap(),
        MappingOutcome::success("E14.9"),
    );
    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["code"], "73211009");
    assert_eq!(json["status"], "success");
    assert_eq!(json["icd10_code"], "E14.9");
}
