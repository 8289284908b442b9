//! Integration tests for incremental batch mapping.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use serde_json::{Value, json};
use snomap_core::{BatchEvent, BatchMapper, CoreError, OutputLayout};
use snomap_fhir::{DEFAULT_TARGET_SYSTEM, FhirError, TranslateResponse, Translator};
use snomap_model::{BatchSummary, SnomedCode};

enum Scripted {
    Maps(&'static str),
    NoMatch,
    ServerError,
}

/// Translator answering from a fixed script and recording every request.
struct FakeTranslator {
    script: HashMap<&'static str, Scripted>,
    calls: RefCell<Vec<String>>,
}

impl FakeTranslator {
    fn new(script: Vec<(&'static str, Scripted)>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

fn parameters(target: Option<&str>) -> Value {
    match target {
        Some(code) => json!({
            "resourceType": "Parameters",
            "parameter": [
                { "name": "result", "valueBoolean": true },
                { "name": "match", "part": [
                    { "name": "concept", "valueCoding": { "system": DEFAULT_TARGET_SYSTEM, "code": code } }
                ] }
            ]
        }),
        None => json!({
            "resourceType": "Parameters",
            "parameter": [{ "name": "result", "valueBoolean": false }]
        }),
    }
}

impl Translator for FakeTranslator {
    fn translate(&self, code: &SnomedCode) -> snomap_fhir::Result<TranslateResponse> {
        self.calls.borrow_mut().push(code.to_string());
        match self.script.get(code.as_str()) {
            Some(Scripted::Maps(target)) => Ok(TranslateResponse::from_payload(
                parameters(Some(target)),
                DEFAULT_TARGET_SYSTEM,
            )),
            Some(Scripted::NoMatch) | None => Ok(TranslateResponse::from_payload(
                parameters(None),
                DEFAULT_TARGET_SYSTEM,
            )),
            Some(Scripted::ServerError) => Err(FhirError::Server {
                status: 503,
                message: "maintenance".to_string(),
            }),
        }
    }
}

fn codes(values: &[&str]) -> Vec<SnomedCode> {
    values.iter().map(|v| SnomedCode::new(*v).unwrap()).collect()
}

fn data_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn summary(total: usize, skipped: usize, succeeded: usize, failed: usize) -> BatchSummary {
    BatchSummary {
        total,
        skipped,
        succeeded,
        failed,
    }
}

#[test]
fn fresh_codes_map_successfully() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![
        ("39065001", Scripted::Maps("S72.00")),
        ("73211009", Scripted::Maps("E14.9")),
    ]);
    let mapper = BatchMapper::new(&translator, layout.clone());

    let result = mapper.run(&codes(&["39065001", "73211009"]), false).unwrap();

    assert_eq!(result, summary(2, 0, 2, 0));
    let success = data_rows(&layout.success_table());
    assert_eq!(success.len(), 2);
    assert_eq!(success[0][1..3], ["39065001", "S72.00"]);
    assert_eq!(success[1][1..3], ["73211009", "E14.9"]);
    assert_ne!(success[0][0], success[1][0]);
    assert!(data_rows(&layout.failure_table()).is_empty());
}

#[test]
fn rerun_without_refresh_skips_everything() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let input = codes(&["39065001", "73211009"]);

    let first = FakeTranslator::new(vec![
        ("39065001", Scripted::Maps("S72.00")),
        ("73211009", Scripted::Maps("E14.9")),
    ]);
    BatchMapper::new(&first, layout.clone())
        .run(&input, false)
        .unwrap();

    let second = FakeTranslator::new(vec![]);
    let result = BatchMapper::new(&second, layout.clone())
        .run(&input, false)
        .unwrap();

    assert_eq!(result, summary(2, 2, 0, 0));
    assert!(second.calls().is_empty());
    assert_eq!(data_rows(&layout.success_table()).len(), 2);
}

#[test]
fn codes_in_failure_table_are_skipped_too() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let first = FakeTranslator::new(vec![("1234", Scripted::NoMatch)]);
    BatchMapper::new(&first, layout.clone())
        .run(&codes(&["1234"]), false)
        .unwrap();

    let second = FakeTranslator::new(vec![("1234", Scripted::Maps("A00"))]);
    let result = BatchMapper::new(&second, layout.clone())
        .run(&codes(&["1234", "5678"]), false)
        .unwrap();

    assert_eq!(result, summary(2, 1, 0, 1));
    assert_eq!(second.calls(), vec!["5678".to_string()]);
}

#[test]
fn full_refresh_reprocesses_every_code() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let input = codes(&["39065001", "73211009"]);
    let translator = FakeTranslator::new(vec![
        ("39065001", Scripted::Maps("S72.00")),
        ("73211009", Scripted::NoMatch),
    ]);
    let mapper = BatchMapper::new(&translator, layout.clone());

    mapper.run(&input, false).unwrap();
    let result = mapper.run(&input, true).unwrap();

    assert_eq!(result, summary(2, 0, 1, 1));
    assert_eq!(translator.calls().len(), 4);
    assert_eq!(data_rows(&layout.success_table()).len(), 1);
    assert_eq!(data_rows(&layout.failure_table()).len(), 1);
}

#[test]
fn no_mapping_records_literal_reason() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![("73211009", Scripted::NoMatch)]);

    let result = BatchMapper::new(&translator, layout.clone())
        .run(&codes(&["73211009"]), false)
        .unwrap();

    assert_eq!(result, summary(1, 0, 0, 1));
    let failures = data_rows(&layout.failure_table());
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0][1..3], ["73211009", "No mapping found"]);
    assert!(data_rows(&layout.success_table()).is_empty());
}

#[test]
fn request_error_is_recorded_and_batch_continues() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![
        ("111", Scripted::ServerError),
        ("222", Scripted::Maps("B01.9")),
    ]);

    let result = BatchMapper::new(&translator, layout.clone())
        .run(&codes(&["111", "222"]), false)
        .unwrap();

    assert_eq!(result, summary(2, 0, 1, 1));
    let failures = data_rows(&layout.failure_table());
    assert_eq!(
        failures[0][2],
        "ERROR: terminology server error (503): maintenance"
    );

    let artifact: Value = serde_json::from_str(
        &std::fs::read_to_string(layout.artifact_dir().join("111.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        artifact["error"],
        "terminology server error (503): maintenance"
    );
}

#[test]
fn every_processed_code_gets_one_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![
        ("1", Scripted::Maps("A00")),
        ("2", Scripted::NoMatch),
        ("3", Scripted::ServerError),
    ]);

    BatchMapper::new(&translator, layout.clone())
        .run(&codes(&["1", "2", "3"]), false)
        .unwrap();

    let mut names: Vec<String> = std::fs::read_dir(layout.artifact_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["1.json", "2.json", "3.json"]);
}

#[test]
fn duplicate_input_codes_are_requested_once() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![("42", Scripted::Maps("Z00.0"))]);

    let result = BatchMapper::new(&translator, layout.clone())
        .run(&codes(&["42", "42"]), false)
        .unwrap();

    assert_eq!(result, summary(2, 1, 1, 0));
    assert_eq!(translator.calls(), vec!["42".to_string()]);
}

#[test]
fn full_refresh_requests_duplicate_codes_again() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![("42", Scripted::Maps("Z00.0"))]);

    let result = BatchMapper::new(&translator, layout.clone())
        .run(&codes(&["42", "42"]), true)
        .unwrap();

    assert_eq!(result, summary(2, 0, 2, 0));
    assert_eq!(translator.calls(), vec!["42".to_string(), "42".to_string()]);
    assert_eq!(data_rows(&layout.success_table()).len(), 2);
}

#[test]
fn full_refresh_keeps_tables_when_artifact_dir_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![("1", Scripted::Maps("A00"))]);
    let mapper = BatchMapper::new(&translator, layout.clone());
    mapper.run(&codes(&["1"]), false).unwrap();

    std::fs::remove_dir_all(dir.path().join("output")).unwrap();
    std::fs::write(dir.path().join("output"), "not a directory").unwrap();

    let err = mapper.run(&codes(&["1"]), true).unwrap_err();
    assert!(matches!(err, CoreError::CreateDir { .. }));
    assert_eq!(data_rows(&layout.success_table()).len(), 1);
    assert_eq!(translator.calls().len(), 1);
}

#[test]
fn observer_sees_each_code_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let translator = FakeTranslator::new(vec![
        ("1", Scripted::Maps("A00")),
        ("2", Scripted::NoMatch),
    ]);

    let mut seen = Vec::new();
    BatchMapper::new(&translator, layout)
        .run_with_observer(&codes(&["1", "2", "1"]), false, |event| {
            let label = match event {
                BatchEvent::Skipped { .. } => "skipped".to_string(),
                BatchEvent::Mapped { icd10_code, .. } => format!("mapped {icd10_code}"),
                BatchEvent::Failed { reason, .. } => format!("failed {reason}"),
            };
            seen.push(format!("{} {label}", event.code()));
        })
        .unwrap();

    assert_eq!(
        seen,
        vec!["1 mapped A00", "2 failed No mapping found", "1 skipped"]
    );
}

#[test]
fn corrupt_ledger_aborts_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    std::fs::write(layout.success_table(), "unexpected,columns\nx,y\n").unwrap();
    let translator = FakeTranslator::new(vec![]);

    let err = BatchMapper::new(&translator, layout)
        .run(&codes(&["1"]), false)
        .unwrap_err();

    assert!(matches!(err, CoreError::LedgerFormat { .. }));
    assert!(translator.calls().is_empty());
}
