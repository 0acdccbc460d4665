use scorecard_core::dataset::load_records;
use std::path::PathBuf;

fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("dataset.jsonl");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn valid_records_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        concat!(
            r#"{"query":"q1","response":"r1","ground_truth":"g1"}"#,
            "\n\n",
            r#"{"query":"q2","response":"r2","ground_truth":"g2"}"#,
            "\n",
        ),
    );
    let records = load_records(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].query, "q1");
    assert_eq!(records[1].ground_truth, "g2");
}

#[test]
fn record_missing_ground_truth_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "{\"query\":\"q\",\"response\":\"r\"}\n");
    let err = load_records(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("ground_truth"), "unexpected error: {}", msg);
    assert!(msg.contains(":1:"), "should name the offending line: {}", msg);
}

#[test]
fn non_string_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "{\"query\":\"q\",\"response\":42,\"ground_truth\":\"g\"}\n",
    );
    assert!(load_records(&path).is_err());
}

#[test]
fn malformed_json_line_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        concat!(
            r#"{"query":"q","response":"r","ground_truth":"g"}"#,
            "\n",
            "not json\n",
        ),
    );
    let err = load_records(&path).unwrap_err();
    assert!(err.to_string().contains(":2:"), "{}", err);
}

#[test]
fn missing_file_fails_fast_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.jsonl");
    let err = load_records(&path).unwrap_err();
    assert!(err.to_string().contains("dataset not found"));
}

#[test]
fn empty_dataset_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "\n\n");
    let err = load_records(&path).unwrap_err();
    assert!(err.to_string().contains("no records"));
}
