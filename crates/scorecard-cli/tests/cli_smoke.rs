use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn scorecard() -> Command {
    let mut cmd = Command::cargo_bin("scorecard").unwrap();
    cmd.env_remove("PROJECT_ENDPOINT")
        .env_remove("PROJECT_API_KEY")
        .env_remove("MODEL_NAME");
    cmd
}

fn write_fixture(dir: &Path, dataset_body: &str) {
    std::fs::write(
        dir.join("eval.yaml"),
        "name: demo\ndataset:\n  path: dataset.jsonl\n  name: demo-ds\n  version: \"1\"\n",
    )
    .unwrap();
    std::fs::write(dir.join("dataset.jsonl"), dataset_body).unwrap();
}

#[test]
fn version_prints_crate_version() {
    scorecard()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_without_endpoint_exits_with_config_error() {
    scorecard()
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PROJECT_ENDPOINT"));
}

#[test]
fn run_without_api_key_exits_with_config_error() {
    scorecard()
        .args(["run", "--endpoint", "https://project.example"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PROJECT_API_KEY"));
}

#[test]
fn validate_accepts_well_formed_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "{\"query\":\"q\",\"response\":\"r\",\"ground_truth\":\"g\"}\n",
    );

    scorecard()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stderr(predicate::str::contains("ok: 1 records"));
}

#[test]
fn validate_rejects_record_missing_ground_truth() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "{\"query\":\"q\",\"response\":\"r\"}\n");

    scorecard()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ground_truth"));
}

#[test]
fn validate_with_missing_config_exits_with_config_error() {
    let dir = tempfile::tempdir().unwrap();
    scorecard()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("eval.yaml"));
}
