use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn relsim() -> Command {
    Command::cargo_bin("relsim").unwrap()
}

#[test]
fn relsim_run_json_reports_indices() {
    let output = relsim()
        .args(["run", "--max-iterations", "2000", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let outcome: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(outcome["seed"], 4);
    assert_eq!(outcome["iterations"], 2000);
    assert_eq!(outcome["termination"]["status"], "iteration_cap");
    let lolp = outcome["indices"]["lolp"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&lolp));
    assert!(outcome["cv_history"].is_array());
}

#[test]
fn relsim_run_plain_prints_table() {
    relsim()
        .args(["run", "--seed", "11", "--max-iterations", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LOLP"))
        .stdout(predicate::str::contains("LOLF (per year)"))
        .stdout(predicate::str::contains("did not converge within 500 iterations"));
}

#[test]
fn relsim_config_template_round_trips_through_validate() {
    let dir = tempdir().unwrap();
    for name in ["system.yaml", "system.json", "system.toml"] {
        let path = dir.path().join(name);
        relsim()
            .args(["config", "template", "--out", path.to_str().unwrap()])
            .assert()
            .success();
        assert!(path.exists());
        relsim()
            .args(["config", "validate", path.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("is valid"));
    }
}

#[test]
fn relsim_config_template_to_stdout_is_yaml() {
    relsim()
        .args(["config", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cv_threshold"))
        .stdout(predicate::str::contains("load_profile"));
}

#[test]
fn relsim_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "convergence:\n  cv_threshold: 0.0\n").unwrap();

    relsim()
        .args(["config", "validate", path.to_str().unwrap()])
        .assert()
        .failure();
    relsim()
        .args(["run", "--config", path.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn relsim_run_uses_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("system.json");
    fs::write(
        &path,
        r#"{"seed": 21, "convergence": {"max_iterations": 300}}"#,
    )
    .unwrap();

    let output = relsim()
        .args(["run", "--config", path.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let outcome: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(outcome["seed"], 21);
    assert_eq!(outcome["iterations"], 300);
}

#[test]
fn relsim_replicate_summarizes_seeds() {
    let output = relsim()
        .args([
            "replicate",
            "-n",
            "3",
            "--base-seed",
            "40",
            "--max-iterations",
            "1000",
            "--threads",
            "2",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: Value = serde_json::from_slice(&output).unwrap();
    let outcomes = summary["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    let seeds: Vec<u64> = outcomes
        .iter()
        .map(|o| o["seed"].as_u64().unwrap())
        .collect();
    assert_eq!(seeds, vec![40, 41, 42]);
    assert!(summary["lolp"]["mean"].is_number());
}

#[test]
fn relsim_replicate_requires_replications() {
    relsim()
        .args(["replicate", "-n", "0"])
        .assert()
        .failure();
}

#[test]
fn relsim_completions_bash() {
    relsim()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("relsim"));
}
