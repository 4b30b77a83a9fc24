use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("searoute");
    cmd.env("RUST_LOG", "error");
    cmd
}

#[test]
fn lists_builtin_ports_as_text() {
    cli()
        .arg("ports")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shanghai"))
        .stdout(predicate::str::contains("Rotterdam"))
        .stdout(predicate::str::contains("30 ports"));
}

#[test]
fn filters_ports_by_region_as_json() {
    let output = cli()
        .args(["ports", "--region", "Oceania", "--format", "json"])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(body["success"], true);
    let names: Vec<&str> = body["ports"]
        .as_array()
        .expect("ports array")
        .iter()
        .filter_map(|port| port["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Melbourne", "Sydney"]);
}

#[test]
fn unknown_region_prints_notice() {
    cli()
        .args(["ports", "--region", "Atlantis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No ports found in region 'Atlantis'"));
}

#[test]
fn reads_custom_port_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("ports.json");
    fs::write(
        &path,
        r#"{"ports": [
            {"name": "Alpha", "country": "AA", "region": "North", "lat": 10.0, "lon": 20.0},
            {"name": "Beta", "country": "BB", "region": "North", "lat": 11.0, "lon": 21.0}
        ]}"#,
    )
    .expect("write ports");

    cli()
        .arg("--ports-file")
        .arg(&path)
        .arg("ports")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha"))
        .stdout(predicate::str::contains("2 ports"))
        .stdout(predicate::str::contains("Shanghai").not());
}

#[test]
fn missing_port_file_fails_with_path() {
    cli()
        .args(["--ports-file", "/nonexistent/ports.json", "ports"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load ports from /nonexistent/ports.json"));
}
