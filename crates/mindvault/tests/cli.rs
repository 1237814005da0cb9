use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn mindvault(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("mindvault").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("MINDVAULT_CONFIG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempdir().unwrap();
    mindvault(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_config_defaults() {
    let dir = tempdir().unwrap();
    let output = mindvault(dir.path()).arg("config").output().unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["poll_interval_ms"], 1000);
    assert_eq!(config["optimization_strategies"].as_array().unwrap().len(), 3);
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("mindvault.toml"),
        "poll_interval_ms = 250\nenable_metrics = false\n",
    )
    .unwrap();

    let output = mindvault(dir.path()).arg("config").output().unwrap();
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["poll_interval_ms"], 250);
    assert_eq!(config["enable_metrics"], false);
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempdir().unwrap();
    mindvault(dir.path())
        .args(["config", "--config", "nope.toml"])
        .assert()
        .failure();
}

#[test]
fn test_import_rejects_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.xyz");
    fs::write(&path, "hello").unwrap();

    mindvault(dir.path())
        .arg("import")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported ebook format"));
}

#[test]
fn test_import_ebook_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Dune.epub");
    fs::write(&path, "epub bytes").unwrap();

    let output = mindvault(dir.path())
        .args(["--json", "import"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["data"]["title"], "Dune");
    assert_eq!(response["data"]["format"], "epub");
}

#[test]
fn test_export_csv() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("highlights.json");
    let output = dir.path().join("out").join("highlights.csv");
    fs::write(
        &input,
        r#"[{"book": "Dune", "page": 12}, {"book": "Emma", "page": 3}]"#,
    )
    .unwrap();

    mindvault(dir.path())
        .arg("export")
        .arg(&input)
        .arg(&output)
        .args(["--format", "csv"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "book,page\nDune,12\nEmma,3"
    );
}

#[test]
fn test_export_unknown_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.json");
    fs::write(&input, "[]").unwrap();

    mindvault(dir.path())
        .arg("export")
        .arg(&input)
        .arg(dir.path().join("data.xml"))
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn test_monitor_runs_fixed_ticks() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mindvault.json"), r#"{"poll_interval_ms": 10}"#).unwrap();

    let output = mindvault(dir.path())
        .args(["--json", "monitor", "--ticks", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let ticks: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(ticks.len(), 2);
    assert_eq!(ticks[1]["tick"], 2);
}
