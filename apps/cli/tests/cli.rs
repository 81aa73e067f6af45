use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn hardentools(data_dir: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("hardentools")?;
    cmd.env_remove("RUST_LOG")
        .env_remove("HARDEN__LIST__BOUND")
        .env_remove("HARDEN__HIVE__BACKEND")
        .env_remove("HARDEN__LOG__LEVEL")
        .arg("--backend")
        .arg("fs")
        .arg("--data-dir")
        .arg(data_dir);
    Ok(cmd)
}

fn json(output: &[u8]) -> Result<serde_json::Value> {
    Ok(serde_json::from_slice(output)?)
}

#[test]
fn status_on_fresh_store_reports_nothing_hardened() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let output = hardentools(temp_dir.path())?.args(["status", "--json"]).output()?;
    assert!(output.status.success());

    let status = json(&output.stdout)?;
    let entries = status.as_array().map(Vec::as_slice).unwrap_or_default();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "cmd.exe");
    assert_eq!(entries[1]["name"], "PowerShell");
    assert!(entries.iter().all(|e| e["hardened"] == false));
    Ok(())
}

#[test]
fn apply_defaults_then_restore_all() -> Result<()> {
    let temp_dir = TempDir::new()?;

    hardentools(temp_dir.path())?
        .args(["apply", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apply PowerShell: ok"))
        .stdout(predicate::str::contains("cmd.exe").not());

    let output = hardentools(temp_dir.path())?.args(["status", "--json"]).output()?;
    let status = json(&output.stdout)?;
    assert_eq!(status[0]["hardened"], false);
    assert_eq!(status[1]["hardened"], true);

    hardentools(temp_dir.path())?
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded, 0 failed"));

    hardentools(temp_dir.path())?
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("hardened").not());
    Ok(())
}

#[test]
fn named_entries_match_case_insensitively() -> Result<()> {
    let temp_dir = TempDir::new()?;

    hardentools(temp_dir.path())?
        .args(["apply", "CMD.EXE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apply cmd.exe: ok"));
    Ok(())
}

#[test]
fn unknown_entry_fails_but_runs_the_rest() -> Result<()> {
    let temp_dir = TempDir::new()?;

    hardentools(temp_dir.path())?
        .args(["apply", "wscript", "cmd.exe"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("apply cmd.exe: ok"))
        .stdout(predicate::str::contains("Unknown entry"));
    Ok(())
}

#[test]
fn environment_bound_is_enforced() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let output = hardentools(temp_dir.path())?
        .env("HARDEN__LIST__BOUND", "2")
        .args(["apply", "--json"])
        .output()?;
    assert!(!output.status.success());

    let summary = json(&output.stdout)?;
    assert_eq!(summary["mode"], "apply");
    assert_eq!(summary["succeeded"], 1);
    assert_eq!(summary["failed"], 1);
    assert!(summary["entries"][1]["error"].as_str().unwrap_or_default().contains("List is full"));
    Ok(())
}

#[test]
fn log_level_accepts_filter_directives() -> Result<()> {
    let temp_dir = TempDir::new()?;

    hardentools(temp_dir.path())?
        .env("HARDEN__LOG__LEVEL", "harden_core=debug,warn")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("PowerShell"));

    hardentools(temp_dir.path())?
        .env("HARDEN__LOG__LEVEL", "loud")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log level 'loud'"));
    Ok(())
}

#[test]
fn config_file_selects_the_backend() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("hardentools.toml");
    fs::write(&config_path, "[hive]\nbackend = \"memory\"\n")?;

    let mut cmd = Command::cargo_bin("hardentools")?;
    cmd.env_remove("HARDEN__HIVE__BACKEND")
        .arg("--config")
        .arg(&config_path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("PowerShell"));
    Ok(())
}

#[test]
fn missing_config_file_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;

    hardentools(temp_dir.path())?
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is malformed"));
    Ok(())
}

#[cfg(not(windows))]
#[test]
fn registry_backend_is_unavailable_off_windows() -> Result<()> {
    let temp_dir = TempDir::new()?;

    Command::cargo_bin("hardentools")?
        .args(["status", "--backend", "registry", "--data-dir"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("only available on Windows"));
    Ok(())
}

#[test]
fn no_arguments_prints_help() -> Result<()> {
    Command::cargo_bin("hardentools")?
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}
