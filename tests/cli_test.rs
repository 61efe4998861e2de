// tests/cli_test.rs
mod common;

use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_version-cascade"))
}

#[test]
fn test_help_lists_options() {
    let output = binary().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--change"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--pre-release"));
}

#[test]
fn test_change_is_required() {
    let fixture = common::sample_solution();
    let output = binary().arg(&fixture.solution).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_dry_run_reports_changes() {
    let fixture = common::sample_solution();
    let before = fixture.read("src/Data/Data.csproj");

    let output = binary()
        .arg(&fixture.solution)
        .args(["-c", "Company.Core 1.1.0", "--dry-run"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Company.Core 1.0.0 => 1.1.0"));
    assert!(stdout.contains("Data 2.3.0 => 2.3.1"));
    assert!(stdout.contains("Would update"));
    assert_eq!(fixture.read("src/Data/Data.csproj"), before);
}

#[test]
fn test_update_writes_files() {
    let fixture = common::sample_solution();

    let output = binary()
        .arg(&fixture.solution)
        .args(["-c", "Company.Core=1.2.0", "-a", "+"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let data = fixture.read("src/Data/Data.csproj");
    assert!(data.contains("<Version>2.3.1</Version>"));
    assert!(data.contains("<AssemblyVersion>2.3.1.0</AssemblyVersion>"));
}

#[test]
fn test_missing_solution_fails() {
    let temp = tempfile::tempdir().unwrap();
    let output = binary()
        .arg(temp.path().join("Missing.sln"))
        .args(["-c", "Core 1.0.0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR"));
}
