use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

const DANGLING_REFERENCE: &str = r#"interfaces:
    ether1:
        type = "ethernet"
firewall:
    filter:
        lan-out:
            chain = "forward"
            action = "accept"
            out_interface = "ether9"
"#;

#[test]
fn verify_passes_for_fixtures() {
    for name in ["fixtures/basic.rdsl", "fixtures/branch-office.rdsl"] {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
        cmd.arg("verify")
            .arg(fixture(name))
            .assert()
            .success()
            .stdout(predicate::str::contains("result errors=0 warnings=0"))
            .stdout(predicate::str::contains("- none"));
    }
}

#[test]
fn verify_fails_on_semantic_error() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("broken.rdsl");
    fs::write(
        &input,
        "device:\n    vendor = \"mikrotik\"\n    model = \"hEX\"\n",
    )
    .expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    cmd.arg("verify")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("verify failed: 1 errors"))
        .stdout(predicate::str::contains(
            "- [error] semantic: Error in section 'device': Device section is missing required 'hostname' property",
        ));
}

#[test]
fn dangling_reference_is_a_warning() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("refs.rdsl");
    fs::write(&input, DANGLING_REFERENCE).expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    cmd.arg("verify")
        .arg(path_as_str(&input))
        .assert()
        .success()
        .stdout(predicate::str::contains("result errors=0 warnings=1"))
        .stdout(predicate::str::contains("undefined interface 'ether9'"));
}

#[test]
fn strict_flags_turn_references_into_failures() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("refs.rdsl");
    fs::write(&input, DANGLING_REFERENCE).expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    cmd.arg("verify")
        .arg(path_as_str(&input))
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("verify failed in strict mode: 1 warnings"));

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    cmd.arg("verify")
        .arg(path_as_str(&input))
        .arg("--strict-references")
        .assert()
        .failure()
        .stdout(predicate::str::contains("- [error] undefined_interface"));
}

#[test]
fn strict_references_from_settings_file() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("refs.rdsl");
    let settings = dir.path().join("rosdsl.toml");
    fs::write(&input, DANGLING_REFERENCE).expect("write");
    fs::write(&settings, "[validation]\nstrict_references = true\n").expect("write settings");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    cmd.arg("verify")
        .arg(path_as_str(&input))
        .arg("--config")
        .arg(path_as_str(&settings))
        .assert()
        .failure()
        .stdout(predicate::str::contains("result errors=1 warnings=0"));
}

#[test]
fn verify_json_output() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("mixed.rdsl");
    fs::write(&input, "snmp:\n    hosts = [10.0.0.1, \"backup\"]\n").expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    let assert = cmd
        .arg("verify")
        .arg(path_as_str(&input))
        .arg("--format")
        .arg("json")
        .assert()
        .failure();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("json report");
    assert_eq!(report["errors"], 1);
    assert_eq!(report["issues"][0]["code"], "type_error");
    assert_eq!(report["issues"][0]["severity"], "Error");
}
