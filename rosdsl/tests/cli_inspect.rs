use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn inspect_prints_section_tree() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/basic.rdsl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("device [device] props=3"))
        .stdout(predicate::str::contains("  ether1 [interfaces] props=1"))
        .stdout(predicate::str::contains("    ip [interfaces] props=1"));
}

#[test]
fn inspect_depth_limits_tree() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/basic.rdsl"))
        .arg("--depth")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("firewall [firewall] props=0"))
        .stdout(predicate::str::contains("filter").not());
}

#[test]
fn inspect_json_is_the_syntax_tree() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdsl"));
    let assert = cmd
        .arg("inspect")
        .arg(fixture("fixtures/basic.rdsl"))
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let tree: serde_json::Value = serde_json::from_str(&stdout).expect("json tree");
    assert_eq!(tree["sections"].as_array().map(Vec::len), Some(3));
    assert_eq!(tree["sections"][0]["name"], "device");
}
