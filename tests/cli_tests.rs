//! CLI surface tests for the `paredown` binary.

#![allow(clippy::expect_used, deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn paredown() -> Command {
    Command::cargo_bin("paredown").expect("paredown binary should exist")
}

#[test]
fn version_prints_crate_version() {
    paredown()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_json_is_parseable() {
    let out = paredown()
        .args(["version", "--json"])
        .output()
        .expect("command should run");
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn help_lists_subcommands() {
    paredown()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve").and(predicate::str::contains("version")));
}

#[test]
fn unknown_subcommand_fails() {
    paredown().arg("frobnicate").assert().failure();
}

#[test]
fn flag_version_matches_subcommand() {
    paredown()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
