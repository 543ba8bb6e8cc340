//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the schemagen-cli binary (found in target/debug when run via cargo test).
fn schemagen_cli() -> Command {
    Command::cargo_bin("schemagen-cli").unwrap()
}

/// Path to schemagen library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("schemagen")
        .join("tests")
        .join("fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

#[test]
fn test_cli_help() {
    let mut cmd = schemagen_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("schematic"));
}

#[test]
fn test_cli_version() {
    let mut cmd = schemagen_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_generate_batch() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = schemagen_cli();

    cmd.arg("generate")
        .arg("--library")
        .arg(fixture("pspice.kicad_sym"))
        .arg("--library")
        .arg(fixture("device.kicad_sym"))
        .arg("--library")
        .arg(fixture("active.kicad_sym"))
        .arg("--weights")
        .arg(fixture("weights.conf"))
        .arg("--out-dir")
        .arg(out.path())
        .arg("--count")
        .arg("3")
        .arg("--min-parts")
        .arg("3")
        .arg("--max-parts")
        .arg("5");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 of 3 documents"));

    for index in 0..3 {
        let path = out.path().join(format!("{index}.kicad_sch"));
        assert!(path.exists(), "missing document {index}");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("(kicad_sch"));
    }
}

#[test]
fn test_cli_generate_json_summary() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = schemagen_cli();

    cmd.arg("generate")
        .arg("--library")
        .arg(fixture("pspice.kicad_sym"))
        .arg("--library")
        .arg(fixture("device.kicad_sym"))
        .arg("--weights")
        .arg(fixture("weights.conf"))
        .arg("--out-dir")
        .arg(out.path())
        .arg("--count")
        .arg("2")
        .arg("--min-parts")
        .arg("3")
        .arg("--max-parts")
        .arg("4")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"requested\": 2"));
}

#[test]
fn test_cli_malformed_weights_aborts() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = schemagen_cli();

    cmd.arg("generate")
        .arg("--library")
        .arg(fixture("pspice.kicad_sym"))
        .arg("--weights")
        .arg(fixture("malformed_weights.conf"))
        .arg("--out-dir")
        .arg(out.path())
        .arg("--count")
        .arg("1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Malformed"));
}

#[test]
fn test_cli_no_importable_catalogs() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = schemagen_cli();

    cmd.arg("generate")
        .arg("--library")
        .arg(fixture("broken.kicad_sym"))
        .arg("--weights")
        .arg(fixture("weights.conf"))
        .arg("--out-dir")
        .arg(out.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no catalogs"));
}

#[test]
fn test_cli_parts_listing() {
    let mut cmd = schemagen_cli();

    cmd.arg("parts")
        .arg("--library")
        .arg(fixture("active.kicad_sym"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Q_NPN_BCE"))
        .stdout(predicate::str::contains("family Q"))
        .stdout(predicate::str::contains("3 pin(s)"));
}
