use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const RULES: &str = r#"
flag_type = "char"

[reserved]
need_affix = "X"

[rules.S]
kind = "suffix"
cross_product = true
entries = [
  { strip = "0", affix = "s", condition = "[^y]" },
  { strip = "y", affix = "ies", condition = "[y]" },
]

[rules.U]
kind = "prefix"
cross_product = true
entries = [{ affix = "un" }]

[rules.G]
kind = "suffix"
entries = [{ strip = "e", affix = "ing", condition = "[e]" }]
"#;

fn write_rules(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn affixgen(rules: &Path) -> Command {
    let mut cmd = Command::cargo_bin("affixgen").unwrap();
    cmd.env_remove("AFFIXGEN_RULES")
        .arg("--no-color")
        .arg("--rules")
        .arg(rules);
    cmd
}

#[test]
fn expand_lists_forms() {
    let dir = tempdir().unwrap();
    let rules = write_rules(&dir, "rules.toml", RULES);

    affixgen(&rules)
        .args(["expand", "lock", "US"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unlocks"))
        .stdout(predicate::str::contains("4 forms"));
}

#[test]
fn expand_as_json() {
    let dir = tempdir().unwrap();
    let rules = write_rules(&dir, "rules.toml", RULES);

    let output = affixgen(&rules)
        .args(["--format", "json", "expand", "fly", "S"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stem"], "fly");
    assert_eq!(json["forms"], serde_json::json!(["fly", "flies"]));
}

#[test]
fn valid_rejects_bound_stem() {
    let dir = tempdir().unwrap();
    let rules = write_rules(&dir, "rules.toml", RULES);

    affixgen(&rules)
        .args(["valid", "walk", "XG"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("only valid with an affix"));

    affixgen(&rules)
        .args(["--no-fail", "valid", "walk", "XG"])
        .assert()
        .success();

    affixgen(&rules)
        .args(["valid", "walk", "XS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid on its own"));
}

#[test]
fn check_membership() {
    let dir = tempdir().unwrap();
    let rules = write_rules(&dir, "rules.toml", RULES);

    affixgen(&rules)
        .args(["check", "making", "make", "G"])
        .assert()
        .success();

    affixgen(&rules)
        .args(["check", "unmaking", "make", "UG"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("is not a form of"));
}

#[test]
fn stats_go_to_stderr() {
    let dir = tempdir().unwrap();
    let rules = write_rules(&dir, "rules.toml", RULES);

    affixgen(&rules)
        .args(["--stats", "expand", "walk", "SQ"])
        .assert()
        .success()
        .stderr(predicate::str::contains("rule lookups: 2"));
}

#[test]
fn json_rule_table() {
    let dir = tempdir().unwrap();
    let rules = write_rules(
        &dir,
        "rules.json",
        r#"{ "flag_type": "num", "rules": { "12": { "kind": "suffix", "entries": [{ "affix": "ed" }] } } }"#,
    );

    affixgen(&rules)
        .args(["expand", "walk", "3,12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("walked"));
}

#[test]
fn empty_rule_table_is_refused() {
    let dir = tempdir().unwrap();
    let rules = write_rules(&dir, "rules.toml", "flag_type = \"long\"\n");

    affixgen(&rules)
        .args(["expand", "walk", "Aa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unusable"));
}

#[test]
fn missing_rule_table() {
    let dir = tempdir().unwrap();

    affixgen(&dir.path().join("nope.toml"))
        .args(["expand", "walk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load rule table"));
}
