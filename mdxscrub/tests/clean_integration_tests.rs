// mdxscrub/tests/clean_integration_tests.rs
//! End-to-end tests for the `clean` and `rules` commands: build a small
//! corpus in a temp directory, run the binary, and assert on the report
//! text and the on-disk bytes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NEWSLETTER_DOC: &str = "# Intro\n\nSubscribe .nc-loop-dots { ... } @keyframes nc-loop-dots {...}\nEmail sent! Check your inbox to complete your signup.\nNo spam. Just high quality insights.\n\n# Next Section\n";
const NEWSLETTER_CLEANED: &str = "# Intro\n\n\n# Next Section\n";

const COMPARISON_DOC: &str = "revenue <17% growth\n";
const COMPARISON_CLEANED: &str = "revenue less than 17% growth\n";

const CLEAN_DOC: &str = "Nothing to do here.\n";

fn corpus() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("newsletter.mdx"), NEWSLETTER_DOC).unwrap();
    fs::write(dir.path().join("comparison.mdx"), COMPARISON_DOC).unwrap();
    fs::write(dir.path().join("untouched.mdx"), CLEAN_DOC).unwrap();
    dir
}

fn mdxscrub() -> Command {
    let mut cmd = Command::cargo_bin("mdxscrub").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn dry_run_reports_changes_but_writes_nothing() {
    let dir = corpus();

    mdxscrub()
        .args(["clean", dir.path().to_str().unwrap(), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files processed: 3"))
        .stdout(predicate::str::contains("Files modified:  2"))
        .stdout(predicate::str::contains("newsletter_css"))
        .stdout(predicate::str::contains("Would modify:"))
        .stdout(predicate::str::contains("DRY RUN: no files were written."));

    // Nothing on disk changed.
    assert_eq!(read(dir.path(), "newsletter.mdx"), NEWSLETTER_DOC);
    assert_eq!(read(dir.path(), "comparison.mdx"), COMPARISON_DOC);
    assert_eq!(read(dir.path(), "untouched.mdx"), CLEAN_DOC);
}

#[test]
fn apply_rewrites_modified_files_only() {
    let dir = corpus();

    mdxscrub()
        .args(["clean", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files modified:  2"))
        .stdout(predicate::str::contains("DRY RUN").not());

    assert_eq!(read(dir.path(), "newsletter.mdx"), NEWSLETTER_CLEANED);
    assert_eq!(read(dir.path(), "comparison.mdx"), COMPARISON_CLEANED);
    assert_eq!(read(dir.path(), "untouched.mdx"), CLEAN_DOC);
}

#[test]
fn second_pass_over_cleaned_corpus_modifies_nothing() {
    let dir = corpus();

    mdxscrub()
        .args(["clean", dir.path().to_str().unwrap()])
        .assert()
        .success();

    mdxscrub()
        .args(["clean", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files modified:  0"));
}

#[test]
fn summary_json_matches_the_run() {
    let dir = corpus();
    let json_path = dir.path().join("summary.json");

    mdxscrub()
        .args([
            "clean",
            dir.path().to_str().unwrap(),
            "--dry-run",
            "--summary-json",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let summary: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(summary["files_processed"], 3);
    assert_eq!(summary["files_modified"], 2);
    assert!(summary["per_rule_hits"]["newsletter_css"].as_u64().unwrap() >= 1);
    assert_eq!(summary["modified_paths"].as_array().unwrap().len(), 2);
    assert_eq!(summary["failures"].as_array().unwrap().len(), 0);
}

#[test]
fn dry_run_and_apply_report_identical_counts() {
    let dry_dir = corpus();
    let apply_dir = corpus();
    let dry_json = dry_dir.path().join("summary.json");
    let apply_json = apply_dir.path().join("summary.json");

    mdxscrub()
        .args([
            "clean",
            dry_dir.path().to_str().unwrap(),
            "--dry-run",
            "--summary-json",
            dry_json.to_str().unwrap(),
        ])
        .assert()
        .success();

    mdxscrub()
        .args([
            "clean",
            apply_dir.path().to_str().unwrap(),
            "--summary-json",
            apply_json.to_str().unwrap(),
        ])
        .assert()
        .success();

    let dry: Value = serde_json::from_str(&fs::read_to_string(&dry_json).unwrap()).unwrap();
    let apply: Value = serde_json::from_str(&fs::read_to_string(&apply_json).unwrap()).unwrap();
    assert_eq!(dry["files_processed"], apply["files_processed"]);
    assert_eq!(dry["files_modified"], apply["files_modified"]);
    assert_eq!(dry["per_rule_hits"], apply["per_rule_hits"]);
}

#[test]
fn disabled_rule_leaves_its_pattern_alone() {
    let dir = corpus();

    mdxscrub()
        .args([
            "clean",
            dir.path().to_str().unwrap(),
            "--disable",
            "comparison_lt",
        ])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "comparison.mdx"), COMPARISON_DOC);
    assert_eq!(read(dir.path(), "newsletter.mdx"), NEWSLETTER_CLEANED);
}

#[test]
fn custom_config_rule_is_applied() {
    let dir = corpus();
    let config_path = dir.path().join("extra_rules.yaml");
    fs::write(
        &config_path,
        "rules:\n  - name: strip_marker\n    pattern: 'MARKER'\n    replace_with: ''\n",
    )
    .unwrap();
    fs::write(dir.path().join("marked.mdx"), "keep MARKER this\n").unwrap();

    mdxscrub()
        .args([
            "clean",
            dir.path().to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("strip_marker"));

    assert_eq!(read(dir.path(), "marked.mdx"), "keep  this\n");
}

#[test]
fn invalid_config_fails_before_touching_any_file() {
    let dir = corpus();
    let config_path = dir.path().join("broken_rules.yaml");
    fs::write(
        &config_path,
        "rules:\n  - name: broken\n    pattern: '(unclosed'\n",
    )
    .unwrap();

    mdxscrub()
        .args([
            "clean",
            dir.path().to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rule validation failed"));

    assert_eq!(read(dir.path(), "newsletter.mdx"), NEWSLETTER_DOC);
}

#[test]
fn missing_directory_is_an_error() {
    mdxscrub()
        .args(["clean", "/definitely/not/a/real/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn rules_command_lists_the_table_in_order() {
    mdxscrub()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookmark_cards"))
        .stdout(predicate::str::contains("newsletter_block"))
        .stdout(predicate::str::contains("curly_braces_text"))
        .stdout(predicate::str::contains("rule(s) in application order"));
}
