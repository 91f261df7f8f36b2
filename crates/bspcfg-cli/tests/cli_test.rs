//! CLI integration tests using assert_cmd
//!
//! These tests verify the CLI commands work correctly end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the bspcfg binary
fn bspcfg_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bspcfg").expect("Failed to find bspcfg binary");
    cmd.env_remove("BSPCFG_ROOT")
        .env_remove("BSPCFG_BACKUP_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a config root with bspwm and polybar files
fn create_config_root() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join("bspwm")).expect("Failed to create bspwm dir");
    fs::create_dir_all(dir.path().join("polybar")).expect("Failed to create polybar dir");
    fs::write(
        dir.path().join("bspwm/bspwmrc"),
        "#! /bin/sh\nbspc config border_width 2\nbspc config window_gap 12\n",
    )
    .expect("Failed to write bspwmrc");
    fs::write(
        dir.path().join("polybar/config"),
        "[colors]\nbackground = #000000\n\n[bar/main]\nborder-size = 2px\npadding = 2px\n",
    )
    .expect("Failed to write polybar config");
    dir
}

#[test]
fn test_help_command() {
    bspcfg_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "bspcfg - bspwm and desktop config editor",
        ));
}

#[test]
fn test_version_command() {
    bspcfg_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bspcfg"));
}

#[test]
fn test_files_lists_catalog() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("polybar:"))
        .stdout(predicate::str::contains("  kitty/color.ini"));
}

#[test]
fn test_options_table() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("border_width = 2"))
        .stdout(predicate::str::contains("(line 3)"));
}

#[test]
fn test_ini_json() {
    let root = create_config_root();

    let output = bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["--json", "ini", "polybar/config"])
        .output()
        .expect("Failed to run bspcfg");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert_eq!(json["path"], "polybar/config");
    assert_eq!(json["sections"]["colors"]["background"]["value"], "#000000");
    assert_eq!(json["sections"]["colors"]["background"]["line"], 2);
    assert_eq!(json["sections"]["bar/main"]["padding"]["line"], 6);
}

#[test]
fn test_set_option_updates_file() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["set-option", "border_width", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 'border_width' to '3'"));

    let content = fs::read_to_string(root.path().join("bspwm/bspwmrc")).unwrap();
    assert!(content.contains("bspc config border_width 3\n"));
}

#[test]
fn test_set_key_dry_run_shows_diff() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["set-key", "polybar/config", "height", "30", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would have added 'height'"))
        .stdout(predicate::str::contains("+height = 30"));

    let content = fs::read_to_string(root.path().join("polybar/config")).unwrap();
    assert!(!content.contains("height"));
}

#[test]
fn test_replace_with_limit_json() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["--json", "replace", "polybar/config", "2px", "4px", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"replacements\": 1"))
        .stdout(predicate::str::contains("\"status\": \"ok\""));
}

#[test]
fn test_replace_identical_text_reports_no_changes() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["replace", "polybar/config", "2px", "2px"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes to polybar/config"))
        .stdout(predicate::str::contains("not found").not());
}

#[test]
fn test_backup_dir_receives_copy() {
    let root = create_config_root();
    let backups = TempDir::new().expect("Failed to create backup dir");

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .arg("--backup-dir")
        .arg(backups.path())
        .args(["set-option", "window_gap", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created:"));

    assert_eq!(fs::read_dir(backups.path()).unwrap().count(), 1);
}

#[test]
fn test_out_of_scope_path_fails() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["read", "../../etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the config root"));
}

#[test]
fn test_missing_file_fails() {
    let root = create_config_root();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["items", "kitty/kitty.conf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found: kitty/kitty.conf"));
}

#[test]
fn test_missing_root_fails() {
    let root = TempDir::new().expect("Failed to create temp dir");

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path().join("nope"))
        .arg("files")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot open config root"));
}

#[test]
fn test_root_from_env() {
    let root = create_config_root();

    bspcfg_cmd()
        .env("BSPCFG_ROOT", root.path())
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("window_gap"));
}

#[test]
fn test_apply_plan_from_stdin() {
    let root = create_config_root();
    let plan = r##"{"actions": [
        {"type": "set_bspwm_option", "option": "border_width", "value": 4},
        {"type": "set_ini_key", "file": "polybar/config", "key": "background", "value": "#222222"}
    ]}"##;

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .args(["apply", "-"])
        .write_stdin(plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/2] set_bspwm_option"))
        .stdout(predicate::str::contains("[2/2] set_ini_key"));

    let polybar = fs::read_to_string(root.path().join("polybar/config")).unwrap();
    assert!(polybar.contains("background = #222222\n"));
}

#[test]
fn test_apply_plan_reports_failures() {
    let root = create_config_root();
    let plan_dir = TempDir::new().expect("Failed to create temp dir");
    let plan_path = plan_dir.path().join("plan.json");
    fs::write(
        &plan_path,
        r#"{"actions": [{"type": "set_ini_key", "file": "polybar/config", "key": "x"}]}"#,
    )
    .unwrap();

    bspcfg_cmd()
        .arg("--root")
        .arg(root.path())
        .arg("apply")
        .arg(&plan_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Missing required parameter: value"))
        .stderr(predicate::str::contains("1 of 1 actions failed"));
}
