/*
 * cli_test.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the atomcss binary.
 */

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn atomcss(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_atomcss"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run atomcss")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is not utf-8")
}

#[test]
fn test_resolve_tokens_to_css() {
    let output = atomcss(&["resolve", "outline-offset-4", "appearance-none"]);
    assert!(output.status.success());
    insta::assert_snapshot!(stdout(&output), @r"
    /* layer: default */
    .outline-offset-4{outline-offset:4px;}
    .appearance-none{appearance:none;-webkit-appearance:none;}
    ");
}

#[test]
fn test_resolve_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_atomcss"))
        .arg("resolve")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn atomcss");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"outline-none\n will-change-scroll ")
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for atomcss");

    assert!(output.status.success());
    let css = stdout(&output);
    assert!(css.contains(".outline-none{outline:2px solid transparent;outline-offset:2px;}"));
    assert!(css.contains(".will-change-scroll{will-change:scroll-position;}"));
}

#[test]
fn test_yaml_config_extends_theme() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp.path().join("atomcss.yaml");
    fs::write(
        &config_path,
        "theme:\n  lineWidth:\n    hairline: 0.5px\n",
    )
    .expect("Failed to write config");

    let output = atomcss(&[
        "--config",
        config_path.to_str().unwrap(),
        "resolve",
        "--format",
        "json",
        "outline-hairline",
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value[0]["declarations"]["outline-width"], "0.5px");
}

#[test]
fn test_unknown_preset_fails() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp.path().join("atomcss.json");
    fs::write(&config_path, r#"{"presets": ["wind"]}"#).expect("Failed to write config");

    let output = atomcss(&["-c", config_path.to_str().unwrap(), "rules"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset: wind"), "{stderr}");
}

#[test]
fn test_strict_mode_exit_code() {
    assert!(atomcss(&["resolve", "--strict", "outline"]).status.success());
    assert!(!atomcss(&["resolve", "--strict", "outline", "nope"]).status.success());
}

#[test]
fn test_all_rejects_explicit_format() {
    let output = atomcss(&["resolve", "--all", "--format", "css", "outline"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"), "{stderr}");

    let output = atomcss(&["resolve", "--all", "outline"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim_start().starts_with('{'));
}

#[test]
fn test_theme_lookup() {
    let output = atomcss(&["theme", "colors.red.DEFAULT"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "\"#f87171\"");
}
