//! CLI tests for the nuxt-lens binary
//!
//! Runs the one-shot commands against a small project and checks their
//! human and JSON output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin_path() -> String {
    std::env::var("CARGO_BIN_EXE_nuxt-lens").unwrap_or_else(|_| {
        let mut path = std::env::current_exe().unwrap();
        path.pop();
        path.pop();
        path.push("nuxt-lens");
        path.to_str().unwrap().to_string()
    })
}

fn write(root: &Path, rel: &str, text: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    path
}

fn project() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().canonicalize().unwrap();
    write(&root, "nuxt.config.ts", "export default defineNuxtConfig({})\n");
    write(&root, "package.json", "{}\n");
    write(&root, "composables/useFoo.ts", "export function useFoo() {}\n");
    write(
        &root,
        "pages/index.vue",
        "<script setup>\nconst foo = useFoo()\n</script>\n",
    );
    (temp_dir, root)
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .expect("Failed to run nuxt-lens")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_root_command() {
    let (_temp_dir, root) = project();
    let file = root.join("pages/index.vue");
    let output = run(&["root", "--file", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), root.to_str().unwrap());
}

#[test]
fn test_lenses_json() {
    let (_temp_dir, root) = project();
    let file = root.join("composables/useFoo.ts");
    let output = run(&["lenses", "--file", file.to_str().unwrap(), "--output", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["schema_version"], "1.0.0");
    assert_eq!(json["tool"], "nuxt-lens");
    let lenses = json["data"]["lenses"].as_array().unwrap();
    assert_eq!(lenses.len(), 1);
    assert_eq!(lenses[0]["symbol"], "useFoo");
    assert_eq!(lenses[0]["references"].as_array().unwrap().len(), 1);
    assert_eq!(lenses[0]["label"], "🪝 1 reference");
}

#[test]
fn test_refs_human() {
    let (_temp_dir, root) = project();
    let file = root.join("composables/useFoo.ts");
    let output = run(&[
        "refs",
        "--file",
        file.to_str().unwrap(),
        "--kind",
        "composable",
        "--name",
        "useFoo",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("composable useFoo (1 references)"));
    assert!(stdout.contains("pages/index.vue:2:12-2:18"));
}

#[test]
fn test_symbols_json_with_kind_filter() {
    let (_temp_dir, root) = project();
    let output = run(&[
        "symbols",
        "--root",
        root.to_str().unwrap(),
        "--kind",
        "composable",
        "--output",
        "json",
    ]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    let symbols = json["data"]["symbols"].as_array().unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0]["name"], "useFoo");
    assert_eq!(symbols[0]["kind"], "composable");
}

#[test]
fn test_missing_root_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(temp_dir.path(), "loose.ts", "export const a = 1\n");
    let output = run(&["lenses", "--file", file.to_str().unwrap(), "--output", "json"]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["data"]["error"], "command_failed");
}

#[test]
fn test_unknown_command_prints_usage() {
    let output = run(&["frobnicate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}
