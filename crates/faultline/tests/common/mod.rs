//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Run the faultline binary in the specified directory.
///
/// Colors are disabled and logging is limited to errors so assertions can
/// match plain text.
pub fn run_faultline_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_faultline"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "faultline=error")
        .env_remove("FAULTLINE_ANALYSIS_TOPIC")
        .output()
        .expect("Failed to execute faultline")
}

/// Run faultline and assert it succeeded, returning stdout.
pub fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = run_faultline_in_dir(dir, args);
    assert!(
        output.status.success(),
        "faultline {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run faultline with `--json` and parse stdout.
pub fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let stdout = run_ok(dir, &full);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

/// Extract a JSON array of strings.
pub fn string_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected array")
        .iter()
        .map(|v| v.as_str().expect("expected string").to_string())
        .collect()
}
