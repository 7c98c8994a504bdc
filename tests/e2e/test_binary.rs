//! Integration tests for the mermaid-scene binary.
//!
//! These tests run the compiled binary and check its JSON output and exit codes.

#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run the binary with the given stdin input and extra CLI args.
fn run_binary(input: &str, extra_args: &[&str]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mermaid-scene"))
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run binary");
    if let Some(ref mut stdin) = child.stdin {
        stdin.write_all(input.as_bytes()).ok();
    }
    child.wait_with_output().expect("Failed to wait for binary")
}

fn run_json(input: &str, extra_args: &[&str]) -> serde_json::Value {
    let output = run_binary(input, extra_args);
    assert!(
        output.status.success(),
        "Binary exited with {:?}:\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn count_type(scene: &serde_json::Value, ty: &str) -> usize {
    scene["elements"]
        .as_array()
        .expect("elements array")
        .iter()
        .filter(|e| e["type"] == ty)
        .count()
}

#[test]
fn test_flowchart_from_stdin() {
    let scene = run_json("flowchart TD\n A[Start] --> B{Check}\n B --> C[End]\n", &[]);
    assert_eq!(count_type(&scene, "diamond"), 1);
    assert_eq!(count_type(&scene, "rectangle"), 2);
    assert_eq!(count_type(&scene, "arrow"), 2);
    assert_eq!(scene["texts"].as_array().unwrap().len(), 3);
}

#[test]
fn test_sequence_pretty_output() {
    let output = run_binary("sequenceDiagram\n A->>B: hi\n", &["--pretty"]);
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("\n  \"elements\""));
    let scene: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(count_type(&scene, "line"), 2);
}

#[test]
fn test_seed_flag_is_deterministic() {
    let a = run_json("erDiagram\n A ||--o{ B : has\n", &["--seed", "42"]);
    let b = run_json("erDiagram\n A ||--o{ B : has\n", &["--seed", "42"]);
    assert_eq!(a, b);
}

#[test]
fn test_input_file_and_output_file() {
    let dir = std::env::temp_dir().join(format!("mermaid-scene-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("in.mmd");
    let out = dir.join("out.json");
    std::fs::write(&input, "graph LR\n A --> B\n").unwrap();
    let output = run_binary(
        "",
        &[input.to_str().unwrap(), "-o", out.to_str().unwrap()],
    );
    assert!(output.status.success());
    let scene: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(count_type(&scene, "arrow"), 1);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_unknown_dialect_fails() {
    let output = run_binary("pie title Pets\n", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized diagram type"));
}

#[test]
fn test_invalid_direction_fails() {
    let output = run_binary("flowchart TD\n A --> B\n", &["-d", "UP"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown direction"));
}
