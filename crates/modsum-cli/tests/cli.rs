//! Exit codes and output channels of the `modsum` binary

use modsum_codec::write_summary;
use modsum_core::{guid_of, Call, FunctionSummary, ModuleSummaryIndex};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn modsum(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_modsum"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run modsum")
}

fn make_program(dir: &Path) -> PathBuf {
    let mut index = ModuleSummaryIndex::new("Program");
    let mut main = FunctionSummary::with_name(guid_of("main"), "main");
    main.add_call(Call::direct(guid_of("helper"), "helper"));
    index.insert_function(main).unwrap();
    index
        .insert_function(FunctionSummary::with_name(guid_of("helper"), "helper"))
        .unwrap();
    index
        .insert_function(FunctionSummary::with_name(guid_of("orphan"), "orphan"))
        .unwrap();

    let path = dir.join("program.summary");
    write_summary(&index, &path).unwrap();
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_lto_success_prints_trace_on_stderr() {
    let dir = TempDir::new().unwrap();
    let input = make_program(dir.path());
    let output = dir.path().join("out.summary");

    let result = modsum(&[
        "lto",
        path_str(&input),
        "-o",
        path_str(&output),
        "--print-live-trace",
        "helper",
    ]);

    assert_eq!(result.status.code(), Some(0));
    assert!(output.exists());
    assert!(result.stdout.is_empty());
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("helper is referenced by:"));
    assert!(stderr.contains(" - main ("));
}

#[test]
fn test_lto_trace_silent_for_dead_symbol() {
    let dir = TempDir::new().unwrap();
    let input = make_program(dir.path());
    let output = dir.path().join("out.summary");

    let result = modsum(&[
        "lto",
        path_str(&input),
        "-o",
        path_str(&output),
        "--print-live-trace",
        "orphan",
    ]);

    assert_eq!(result.status.code(), Some(0));
    assert!(result.stderr.is_empty());
}

#[test]
fn test_lto_missing_input_exits_one() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.summary");
    let output = dir.path().join("out.summary");

    let result = modsum(&["lto", path_str(&missing), "-o", path_str(&output)]);

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.starts_with("error[E-CODEC-001]"));
    assert!(stderr.contains("nope.summary"));
    assert!(!output.exists());
}

#[test]
fn test_lto_duplicate_guid_exits_two() {
    let dir = TempDir::new().unwrap();
    let input = make_program(dir.path());
    let output = dir.path().join("out.summary");

    let result = modsum(&[
        "lto",
        path_str(&input),
        path_str(&input),
        "-o",
        path_str(&output),
    ]);

    assert_eq!(result.status.code(), Some(2));
    assert!(String::from_utf8(result.stderr)
        .unwrap()
        .starts_with("error[E-MERGE-001]"));
    assert!(!output.exists());
}

#[test]
fn test_dump_dead_only() {
    let dir = TempDir::new().unwrap();
    let input = make_program(dir.path());
    let output = dir.path().join("out.summary");
    assert!(modsum(&["lto", path_str(&input), "-o", path_str(&output)])
        .status
        .success());

    let result = modsum(&["dump", path_str(&output), "--dead-only"]);
    assert_eq!(result.status.code(), Some(0));
    assert_eq!(String::from_utf8(result.stdout).unwrap(), "orphan\n");
}
