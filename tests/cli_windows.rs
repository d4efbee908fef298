//! End-to-end tests of the fastats binary.
//!
//! Tests cover:
//! 1. Window commands on files and stdin
//! 2. Sorting in memory versus inline validation with --sorted
//! 3. Error reporting and exit codes

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

/// Helper to create a temporary BED file.
fn create_bed_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// Helper to run fastats and return output.
fn run_fastats(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fastats"))
        .args(args)
        .output()
        .expect("Failed to run fastats")
}

/// Helper to run fastats with `input` piped to stdin.
fn run_fastats_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_fastats"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn fastats");
    // The child may exit before reading (e.g. bad arguments); ignore EPIPE.
    let _ = child.stdin.take().unwrap().write_all(input.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// Test fixtures
// =============================================================================

/// Two-record BedGraph used across commands.
fn bedgraph() -> &'static str {
    "chr1\t5\t25\t1.18\nchr1\t25\t30\t1.19\n"
}

/// Same records with positions out of order.
fn unsorted_bedgraph() -> &'static str {
    "chr1\t25\t30\t1.19\nchr1\t5\t25\t1.18\n"
}

// =============================================================================
// Window commands
// =============================================================================

#[test]
fn test_mean_win_unit_records() {
    let bed = create_bed_file("chr1\t0\t2\t2\nchr1\t2\t5\tNaN\nchr1\t5\t6\t4\n");
    let output = run_fastats(&[
        "mean-win",
        "-i",
        bed.path().to_str().unwrap(),
        "-w",
        "10",
        "-s",
        "10",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "chr1\t0\t10\t2.0\n");
}

#[test]
fn test_mean_win_sorts_unsorted_input() {
    let sorted = run_fastats_stdin(&["mean-win", "-w", "10", "-s", "5"], bedgraph());
    let unsorted = run_fastats_stdin(&["mean-win", "-w", "10", "-s", "5"], unsorted_bedgraph());
    assert!(sorted.status.success());
    assert!(unsorted.status.success());
    assert_eq!(stdout(&sorted), stdout(&unsorted));
}

#[test]
fn test_sorted_flag_rejects_unsorted_input() {
    let output = run_fastats_stdin(&["avg-win", "--sorted"], unsorted_bedgraph());
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not sorted"));
}

#[test]
fn test_sorted_flag_rejects_decreasing_ends() {
    let output = run_fastats_stdin(&["sum-win", "--sorted"], "chr1\t5\t25\t1\nchr1\t5\t10\t2\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not sorted"));
}

#[test]
fn test_avg_win_windows() {
    let output = run_fastats_stdin(
        &["avg-win", "-w", "10", "-s", "10", "--sorted"],
        "chr1\t5\t25\t1.5\nchr1\t25\t30\t2.5\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["chr1\t0\t10\t1.5", "chr1\t10\t20\t1.5", "chr1\t20\t30\t2.0"]);
}

#[test]
fn test_sum_win_per_bp() {
    let output = run_fastats_stdin(
        &["sum-win", "-w", "4", "-s", "4", "--per-bp", "--sorted"],
        "chr1\t0\t1\t2\nchr1\t1\t2\t6\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "chr1\t0\t4\t2.0\n");
}

#[test]
fn test_autocorr_windows() {
    let output = run_fastats_stdin(
        &["autocorr", "-l", "1", "-w", "4", "-s", "4"],
        "chr1\t0\t1\t1\nchr1\t1\t2\t-1\nchr1\t2\t3\t1\nchr1\t3\t4\t-1\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "chr1\t0\t4\t-0.75\n");
}

#[test]
fn test_autocorr_writes_lags_in_order() {
    let output = run_fastats_stdin(
        &["autocorr", "-l", "3", "-w", "4", "-s", "4"],
        "chr1\t0\t1\t1\nchr1\t1\t2\t-1\nchr1\t2\t3\t1\nchr1\t3\t4\t-1\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "chr1\t0\t4\t-0.75\t0.5\t-0.25\n");
}

#[test]
fn test_sort_command() {
    let bed = create_bed_file("chr2\t0\t10\tb\nchr1\t5\t8\ta\nchr1\t1\t2\n");
    let output = run_fastats(&["sort", "-i", bed.path().to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "chr1\t1\t2\nchr1\t5\t8\ta\nchr2\t0\t10\tb\n");
}

#[test]
fn test_stats_go_to_stderr() {
    let output = run_fastats_stdin(&["--stats", "sum-win", "-w", "10", "-s", "10"], bedgraph());
    assert!(output.status.success());
    assert!(stderr(&output).contains("Windows: 3"));
    assert!(!stdout(&output).contains("Windows"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_zero_window_size_rejected() {
    let output = run_fastats_stdin(&["mean-win", "-w", "0"], bedgraph());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("window size must be positive"));
}

#[test]
fn test_malformed_line_reports_line_number() {
    let output = run_fastats_stdin(&["avg-win"], "chr1\t0\t5\t1\nchr1\t7\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line 2"));
}

#[test]
fn test_missing_file() {
    let output = run_fastats(&["sort", "-i", "/nonexistent/input.bed"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error:"));
}
