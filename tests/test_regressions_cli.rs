use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::tempdir;

const LOG: &str = "\
boot
[01/02/2023, 00:00:00] service started
  stack frame
[02/02/2023, 10:30:00] request served
[03/02/2023, 23:59:59] shutting down";

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_log-browser")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn stdout_of(output: &std::process::Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_view_prints_matching_lines_and_count() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(&log, LOG);

    let output = Command::new(bin())
        .args([
            "--color",
            "never",
            "view",
            "--highlight",
            "none",
            log.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[01/02/2023, 00:00:00] service started",
            "[02/02/2023, 10:30:00] request served",
            "[03/02/2023, 23:59:59] shutting down",
            "3 lines found",
        ]
    );
}

#[test]
fn test_view_reverse_with_day_filter() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(
        &log,
        "[01/02/2023, 00:00:00] a\n[02/02/2023, 00:00:00] b\n[01/03/2023, 00:00:00] c",
    );

    let output = Command::new(bin())
        .args([
            "view",
            "--highlight",
            "brackets",
            "--reverse",
            "--day",
            "1",
            log.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "«[01/03/2023, 00:00:00]» c",
            "«[01/02/2023, 00:00:00]» a",
            "2 lines found",
        ]
    );
}

#[test]
fn test_view_json_from_stdin() {
    let mut child = Command::new(bin())
        .args(["view", "-F", "json", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("command should spawn");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(b"a\n[01/02/2023, 00:00:00] hello\nb")
        .expect("write stdin");

    let output = child.wait_with_output().expect("command should finish");
    let stdout = stdout_of(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");

    assert_eq!(json["lineCount"], 1);
    assert_eq!(json["totalLines"], 3);
    assert_eq!(
        json["lines"][0]["displayLine"],
        "<span class=\"log-date\">[01/02/2023, 00:00:00]</span> hello"
    );
}

#[test]
fn test_output_file_gets_plain_text() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    let out = dir.path().join("copied.txt");
    write_file(&log, LOG);

    let output = Command::new(bin())
        .args([
            "view",
            "--hour",
            "10",
            "-o",
            out.to_str().expect("utf8 path"),
            log.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");
    stdout_of(&output);

    let copied = fs::read_to_string(&out).expect("output file should exist");
    assert_eq!(copied, "[02/02/2023, 10:30:00] request served");
}

#[test]
fn test_custom_date_format_from_config() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    let config = dir.path().join("browser.toml");
    write_file(&log, "2024-06-01 09:00:13 up\n[01/02/2023, 00:00:00] old");
    write_file(&config, "date_format = \"Y-m-d H:i:s\"\nhighlight = \"none\"\n");

    let output = Command::new(bin())
        .args([
            "--config",
            config.to_str().expect("utf8 path"),
            "view",
            log.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    let stdout = stdout_of(&output);
    assert_eq!(stdout, "2024-06-01 09:00:13 up\n1 lines found\n");
}

#[test]
fn test_rule_command_prints_pattern() {
    let output = Command::new(bin())
        .args(["rule", "--month", "7"])
        .output()
        .expect("command should run");

    let stdout = stdout_of(&output);
    assert_eq!(
        stdout.trim_end(),
        r"(\[[0-9]{2}\/07\/[0-9]{4}, [0-9]{2}:[0-9]{2}:[0-9]{2}\])"
    );
}

#[test]
fn test_rule_command_rejects_invalid_pattern() {
    let output = Command::new(bin())
        .args(["rule", "--year", "("])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid pattern"), "stderr: {stderr}");
}

#[test]
fn test_missing_log_file_fails() {
    let dir = tempdir().expect("temp dir");
    let output = Command::new(bin())
        .args([
            "view",
            dir.path().join("nope.log").to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load log"), "stderr: {stderr}");
}

#[test]
fn test_shell_session() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(&log, LOG);

    let mut child = Command::new(bin())
        .args(["--color", "never", "shell"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("command should spawn");

    let script = format!(
        "load {}\nday 3\nstatus\nclose\ny\nstatus\nquit\n",
        log.display()
    );
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(script.as_bytes())
        .expect("write stdin");

    let output = child.wait_with_output().expect("command should finish");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("shutting down"));
    assert!(stdout.contains("1 lines found"));
    assert!(stdout.contains("status: IDLE"));
    assert!(stdout.contains("status: PENDING_LOG"));
}
