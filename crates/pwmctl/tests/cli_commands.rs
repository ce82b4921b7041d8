#![cfg(all(unix, feature = "cli"))]

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use pwmctl::frame::{encode_readings, Reading};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/pwmctl-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// A regular file stands in for the serial device.
fn port_with(tag: &str, contents: &[u8]) -> (PathBuf, PathBuf) {
    let dir = unique_temp_dir(tag);
    let port = dir.join("tty");
    std::fs::write(&port, contents).expect("port file should be writable");
    (dir, port)
}

fn pwmctl(args: &[&str], port: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pwmctl"))
        .arg("--log-level")
        .arg("error")
        .args(&args[..1])
        .arg(port)
        .args(&args[1..])
        .output()
        .expect("pwmctl should run")
}

fn frame(readings: &[Reading]) -> Vec<u8> {
    encode_readings(readings).expect("readings should encode")
}

#[test]
fn throttle_writes_ascii_command() {
    let (dir, port) = port_with("throttle", b"");

    let output = pwmctl(&["throttle", "A", "37"], &port);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(std::fs::read(&port).unwrap(), b"A.37\r");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn throttle_keeps_fractional_percent() {
    let (dir, port) = port_with("throttle-frac", b"");

    let output = Command::new(env!("CARGO_BIN_EXE_pwmctl"))
        .args(["--log-level", "error", "--format", "json", "throttle"])
        .arg(&port)
        .args(["D", "12.5"])
        .output()
        .expect("pwmctl should run");

    assert!(output.status.success(), "{output:?}");
    assert_eq!(std::fs::read(&port).unwrap(), b"D.12.5\r");
    let line = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(line.trim()).expect("json output");
    assert_eq!(json["command"], "throttle");
    assert_eq!(json["bytes"], 7);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_motor_is_usage_error_without_write() {
    let (dir, port) = port_with("bad-motor", b"");

    let output = pwmctl(&["throttle", "a", "10"], &port);

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
    assert!(std::fs::read(&port).unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn out_of_range_percent_is_usage_error_without_write() {
    let (dir, port) = port_with("bad-percent", b"");

    for percent in ["-1", "100.5"] {
        let output = pwmctl(&["throttle", "B", percent], &port);
        assert_eq!(output.status.code(), Some(64), "percent {percent}");
    }

    assert!(std::fs::read(&port).unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn reset_and_kill_write_single_opcodes() {
    let (dir, port) = port_with("opcodes", b"");
    let output = pwmctl(&["reset"], &port);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(std::fs::read(&port).unwrap(), [0x20]);

    std::fs::write(&port, b"").unwrap();
    let output = pwmctl(&["kill"], &port);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(std::fs::read(&port).unwrap(), [0x5C]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_port_fails_before_writing() {
    let missing = PathBuf::from(format!("/tmp/pwmctl-missing-{}", std::process::id()));

    let output = pwmctl(&["reset"], &missing);

    assert_eq!(output.status.code(), Some(64));
    assert!(!missing.exists());
}

#[test]
fn stream_prints_filtered_readings_as_json_lines() {
    let mut contents = frame(&[]);
    contents.extend(frame(&[
        Reading::acc(0.0, 0.0, 1.0),
        Reading::gyro(1.5, 0.0, 0.0),
        Reading::mag(20.0, -3.0, 40.0),
    ]));
    contents.extend(frame(&[Reading::acc(0.5, 0.0, 1.0)]));
    let (dir, port) = port_with("stream", &contents);

    let output = pwmctl(
        &["stream", "--format", "json", "--disable", "gyro", "--count", "3"],
        &port,
    );

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect();
    let kinds: Vec<&str> = lines.iter().map(|v| v["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["acc", "mag", "acc"]);
    assert_eq!(lines[1]["unit"], "uT");
    assert_eq!(lines[1]["y"], -3.0);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn stream_enable_restores_disabled_kind() {
    let mut contents = frame(&[]);
    contents.extend(frame(&[
        Reading::gyro(1.0, 2.0, 3.0),
        Reading::mag(4.0, 5.0, 6.0),
    ]));
    let (dir, port) = port_with("stream-enable", &contents);

    let output = pwmctl(
        &[
            "stream",
            "--format",
            "json",
            "--disable",
            "gyro,mag",
            "--enable",
            "gyro",
            "--count",
            "1",
        ],
        &port,
    );

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("\"kind\":\"gyro\""));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn stream_disabling_twice_is_usage_error() {
    let (dir, port) = port_with("stream-twice", &frame(&[]));

    let output = pwmctl(&["stream", "--disable", "mag,mag"], &port);

    assert_eq!(output.status.code(), Some(64));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn stream_ending_before_count_fails() {
    let mut contents = frame(&[]);
    contents.extend(frame(&[Reading::acc(0.0, 0.0, 1.0)]));
    let (dir, port) = port_with("stream-eof", &contents);

    let output = pwmctl(&["stream", "--format", "pretty", "--count", "5"], &port);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_frame_after_priming_is_data_invalid() {
    let mut contents = frame(&[]);
    // COBS-valid, but announces seven readings that never follow.
    contents.extend([0x02, 0x07, 0x00]);
    let (dir, port) = port_with("stream-malformed", &contents);

    let output = pwmctl(&["stream", "--count", "1"], &port);

    assert_eq!(output.status.code(), Some(60));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ctrl_c_ends_stream_blocked_on_silent_port() {
    let dir = unique_temp_dir("stream-sigint");
    let fifo = dir.join("tty");
    let c_path = std::ffi::CString::new(fifo.to_str().unwrap()).unwrap();
    // SAFETY: `c_path` is a valid NUL-terminated path.
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

    let mut child = Command::new(env!("CARGO_BIN_EXE_pwmctl"))
        .args(["--log-level", "debug", "stream"])
        .arg(&fifo)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("stream should start");

    // The first input clear happens after the Ctrl-C handler is installed,
    // right before the read that blocks forever.
    let mut stderr = BufReader::new(child.stderr.take().unwrap());
    let mut line = String::new();
    while !line.contains("cleared input buffer") {
        line.clear();
        let read = stderr.read_line(&mut line).expect("stderr should be readable");
        assert!(read > 0, "stream exited before priming");
    }
    std::thread::sleep(Duration::from_millis(100));

    // SAFETY: signals a child process this test spawned and still owns.
    assert_eq!(unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGINT) }, 0);

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().expect("child should be waitable") {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("stream still running after Ctrl-C");
        }
        std::thread::sleep(Duration::from_millis(25));
    };

    assert_eq!(status.code(), Some(0));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_extended_names_binary() {
    let output = Command::new(env!("CARGO_BIN_EXE_pwmctl"))
        .args(["version", "--extended"])
        .output()
        .expect("pwmctl should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: pwmctl"));
    assert!(stdout.contains("frame_delimiter: 0x00"));
}
