extern crate assert_cmd;
extern crate nix;
extern crate predicates;

use std::io::Write;
use std::process::{Command as StdCommand, Stdio};
use std::thread;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use predicates::prelude::*;
use predicates::str::contains;

const TIMEOUT: Duration = Duration::from_secs(10);

fn jsh() -> Command {
    let mut cmd = Command::cargo_bin("jsh").expect("binary should build");
    cmd.arg("-p");
    cmd
}

#[test]
fn test_quit_exits_cleanly() {
    jsh()
        .write_stdin("quit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_eof_exits_cleanly() {
    jsh().write_stdin("").timeout(TIMEOUT).assert().success();
}

#[test]
fn test_empty_and_blank_lines_are_ignored() {
    jsh()
        .write_stdin("\n   \nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_foreground_command_runs() {
    jsh()
        .write_stdin("echo hello\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn test_foreground_job_is_reaped_silently() {
    jsh()
        .write_stdin("/bin/true\njobs\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_background_job_is_announced_and_listed() {
    jsh()
        .write_stdin("sleep 5 &\njobs\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^\[1\] \(\d+\) sleep 5 &\n\[1\] \(\d+\) Running sleep 5 &\n$")
                .unwrap(),
        );
}

#[test]
fn test_background_jobs_get_sequential_ids() {
    jsh()
        .write_stdin("sleep 5 &\nsleep 5 &\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[1\] \(\d+\).*\n\[2\] \(\d+\).*\n$").unwrap());
}

#[test]
fn test_instantly_exiting_background_job_is_still_registered() {
    // The job must be announced (registration happened) even though the
    // child exits at once, and must be gone from the table afterwards.
    jsh()
        .write_stdin("/bin/true &\nsleep 1\njobs\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^\[1\] \(\d+\) /bin/true &\n$").unwrap(),
        );
}

#[test]
fn test_unknown_command_reports_not_found() {
    jsh()
        .write_stdin("no_such_program_zzz\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(contains("no_such_program_zzz: Command not found"));
}

#[test]
fn test_fg_with_unknown_job_id() {
    jsh()
        .write_stdin("fg %99\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("%99: No such job\n");
}

#[test]
fn test_fg_with_unknown_pid() {
    jsh()
        .write_stdin("fg 123456\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("(123456): No such process\n");
}

#[test]
fn test_fg_with_malformed_spec() {
    jsh()
        .write_stdin("fg %nope\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("fg: argument must be a PID or %jobid\n");
}

#[test]
fn test_fg_without_argument() {
    jsh()
        .write_stdin("fg\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("fg argument must be a PID or %jobid\n");
}

#[test]
fn test_bg_without_argument() {
    jsh()
        .write_stdin("bg\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("bg argument must be a PID or %jobid\n");
}

#[test]
fn test_foreground_job_killed_by_signal() {
    // The child kills its own process group, which holds only the child.
    jsh()
        .write_stdin("/bin/sh -c 'kill -KILL $$'\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Job \[1\] \(\d+\) terminated by signal 9\n").unwrap());
}

#[test]
fn test_stopped_job_is_reported_and_listed() {
    jsh()
        .write_stdin("/bin/sh -c 'kill -TSTP $$; echo resumed'\njobs\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(
            contains("stopped by signal 20")
                .and(contains("Stopped /bin/sh -c 'kill -TSTP $$; echo resumed'")),
        );
}

#[test]
fn test_bg_resumes_stopped_job() {
    // The trailing sleep keeps the shell in the foreground long enough for
    // the resumed job to print before quit.
    jsh()
        .write_stdin("/bin/sh -c 'kill -TSTP $$; echo resumed'\nbg %1\nsleep 1\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(
            contains("stopped by signal 20")
                .and(predicate::str::is_match(r"\[1\] \(\d+\) /bin/sh -c").unwrap())
                .and(contains("resumed")),
        );
}

#[test]
fn test_fg_resumes_stopped_job_and_waits() {
    jsh()
        .write_stdin("/bin/sh -c 'kill -TSTP $$; echo resumed'\nfg %1\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(contains("stopped by signal 20").and(contains("resumed")));
}

// Spawns the shell directly so a signal can be aimed at its pid while a
// foreground job is running, then feeds it the rest of `input` and collects
// stdout.
fn run_with_signal_to_shell(signal: Signal, input: &str) -> String {
    let mut shell = StdCommand::new(cargo_bin("jsh"))
        .arg("-p")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn shell");

    let mut stdin = shell.stdin.take().expect("shell stdin should be piped");
    stdin.write_all(b"sleep 5\n").expect("write command");
    stdin.flush().expect("flush command");

    // Give the shell time to fork the foreground job before signaling.
    thread::sleep(Duration::from_secs(1));
    kill(Pid::from_raw(shell.id() as i32), signal).expect("signal shell");
    thread::sleep(Duration::from_secs(1));

    stdin.write_all(input.as_bytes()).expect("write input");
    drop(stdin);

    let output = shell.wait_with_output().expect("wait for shell");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_suspend_key_is_forwarded_to_foreground_job() {
    let stdout = run_with_signal_to_shell(Signal::SIGTSTP, "jobs\nquit\n");
    assert!(
        stdout.contains("stopped by signal 20"),
        "stdout: {:?}",
        stdout
    );
    assert!(stdout.contains("Stopped sleep 5"), "stdout: {:?}", stdout);
}

#[test]
fn test_interrupt_key_is_forwarded_to_foreground_job() {
    let stdout = run_with_signal_to_shell(Signal::SIGINT, "jobs\nquit\n");
    assert!(
        stdout.contains("terminated by signal 2"),
        "stdout: {:?}",
        stdout
    );
    assert!(!stdout.contains("Running"), "stdout: {:?}", stdout);
}

#[test]
fn test_jobs_builtin_with_empty_table() {
    jsh()
        .write_stdin("jobs\nquit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_prompt_is_emitted_by_default() {
    let mut cmd = Command::cargo_bin("jsh").expect("binary should build");
    cmd.write_stdin("quit\n")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(contains("jsh> "));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("jsh").expect("binary should build");
    cmd.arg("--version")
        .timeout(TIMEOUT)
        .assert()
        .success()
        .stdout(contains("jsh version"));
}
