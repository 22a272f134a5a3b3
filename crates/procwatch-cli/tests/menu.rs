use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn exit_choice_ends_the_session() {
    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level").arg("error").write_stdin("5\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PROCESS MANAGEMENT"))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn end_of_input_ends_the_session() {
    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level").arg("error").write_stdin("");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PROCESS MANAGEMENT"));
}

#[test]
fn invalid_menu_choice_recovers() {
    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level").arg("error").write_stdin("9\n5\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice"))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn list_processes_prints_a_table() {
    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level").arg("error").write_stdin("1\n5\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PROCESS LIST"))
        .stdout(predicate::str::contains("PID"))
        .stdout(predicate::str::contains("Shown:"));
}

#[test]
fn terminate_unknown_name_reports_not_found() {
    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level")
        .arg("error")
        .write_stdin("2\nno-such-process-zzz\n5\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "No process matching 'no-such-process-zzz'",
        ))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
#[cfg(unix)]
fn terminate_child_by_pid_succeeds() {
    let mut child = std::process::Command::new("sleep")
        .arg("60")
        .spawn()
        .expect("spawn sleep");
    let pid = child.id();

    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level")
        .arg("error")
        .write_stdin(format!("2\n{pid}\ny\n5\n"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("(PID: {pid})")))
        .stdout(predicate::str::contains(format!("Process {pid} terminated")));

    child.wait().expect("reap child");
}

#[test]
#[cfg(unix)]
fn terminate_declined_confirmation_leaves_process_running() {
    let mut child = std::process::Command::new("sleep")
        .arg("60")
        .spawn()
        .expect("spawn sleep");
    let pid = child.id();

    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level")
        .arg("error")
        .write_stdin(format!("2\n{pid}\nn\n5\n"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    // Still alive: the kill below should succeed.
    child.kill().expect("child should still be running");
    child.wait().expect("reap child");
}

#[test]
#[cfg(unix)]
fn monitor_vanished_pid_reports_not_found() {
    // Spawn and fully reap a child so its pid is gone before we monitor it.
    let mut child = std::process::Command::new("true")
        .spawn()
        .expect("spawn true");
    let pid = child.id();
    child.wait().expect("reap child");

    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level")
        .arg("error")
        .write_stdin(format!("3\n2\n{pid}\n5\n"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("Process {pid} not found")));
}

#[test]
fn system_resources_prints_overview() {
    let mut cmd = cargo_bin_cmd!("procwatch");
    cmd.arg("--log-level").arg("error").write_stdin("4\n5\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SYSTEM RESOURCES"))
        .stdout(predicate::str::contains("CPU (all cores):"))
        .stdout(predicate::str::contains("Memory:"));
}
