use assert_cmd::Command;

fn typemaster() -> Command {
    Command::cargo_bin("typemaster").unwrap()
}

#[test]
fn refuses_to_run_without_a_tty() {
    let output = typemaster().write_stdin("").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"));
}

#[test]
fn help_lists_the_options() {
    let output = typemaster().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--difficulty"));
    assert!(stdout.contains("--seconds"));
    assert!(stdout.contains("--prompt"));
}

#[test]
fn rejects_unknown_difficulty() {
    let output = typemaster()
        .args(["-d", "impossible"])
        .write_stdin("")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("impossible"));
}
