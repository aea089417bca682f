use std::process::Command;

#[test]
fn test_cli_dry_run_previews_exec_line() {
    let bin = env!("CARGO_BIN_EXE_abi-bridge");
    let out = Command::new(bin)
        .args([
            "run",
            "--dry-run",
            "--quiet",
            "--strategy",
            "loader",
            "--",
            "/usr/bin/ls",
            "-la",
        ])
        .output()
        .expect("failed to run abi-bridge run --dry-run");

    assert!(
        out.status.success(),
        "abi-bridge run --dry-run exited non-zero: {:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );

    let err = String::from_utf8_lossy(&out.stderr);
    assert!(
        err.contains("abi-bridge: exec: LD_PRELOAD="),
        "expected exec preview in stderr, got:\n{}",
        err
    );
    assert!(
        err.contains("/usr/bin/ls -la"),
        "expected wrapped command in preview, got:\n{}",
        err
    );
    assert!(
        err.contains("dry-run requested; not executing."),
        "expected dry-run notice, got:\n{}",
        err
    );
}

#[test]
fn test_cli_run_requires_a_command() {
    let bin = env!("CARGO_BIN_EXE_abi-bridge");
    let out = Command::new(bin)
        .args(["run", "--dry-run"])
        .output()
        .expect("failed to run abi-bridge run");
    assert!(
        !out.status.success(),
        "run without a command should fail argument parsing"
    );
}
