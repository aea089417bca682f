//! End-to-end interposition coverage: the launcher attaches the preload
//! object to /bin/sh, and the shell's own exec calls get intercepted.
#![cfg(target_os = "linux")]

mod common;

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn launcher() -> &'static str {
    env!("CARGO_BIN_EXE_abi-bridge")
}

fn shim_missing(stderr: &str) -> bool {
    stderr.contains("not found next to")
}

#[test]
fn test_passthrough_preserves_output_and_status() {
    let out = Command::new(launcher())
        .args(["run", "--quiet", "--", "/bin/echo", "hello"])
        .output()
        .expect("failed to run abi-bridge");
    let err = String::from_utf8_lossy(&out.stderr);
    if shim_missing(&err) {
        eprintln!("skipping: shim object not present in this build layout");
        return;
    }
    assert!(out.status.success(), "stderr:\n{err}");
    assert_eq!(String::from_utf8_lossy(&out.stdout), "hello\n");
}

#[test]
fn test_missing_command_maps_to_127() {
    let out = Command::new(launcher())
        .args(["run", "--quiet", "--", "/nonexistent/abi-bridge-test-cmd"])
        .output()
        .expect("failed to run abi-bridge");
    let err = String::from_utf8_lossy(&out.stderr);
    if shim_missing(&err) {
        eprintln!("skipping: shim object not present in this build layout");
        return;
    }
    assert_eq!(out.status.code(), Some(127), "stderr:\n{err}");
    assert!(err.contains("failed to start"), "stderr:\n{err}");
}

#[test]
fn test_sandbox_interception_falls_back_without_docker() {
    let tmp = TempDir::new().expect("tempdir");
    let alpine = tmp.path().join(".local").join("alpine");
    fs::create_dir_all(&alpine).expect("mkdir marker dir");
    let cc1 = common::write_script(&alpine, "cc1", "#!/bin/sh\necho native-ran \"$@\"\n");

    let cmdline = format!("'{}' -quiet in.c", cc1.display());
    let out = Command::new(launcher())
        .args([
            "run",
            "--quiet",
            "--strategy",
            "sandbox",
            "--debug",
            "--",
            "/bin/sh",
            "-c",
            cmdline.as_str(),
        ])
        .env("ABI_BRIDGE_SKIP_DOCKER", "1")
        .output()
        .expect("failed to run abi-bridge");
    let err = String::from_utf8_lossy(&out.stderr);
    if shim_missing(&err) {
        eprintln!("skipping: shim object not present in this build layout");
        return;
    }
    // Delegation cannot run (no runtime), so the original request executes
    // natively; the true outcome of the program is preserved.
    assert!(out.status.success(), "stderr:\n{err}");
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "native-ran -quiet in.c\n"
    );
    assert!(err.contains("intercepted foreign binary"), "stderr:\n{err}");
    assert!(err.contains("sandbox delegation failed"), "stderr:\n{err}");
}

#[test]
fn test_loader_substitution_end_to_end() {
    let tmp = TempDir::new().expect("tempdir");

    // Fake alternate runtime: a script stands in for the dynamic loader and
    // reports the argument vector it was handed.
    let root = tmp.path().join("alt-root");
    let lib = root.join("lib");
    fs::create_dir_all(&lib).expect("mkdir lib");
    common::write_script(
        &lib,
        "ld-musl-x86_64.so.1",
        "#!/bin/sh\necho loader-invoked \"$@\"\n",
    );

    // Foreign target: marker directory in the path.
    let bindir = tmp.path().join(".local").join("alpine").join("bin");
    fs::create_dir_all(&bindir).expect("mkdir bin");
    let gcc = common::write_script(&bindir, "gcc", "#!/bin/sh\necho should-not-run\n");

    let cmdline = format!("'{}' -O2 main.c", gcc.display());
    let out = Command::new(launcher())
        .args([
            "run",
            "--quiet",
            "--strategy",
            "loader",
            "--debug",
            "--",
            "/bin/sh",
            "-c",
            cmdline.as_str(),
        ])
        .env("ABI_BRIDGE_ROOT", &root)
        .output()
        .expect("failed to run abi-bridge");
    let err = String::from_utf8_lossy(&out.stderr);
    if shim_missing(&err) {
        eprintln!("skipping: shim object not present in this build layout");
        return;
    }
    assert!(out.status.success(), "stderr:\n{err}");
    // The loader sees [original_target, original_args...]; the target itself
    // never runs directly.
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        format!("loader-invoked {} -O2 main.c\n", gcc.display())
    );
    assert!(err.contains("redirecting to loader"), "stderr:\n{err}");
}
