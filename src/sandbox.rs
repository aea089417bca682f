//! Sandboxed delegation: run a foreign toolchain subprocess to completion
//! inside an isolated container, forwarding its exit status.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use which::which;

use crate::config::{CONFIG, WORKSPACE_DIR};
use crate::diag::debug_print;
use crate::util::shell_escape;

/// Locate the container runtime on PATH.
pub fn container_runtime_path() -> io::Result<PathBuf> {
    // Allow tests or callers to explicitly disable Docker detection to avoid hard failures
    if env::var("ABI_BRIDGE_SKIP_DOCKER").ok().as_deref() == Some("1") {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Docker disabled by environment override.",
        ));
    }
    if let Ok(p) = which("docker") {
        return Ok(p);
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "Docker is required but was not found in PATH.",
    ))
}

/// Argument vector for the container runtime, without the runtime path itself.
///
/// The working directory is mounted read-write at the fixed workspace path and
/// the target binary is bind-mounted read-only at its own absolute path, so
/// the in-container invocation sees the host path as argv[0]. Arguments ride
/// on the argv vector as-is; nothing here passes through a shell.
pub fn sandbox_args(target: &Path, argv: &[OsString], cwd: &Path, image: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(argv.len() + 12);
    for f in ["run", "--rm", "-i", "--network=none"] {
        args.push(OsString::from(f));
    }
    args.push(OsString::from("-v"));
    args.push(OsString::from(format!(
        "{}:{}",
        cwd.display(),
        WORKSPACE_DIR
    )));
    args.push(OsString::from("-w"));
    args.push(OsString::from(WORKSPACE_DIR));
    args.push(OsString::from("-v"));
    args.push(OsString::from(format!(
        "{t}:{t}:ro",
        t = target.display()
    )));
    args.push(OsString::from(image));
    args.push(target.as_os_str().to_os_string());
    for a in argv.iter().skip(1) {
        args.push(a.clone());
    }
    args
}

/// One-line human preview of the full invocation, for diagnostics and
/// dry-run output. Arguments with spaces or quotes come out single-quoted.
pub fn sandbox_preview(runtime: &Path, args: &[OsString]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(args.len() + 1);
    parts.push(runtime.display().to_string());
    for a in args {
        parts.push(a.to_string_lossy().to_string());
    }
    parts
        .iter()
        .map(|p| shell_escape(p))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the delegation command plus its preview string.
///
/// Fails when the runtime is missing or the working directory cannot be
/// determined; both are infrastructure faults the caller recovers from by
/// falling back to the unmodified launch.
pub fn build_sandbox_cmd(target: &Path, argv: &[OsString]) -> io::Result<(Command, String)> {
    let runtime = container_runtime_path()?;
    let cwd = env::current_dir()?;
    let args = sandbox_args(target, argv, &cwd, &CONFIG.image);
    let preview = sandbox_preview(&runtime, &args);
    let mut cmd = Command::new(&runtime);
    cmd.args(&args);
    Ok((cmd, preview))
}

/// Run the delegated command to completion with inherited stdio and return
/// its exit code verbatim. No timeout, no retry: a non-zero code is the true
/// outcome of the redirected program and is never masked.
pub fn delegate(target: &Path, argv: &[OsString]) -> io::Result<i32> {
    let (mut cmd, preview) = build_sandbox_cmd(target, argv)?;
    debug_print(&format!("delegating: {preview}"));
    let status = cmd.status()?;
    let code = status.code().unwrap_or(1);
    debug_print(&format!("delegated command exited with {code}"));
    Ok(code)
}
