//! abi-bridge: exec interception and redirection for foreign-ABI toolchain
//! binaries.
//!
//! A build toolchain running on a glibc host occasionally spawns binaries
//! compiled against musl (an Alpine cross toolchain, for instance). Those
//! execs fail or misbehave under the native loader. This crate intercepts the
//! exec family process-wide and redirects such targets:
//!
//! - **Loader substitution** re-execs the target under the alternate dynamic
//!   loader, replacing the process image.
//! - **Sandboxed delegation** runs toolchain subprocesses inside a network-
//!   isolated container with the working directory and target bind-mounted,
//!   forwarding the exit status.
//!
//! Classification is a cheap path-string heuristic (marker substrings plus
//! known compiler-subprocess basenames); when it misses, or when any part of
//! a redirection cannot be applied, the original request reaches the real
//! primitive untouched. The library doubles as the implementation of the
//! `libabi_bridge.so` preload object (see [`interpose`]) and of the
//! `abi-bridge` launcher binary.

pub mod banner;
pub mod classify;
pub mod config;
pub mod diag;
pub mod doctor;
pub mod errors;
pub mod loader;
pub mod resolve;
pub mod sandbox;
pub mod util;

#[cfg(target_os = "linux")]
pub mod interpose;

pub use classify::{basename, classify, classify_with, Classification, TOOLCHAIN_SUBPROCESSES};
pub use config::{parse_strategy, Config, Strategy, CONFIG, DEFAULT_MARKERS};
pub use diag::ColorMode;
pub use errors::exit_code_for_io_error;
pub use loader::{install_root, loader_path, substitute_loader, substitute_with, Substitution};
pub use resolve::{is_executable, resolve_on_path, search_dirs};
pub use sandbox::{
    build_sandbox_cmd, container_runtime_path, delegate, sandbox_args, sandbox_preview,
};
pub use util::{shell_escape, shell_join};
