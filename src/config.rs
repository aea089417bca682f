//! Process-wide configuration, read once from the environment at first use.
//!
//! Interposed exec calls may race to touch `CONFIG` first; `Lazy` makes the
//! init idempotent and the result is read-only afterwards, so no locking is
//! needed on the hot path.

use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

use crate::util::parse_csv_env;

/// Canonical foreign-ABI path markers. One configurable set
/// (`ABI_BRIDGE_MARKERS`, CSV); substring matching against the full target
/// path, never a filesystem or binary-header check.
pub const DEFAULT_MARKERS: &[&str] = &["/.local/alpine/", "/alpine/", "x86_64-alpine-linux-musl"];

/// Base environment image for sandboxed delegation.
pub const DEFAULT_IMAGE: &str = "alpine:latest";

/// Fixed workspace mount point inside the sandbox.
pub const WORKSPACE_DIR: &str = "/workspace";

/// Alternate-runtime installation root, relative to the user's profile
/// (or the working directory as a last resort).
pub const INSTALL_ROOT_REL: &str = ".local/alpine";

/// Dynamic loader location relative to the installation root.
pub const LOADER_REL: &str = "lib/ld-musl-x86_64.so.1";

/// Which redirection strategy this deployment commits to. Exactly one active
/// strategy per process; the unmodified real primitive is always the fallback.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, clap::ValueEnum)]
pub enum Strategy {
    /// Re-exec every foreign binary under the alternate dynamic loader
    /// (replaces the process image).
    Loader,
    /// Delegate foreign toolchain subprocesses to an isolated container
    /// (spawn and wait, forward exit status).
    Sandbox,
    /// Pass everything through unmodified.
    Off,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Loader => "loader",
            Strategy::Sandbox => "sandbox",
            Strategy::Off => "off",
        }
    }
}

pub fn parse_strategy(s: &str) -> Option<Strategy> {
    match s.trim().to_ascii_lowercase().as_str() {
        "loader" | "ld" => Some(Strategy::Loader),
        "sandbox" | "container" | "docker" => Some(Strategy::Sandbox),
        "off" | "none" | "0" => Some(Strategy::Off),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Diagnostic stream toggle (`ABI_BRIDGE_DEBUG`). Off = fully silent shim.
    pub debug: bool,
    pub strategy: Strategy,
    pub markers: Vec<String>,
    /// Explicit installation root (`ABI_BRIDGE_ROOT`), overriding the profile
    /// convention.
    pub root_override: Option<PathBuf>,
    pub image: String,
}

impl Config {
    pub fn from_env() -> Self {
        let debug = env_flag("ABI_BRIDGE_DEBUG");
        let strategy = env::var("ABI_BRIDGE_STRATEGY")
            .ok()
            .and_then(|v| parse_strategy(&v))
            .unwrap_or(Strategy::Loader);
        let markers = parse_csv_env("ABI_BRIDGE_MARKERS", DEFAULT_MARKERS);
        let root_override = env::var("ABI_BRIDGE_ROOT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let image = env::var("ABI_BRIDGE_IMAGE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string());
        Config {
            debug,
            strategy,
            markers,
            root_override,
            image,
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

fn env_flag(name: &str) -> bool {
    matches!(env::var(name).ok().as_deref(), Some(v) if !v.is_empty() && v != "0")
}
