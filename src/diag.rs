//! stderr diagnostics: one-line messages with optional ANSI color.
//!
//! Logging helpers policy (stderr one-liners):
//! - info/warn/error helpers for the launcher; exact message strings are kept,
//!   helpers only add color when enabled.
//! - debug_print is the shim-side diagnostic stream: gated solely on the
//!   configured debug toggle, silent otherwise.

use clap::ValueEnum;
use once_cell::sync::OnceCell;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

static COLOR_MODE: OnceCell<ColorMode> = OnceCell::new();

pub fn set_color_mode(mode: ColorMode) {
    let _ = COLOR_MODE.set(mode);
}

fn color_enabled_stderr() -> bool {
    // Respect NO_COLOR first: disables color unconditionally (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    match COLOR_MODE.get().copied().unwrap_or(ColorMode::Auto) {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => atty::is(atty::Stream::Stderr),
    }
}

pub fn info_print(msg: &str) {
    eprintln!("abi-bridge: {msg}");
}

pub fn warn_print(msg: &str) {
    if color_enabled_stderr() {
        eprintln!("\x1b[33;1mabi-bridge:\x1b[0m {msg}");
    } else {
        eprintln!("abi-bridge: {msg}");
    }
}

pub fn error_print(msg: &str) {
    if color_enabled_stderr() {
        eprintln!("\x1b[31;1mabi-bridge:\x1b[0m {msg}");
    } else {
        eprintln!("abi-bridge: {msg}");
    }
}

/// Shim diagnostic stream; every classification hit, rewritten command, and
/// fallback goes through here when the debug toggle is set.
pub fn debug_print(msg: &str) {
    if crate::config::CONFIG.debug {
        eprintln!("abi-bridge: {msg}");
    }
}
