//! PATH resolution mirroring shell search semantics for bare command names.

use std::env;
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags};

/// True when `path` names an existing regular file the calling process may
/// execute.
pub fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

/// Resolve `name` against `dirs` in left-to-right order.
///
/// Names containing a separator are already paths and come back unchanged
/// without an existence check; the eventual launch primitive reports its own
/// errors for those. `None` means not found: callers leave the original
/// request untouched and let the real primitive produce its not-found error.
/// No caching across calls; directory order is authoritative.
pub fn resolve_on_path(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if name.contains('/') {
        return Some(PathBuf::from(name));
    }
    dirs.iter().map(|d| d.join(name)).find(|c| is_executable(c))
}

/// Current search path, split in precedence order.
pub fn search_dirs() -> Vec<PathBuf> {
    env::var_os("PATH")
        .map(|p| env::split_paths(&p).collect())
        .unwrap_or_default()
}
