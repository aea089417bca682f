//! Loader substitution: re-exec a foreign binary under the alternate dynamic
//! loader, replacing the current process image.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::config::{CONFIG, INSTALL_ROOT_REL, LOADER_REL};
use crate::resolve::is_executable;

/// Outcome of a substitution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// Execute `target` with `argv`, environment unchanged. The caller commits
    /// to process-replacement semantics: control does not return on success.
    Replaced { target: PathBuf, argv: Vec<OsString> },
    /// Alternate loader missing or not executable. Callers run the original
    /// request through the real primitive; this is never a hard failure.
    Unavailable,
}

/// Alternate-runtime installation root: explicit override, else the profile
/// convention, else relative to the working directory (relocatable checkouts).
pub fn install_root() -> PathBuf {
    if let Some(root) = &CONFIG.root_override {
        return root.clone();
    }
    if let Some(h) = home::home_dir() {
        return h.join(INSTALL_ROOT_REL);
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(INSTALL_ROOT_REL),
        Err(_) => PathBuf::from(INSTALL_ROOT_REL),
    }
}

pub fn loader_path() -> PathBuf {
    install_root().join(LOADER_REL)
}

/// Attempt substitution with the configured loader.
pub fn substitute_loader(target: &OsStr, argv: &[OsString]) -> Substitution {
    substitute_with(&loader_path(), target, argv)
}

/// Attempt substitution with an explicit loader path.
///
/// The rewritten vector is `[loader, target, argv[1:]...]`: the loader becomes
/// argv[0], the original target its first operand, and the original argv[0]
/// slot (conventionally a duplicate of the target) is dropped. The original
/// request is left untouched either way.
pub fn substitute_with(loader: &Path, target: &OsStr, argv: &[OsString]) -> Substitution {
    if !is_executable(loader) {
        return Substitution::Unavailable;
    }
    let mut new_argv: Vec<OsString> = Vec::with_capacity(argv.len() + 1);
    new_argv.push(loader.as_os_str().to_os_string());
    new_argv.push(target.to_os_string());
    new_argv.extend(argv.iter().skip(1).cloned());
    Substitution::Replaced {
        target: loader.to_path_buf(),
        argv: new_argv,
    }
}
