//! Classification of exec targets: foreign-ABI path markers and compiler
//! subprocess basenames.
//!
//! Matching works on the path string alone. Targets are never stat'ed or
//! content-inspected, so nonexistent paths classify fine and the check costs a
//! few substring scans. A host path that happens to contain a marker (say a
//! project checked out under `~/src/alpine/`) will classify as foreign; that
//! is the accepted trade-off of the heuristic.

use crate::config::CONFIG;

/// Compiler-internal helpers that must be redirected even though they are
/// normally spawned by an already-redirected driver: code generator, LTO pass
/// and wrapper, link driver, system linker, assembler.
pub const TOOLCHAIN_SUBPROCESSES: &[&str] = &["cc1", "lto1", "lto-wrapper", "collect2", "ld", "as"];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// Target path contains one of the configured foreign-ABI markers.
    pub is_foreign: bool,
    /// Target basename is a known toolchain-internal program.
    pub is_toolchain_subprocess: bool,
}

/// Classify using the process-wide marker set.
pub fn classify(path: &str) -> Classification {
    classify_with(&CONFIG.markers, path)
}

/// Pure classification against an explicit marker set. No I/O, deterministic;
/// empty input yields both predicates false.
pub fn classify_with(markers: &[String], path: &str) -> Classification {
    if path.is_empty() {
        return Classification::default();
    }
    let is_foreign = markers
        .iter()
        .any(|m| !m.is_empty() && path.contains(m.as_str()));
    let is_toolchain_subprocess = TOOLCHAIN_SUBPROCESSES.contains(&basename(path));
    Classification {
        is_foreign,
        is_toolchain_subprocess,
    }
}

/// Final path component, or the whole string when no separator is present.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        crate::config::DEFAULT_MARKERS
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    #[test]
    fn test_foreign_markers_match_anywhere_in_path() {
        let m = markers();
        assert!(classify_with(&m, "/home/user/.local/alpine/bin/gcc").is_foreign);
        assert!(classify_with(&m, "/opt/cross/x86_64-alpine-linux-musl/bin/ld").is_foreign);
        assert!(!classify_with(&m, "/usr/bin/ls").is_foreign);
        assert!(!classify_with(&m, "/usr/lib/gcc/x86_64-linux-gnu/12/cc1").is_foreign);
    }

    #[test]
    fn test_subprocess_by_basename_regardless_of_prefix() {
        let m = markers();
        for base in TOOLCHAIN_SUBPROCESSES {
            let path = format!("/usr/libexec/gcc/{base}");
            assert!(
                classify_with(&m, &path).is_toolchain_subprocess,
                "{path} should classify as toolchain subprocess"
            );
        }
        assert!(classify_with(&m, "collect2").is_toolchain_subprocess);
        assert!(!classify_with(&m, "/usr/bin/ldd").is_toolchain_subprocess);
        // case-sensitive
        assert!(!classify_with(&m, "/usr/bin/LD").is_toolchain_subprocess);
    }

    #[test]
    fn test_empty_input_is_never_redirected() {
        assert_eq!(classify_with(&markers(), ""), Classification::default());
    }

    #[test]
    fn test_basename_with_and_without_separator() {
        assert_eq!(basename("/a/b/cc1"), "cc1");
        assert_eq!(basename("cc1"), "cc1");
        assert_eq!(basename("/usr/bin/"), "");
    }

    #[test]
    fn test_custom_marker_set() {
        let m = vec!["/musl-root/".to_string()];
        assert!(classify_with(&m, "/musl-root/bin/cc1").is_foreign);
        assert!(!classify_with(&m, "/home/user/.local/alpine/bin/cc1").is_foreign);
    }
}
