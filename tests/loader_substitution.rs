mod common;

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use abi_bridge::{substitute_with, Substitution};
use tempfile::TempDir;

fn argv(items: &[&str]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

#[test]
fn test_present_loader_rewrites_argv() {
    let dir = TempDir::new().expect("tempdir");
    let lib = dir.path().join("lib");
    fs::create_dir_all(&lib).expect("mkdir lib");
    let loader = common::write_executable(&lib, "ld-musl-x86_64.so.1");

    let original = argv(&["cc1", "-quiet", "in.c"]);
    match substitute_with(&loader, OsStr::new("cc1"), &original) {
        Substitution::Replaced { target, argv: new_argv } => {
            assert_eq!(target, loader);
            // loader is argv[0], the original target its first operand, the
            // original argv[0] duplicate slot dropped, the rest in order
            let expected = vec![
                loader.as_os_str().to_os_string(),
                OsString::from("cc1"),
                OsString::from("-quiet"),
                OsString::from("in.c"),
            ];
            assert_eq!(new_argv, expected);
        }
        Substitution::Unavailable => panic!("loader should be available"),
    }

    // the original request is never mutated
    assert_eq!(original, argv(&["cc1", "-quiet", "in.c"]));
}

#[test]
fn test_absent_loader_reports_unavailable() {
    let original = argv(&["cc1", "-quiet", "in.c"]);
    let out = substitute_with(
        Path::new("/nonexistent/lib/ld-musl-x86_64.so.1"),
        OsStr::new("cc1"),
        &original,
    );
    assert_eq!(out, Substitution::Unavailable);
    assert_eq!(original, argv(&["cc1", "-quiet", "in.c"]));
}

#[test]
fn test_non_executable_loader_reports_unavailable() {
    let dir = TempDir::new().expect("tempdir");
    let lib = dir.path().join("lib");
    fs::create_dir_all(&lib).expect("mkdir lib");
    let loader = lib.join("ld-musl-x86_64.so.1");
    fs::write(&loader, "not a loader").expect("write file");

    let out = substitute_with(&loader, OsStr::new("cc1"), &argv(&["cc1"]));
    assert_eq!(out, Substitution::Unavailable);
}

#[test]
fn test_single_argument_vector() {
    let dir = TempDir::new().expect("tempdir");
    let loader = common::write_executable(dir.path(), "ld-musl-x86_64.so.1");
    let target = "/home/u/.local/alpine/usr/bin/gcc";
    match substitute_with(&loader, OsStr::new(target), &argv(&["gcc"])) {
        Substitution::Replaced { argv: new_argv, .. } => {
            assert_eq!(
                new_argv,
                vec![
                    loader.as_os_str().to_os_string(),
                    OsString::from(target),
                ]
            );
        }
        Substitution::Unavailable => panic!("loader should be available"),
    }
}
