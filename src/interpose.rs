//! Exec-family interposition: the LD_PRELOAD surface of the shim.
//!
//! Overrides `execve`, `execv`, and `execvp` process-wide. Each intercepted
//! call resolves bare names, classifies the target, and applies the
//! deployment's redirection strategy; everything else reaches the real
//! primitive with the original pointers, so the non-redirected contract is
//! bit-identical. The real entry points are looked up once via
//! `dlsym(RTLD_NEXT, ...)` and read-only afterwards; racing initializations
//! are idempotent.
//!
//! Nothing in this module unwinds across the FFI boundary: all fallible work
//! returns early into the fallback path.

use std::ffi::{CStr, CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libc::{c_char, c_int};
use once_cell::sync::OnceCell;

use crate::classify::{classify, Classification};
use crate::config::{Strategy, CONFIG};
use crate::diag::debug_print;
use crate::loader::{substitute_loader, Substitution};
use crate::resolve::{resolve_on_path, search_dirs};
use crate::sandbox::delegate;
use crate::util::shell_escape;

type ExecveFn =
    unsafe extern "C" fn(*const c_char, *const *const c_char, *const *const c_char) -> c_int;
type ExecvpFn = unsafe extern "C" fn(*const c_char, *const *const c_char) -> c_int;

extern "C" {
    static environ: *const *const c_char;
}

static REAL_EXECVE: OnceCell<ExecveFn> = OnceCell::new();
static REAL_EXECVP: OnceCell<ExecvpFn> = OnceCell::new();

fn real_execve() -> Option<ExecveFn> {
    REAL_EXECVE
        .get_or_try_init(|| {
            let sym = unsafe { libc::dlsym(libc::RTLD_NEXT, b"execve\0".as_ptr().cast()) };
            if sym.is_null() {
                Err(())
            } else {
                Ok(unsafe { std::mem::transmute::<*mut libc::c_void, ExecveFn>(sym) })
            }
        })
        .ok()
        .copied()
}

fn real_execvp() -> Option<ExecvpFn> {
    REAL_EXECVP
        .get_or_try_init(|| {
            let sym = unsafe { libc::dlsym(libc::RTLD_NEXT, b"execvp\0".as_ptr().cast()) };
            if sym.is_null() {
                Err(())
            } else {
                Ok(unsafe { std::mem::transmute::<*mut libc::c_void, ExecvpFn>(sym) })
            }
        })
        .ok()
        .copied()
}

// Attach-time hook: prime the real entry points and announce under debug.
extern "C" fn interpose_init() {
    let ve = real_execve().is_some();
    let vp = real_execvp().is_some();
    debug_print(&format!(
        "interposer attached (execve={} execvp={})",
        if ve { "ok" } else { "missing" },
        if vp { "ok" } else { "missing" }
    ));
}

#[used]
#[link_section = ".init_array"]
static INTERPOSE_INIT: extern "C" fn() = interpose_init;

unsafe fn collect_argv(argv: *const *const c_char) -> Vec<OsString> {
    let mut out = Vec::new();
    let mut i = 0usize;
    loop {
        let p = *argv.add(i);
        if p.is_null() {
            break;
        }
        out.push(OsStr::from_bytes(CStr::from_ptr(p).to_bytes()).to_os_string());
        i += 1;
    }
    out
}

/// Does the configured strategy want this target redirected?
///
/// Loader substitution takes every foreign binary; container delegation only
/// foreign toolchain subprocesses (both predicates).
fn wants_redirect(cls: Classification) -> bool {
    match CONFIG.strategy {
        Strategy::Off => false,
        Strategy::Loader => cls.is_foreign,
        Strategy::Sandbox => cls.is_foreign && cls.is_toolchain_subprocess,
    }
}

/// Replace the current process image with `target`+`argv`, keeping `envp`.
/// Returns only when the exec itself failed; the caller then falls back to
/// the original, unmodified request.
unsafe fn exec_image(target: &Path, argv: &[OsString], envp: *const *const c_char) {
    let real = match real_execve() {
        Some(f) => f,
        None => return,
    };
    let prog = match CString::new(target.as_os_str().as_bytes()) {
        Ok(c) => c,
        Err(_) => return,
    };
    let args: Vec<CString> = match argv
        .iter()
        .map(|a| CString::new(a.as_bytes()))
        .collect::<Result<_, _>>()
    {
        Ok(v) => v,
        Err(_) => return,
    };
    let mut ptrs: Vec<*const c_char> = args.iter().map(|c| c.as_ptr()).collect();
    ptrs.push(std::ptr::null());
    real(prog.as_ptr(), ptrs.as_ptr(), envp);
}

/// Apply the active redirection strategy to a classified target.
///
/// When this function returns, no redirection took effect and the caller must
/// forward the original request to the real primitive. A successful loader
/// substitution or sandbox delegation does not return: the first replaces the
/// process image, the second exits with the delegated status, which is what a
/// caller that asked for process replacement observes in both cases.
unsafe fn maybe_redirect(target: &Path, argv: *const *const c_char, envp: *const *const c_char) {
    let shown = target.display().to_string();
    let cls = classify(&target.to_string_lossy());
    if !wants_redirect(cls) {
        return;
    }
    debug_print(&format!(
        "intercepted foreign binary: {} (subprocess={})",
        shown, cls.is_toolchain_subprocess
    ));
    let args = collect_argv(argv);
    match CONFIG.strategy {
        Strategy::Loader => match substitute_loader(target.as_os_str(), &args) {
            Substitution::Replaced { target: loader, argv: new_argv } => {
                debug_print(&format!(
                    "redirecting to loader: {} {}",
                    loader.display(),
                    shell_escape(&shown)
                ));
                exec_image(&loader, &new_argv, envp);
                debug_print(&format!("loader exec failed for {shown}, falling back"));
            }
            Substitution::Unavailable => {
                debug_print("alternate loader not found, falling back");
            }
        },
        Strategy::Sandbox => match delegate(target, &args) {
            Ok(code) => {
                // The intercepted caller asked for process replacement; the
                // delegated status is the program's true outcome.
                libc::_exit(code);
            }
            Err(e) => {
                debug_print(&format!("sandbox delegation failed ({e}), falling back"));
            }
        },
        Strategy::Off => {}
    }
}

/// Interposed `execve`.
///
/// # Safety
/// Same contract as the libc primitive it shadows: `pathname` and the
/// NULL-terminated `argv`/`envp` arrays must be valid for the duration of the
/// call.
#[no_mangle]
pub unsafe extern "C" fn execve(
    pathname: *const c_char,
    argv: *const *const c_char,
    envp: *const *const c_char,
) -> c_int {
    if !pathname.is_null() && !argv.is_null() {
        let target = Path::new(OsStr::from_bytes(CStr::from_ptr(pathname).to_bytes()));
        maybe_redirect(target, argv, envp);
    }
    match real_execve() {
        Some(real) => real(pathname, argv, envp),
        None => {
            *libc::__errno_location() = libc::ENOSYS;
            -1
        }
    }
}

/// Interposed `execv`: `execve` with the caller's current environment.
///
/// # Safety
/// Same contract as the libc primitive it shadows.
#[no_mangle]
pub unsafe extern "C" fn execv(pathname: *const c_char, argv: *const *const c_char) -> c_int {
    execve(pathname, argv, environ as *const *const c_char)
}

/// Interposed `execvp`: search PATH for bare names before classification, so
/// name-only toolchain invocations are redirected too. Non-redirected calls
/// forward the original name and let the real primitive do its own search.
///
/// # Safety
/// Same contract as the libc primitive it shadows.
#[no_mangle]
pub unsafe extern "C" fn execvp(file: *const c_char, argv: *const *const c_char) -> c_int {
    if !file.is_null() && !argv.is_null() {
        let name = String::from_utf8_lossy(CStr::from_ptr(file).to_bytes()).to_string();
        if let Some(path) = resolve_on_path(&name, &search_dirs()) {
            maybe_redirect(&path, argv, environ as *const *const c_char);
        }
    }
    match real_execvp() {
        Some(real) => real(file, argv),
        None => {
            *libc::__errno_location() = libc::ENOSYS;
            -1
        }
    }
}
