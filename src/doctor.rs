use atty;
use std::process::Command;

use crate::config::CONFIG;
use crate::loader;
use crate::resolve::is_executable;
use crate::sandbox::container_runtime_path;

fn paint_value(s: &str) -> String {
    if atty::is(atty::Stream::Stderr) {
        format!("\x1b[34;1m{}\x1b[0m", s)
    } else {
        s.to_string()
    }
}

pub fn run_doctor(verbose: bool) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("abi-bridge doctor");
    eprintln!();
    eprintln!("  version: v{}", version);
    eprintln!(
        "  host:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    if verbose {
        eprintln!("  build:   {}", env!("ABI_BRIDGE_BUILD_DATE"));
        eprintln!("  target:  {}", env!("ABI_BRIDGE_BUILD_TARGET"));
        eprintln!("  rustc:   {}", env!("ABI_BRIDGE_BUILD_RUSTC"));
    }
    eprintln!();

    eprintln!("  strategy: {}", paint_value(CONFIG.strategy.as_str()));
    eprintln!("  markers:  {}", CONFIG.markers.join(", "));
    eprintln!("  image:    {}", CONFIG.image);
    eprintln!();

    let root = loader::install_root();
    let ld = loader::loader_path();
    eprintln!("  install root: {}", root.display());
    let ld_status = if is_executable(&ld) {
        "present"
    } else {
        "missing"
    };
    eprintln!(
        "  alternate loader: {} ({})",
        ld.display(),
        paint_value(ld_status)
    );

    match container_runtime_path() {
        Ok(p) => {
            eprintln!("  docker: {}", p.display());
            if let Ok(out) = Command::new(&p).arg("--version").output() {
                let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
                if !s.is_empty() {
                    eprintln!("  docker --version: {}", s);
                }
            }
        }
        Err(e) => {
            eprintln!("  docker: not found ({e})");
        }
    }

    eprintln!();
    eprintln!("doctor: completed diagnostics.");
}
