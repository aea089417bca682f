pub fn print_startup_banner() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!();
    eprintln!("──────────────────────────────────────────────────────────────────────────────");
    eprintln!("  🔧  abi-bridge v{version}  -  foreign-ABI exec redirection for build toolchains");
    eprintln!("──────────────────────────────────────────────────────────────────────────────");
    eprintln!("  musl/Alpine binaries run under their own loader or inside a sandbox;");
    eprintln!("  everything else passes through to the native exec primitives unchanged.");

    let loader = crate::loader::loader_path();
    let loader_disp = if crate::resolve::is_executable(&loader) {
        format!("{} (present)", loader.display())
    } else {
        format!("{} (missing)", loader.display())
    };
    let docker_disp = crate::sandbox::container_runtime_path()
        .ok()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    eprintln!();
    eprintln!("  strategy: {}", crate::config::CONFIG.strategy.as_str());
    eprintln!("  loader:   {loader_disp}");
    eprintln!("  docker:   {docker_disp}");
    eprintln!("──────────────────────────────────────────────────────────────────────────────");
    eprintln!();
}
