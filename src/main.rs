use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};

use abi_bridge::config::Strategy;
use abi_bridge::diag::{self, ColorMode};
use abi_bridge::errors::exit_code_for_io_error;
use abi_bridge::util::shell_join;
use abi_bridge::{banner, doctor};

const SHIM_OBJECT: &str = "libabi_bridge.so";

#[derive(Parser, Debug)]
#[command(
    name = "abi-bridge",
    version,
    about = "Run a build command with the exec-interception shim attached; foreign musl/Alpine binaries are redirected to their loader or into a Docker sandbox."
)]
struct Cli {
    /// Print detailed execution info
    #[arg(long, global = true)]
    verbose: bool,

    /// Colorize stderr messages: auto|always|never
    #[arg(long, value_enum, global = true)]
    color: Option<ColorMode>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
enum Cmd {
    /// Run diagnostics to check environment and configuration
    Doctor,
    /// Run a command with the interposer attached via LD_PRELOAD
    Run {
        /// Redirection strategy for the child: loader|sandbox|off
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,

        /// Enable shim debug diagnostics in the child
        #[arg(long)]
        debug: bool,

        /// Prepare and print what would run, but do not execute
        #[arg(long)]
        dry_run: bool,

        /// Suppress the startup banner
        #[arg(long)]
        quiet: bool,

        /// Command and arguments to execute
        #[arg(trailing_var_arg = true, required = true)]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(mode) = cli.color {
        diag::set_color_mode(mode);
    }
    match cli.command {
        Cmd::Doctor => {
            doctor::run_doctor(cli.verbose);
            ExitCode::from(0)
        }
        Cmd::Run {
            strategy,
            debug,
            dry_run,
            quiet,
            args,
        } => match run_command(&args, strategy, debug, dry_run, quiet, cli.verbose) {
            Ok(code) => ExitCode::from(code as u8),
            Err(e) => {
                diag::error_print(&format!("{e:#}"));
                let code = e
                    .downcast_ref::<io::Error>()
                    .map(exit_code_for_io_error)
                    .unwrap_or(1);
                ExitCode::from(code)
            }
        },
    }
}

/// Locate the shim shared object: explicit override, then next to the
/// launcher, then the cargo deps layout.
fn locate_shim_object() -> anyhow::Result<PathBuf> {
    if let Ok(p) = env::var("ABI_BRIDGE_PRELOAD") {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    let exe = env::current_exe().context("cannot determine launcher path")?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    for cand in [dir.join(SHIM_OBJECT), dir.join("deps").join(SHIM_OBJECT)] {
        if cand.is_file() {
            return Ok(cand);
        }
    }
    Err(anyhow!(
        "{SHIM_OBJECT} not found next to {}; set ABI_BRIDGE_PRELOAD",
        exe.display()
    ))
}

fn run_command(
    args: &[String],
    strategy: Option<Strategy>,
    debug: bool,
    dry_run: bool,
    quiet: bool,
    verbose: bool,
) -> anyhow::Result<i32> {
    if !quiet {
        banner::print_startup_banner();
    }
    let shim = match locate_shim_object() {
        Ok(p) => p.display().to_string(),
        Err(e) if dry_run => {
            diag::warn_print(&format!("{e:#}"));
            SHIM_OBJECT.to_string()
        }
        Err(e) => return Err(e),
    };
    // Chain onto any preexisting preload list rather than clobbering it.
    let preload = match env::var("LD_PRELOAD") {
        Ok(existing) if !existing.trim().is_empty() => format!("{shim}:{existing}"),
        _ => shim,
    };

    let mut cmd = Command::new(&args[0]);
    cmd.args(&args[1..]);
    cmd.env("LD_PRELOAD", &preload);
    if let Some(s) = strategy {
        cmd.env("ABI_BRIDGE_STRATEGY", s.as_str());
    }
    if debug {
        cmd.env("ABI_BRIDGE_DEBUG", "1");
    }

    if verbose || dry_run {
        diag::info_print(&format!(
            "exec: LD_PRELOAD={} {}",
            preload,
            shell_join(args)
        ));
    }
    if dry_run {
        diag::info_print("dry-run requested; not executing.");
        return Ok(0);
    }
    let status = cmd
        .status()
        .with_context(|| format!("failed to start {}", args[0]))?;
    Ok(status.code().unwrap_or(1))
}
