//! Script Bridge CLI Application
//!
//! Host-side driver for the script-bridge library. It:
//! - Loads a managed runtime shared library
//! - Lets the runtime fill the callback table through its bootstrap export
//! - Installs the table into a registry and reports the outcome (TXT/JSON)
//! - Runs the runtime's startup and shutdown hooks when the table is ready

use anyhow::{bail, Context, Result};
use clap::Parser;
use script_bridge::{CallbackRegistry, ManagedCallbacks};
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod report;
mod runtime;

use config::{AppConfig, OutputFormat};
use report::InstallReport;
use runtime::LoadedRuntime;

/// Script Bridge - Validate and install a managed runtime's callback table
#[derive(Parser, Debug)]
#[command(name = "script-bridge-cli")]
#[command(about = "Load a managed runtime and install its callback table", long_about = None)]
#[command(version)]
struct Args {
    /// Managed runtime shared library (overrides config)
    #[arg(short, long, value_name = "FILE")]
    library: Option<PathBuf>,

    /// Bootstrap symbol exported by the runtime (overrides config)
    #[arg(short, long, value_name = "SYMBOL")]
    entry: Option<String>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the required callbacks and exit
    #[arg(long)]
    list: bool,

    /// Install only, do not call the runtime's startup hooks
    #[arg(long)]
    skip_startup_hooks: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Script Bridge CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using script-bridge library v{}", script_bridge::VERSION);

    if args.list {
        list_required();
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let config = apply_overrides(config, &args);

    let Some(library) = config.runtime.library.clone() else {
        println!("Script Bridge - No runtime specified");
        println!("\nQuick Start:");
        println!("  script-bridge-cli --library libmanaged_runtime.so");
        println!("  script-bridge-cli --config bridge.toml");
        println!("  script-bridge-cli --list");
        println!("\nUse --help for more options");
        return Ok(());
    };

    run(&config, library)
}

/// Load the runtime and hand its table to `install_and_report`
fn run(config: &AppConfig, library: PathBuf) -> Result<()> {
    let runtime = LoadedRuntime::load(&library, &config.runtime.entry_point)?;
    // `runtime` stays loaded until the lifecycle hooks have returned
    install_and_report(
        config,
        runtime.path(),
        runtime.entry_point(),
        runtime.callbacks(),
    )
}

/// Install a runtime-filled table, report, then drive the lifecycle hooks
fn install_and_report(
    config: &AppConfig,
    library: &Path,
    entry_point: &str,
    callbacks: &ManagedCallbacks,
) -> Result<()> {
    let mut registry = CallbackRegistry::new();
    let outcome = registry.install(callbacks);

    let report = InstallReport::new(
        library.to_path_buf(),
        entry_point,
        callbacks,
        &outcome,
        registry.is_ready(),
    );
    write_report(&report, config)?;

    if let Err(e) = outcome {
        if config.startup.fail_on_missing {
            return Err(e).context("Managed runtime callback table is incomplete");
        }
        log::warn!("Continuing without a usable managed runtime: {}", e);
        return Ok(());
    }

    let Some(bridge) = registry.bridge() else {
        bail!("Registry not ready after a successful install");
    };

    if config.startup.run_startup_hooks {
        log::info!("Running managed runtime startup hooks");
        bridge.install_trace_listener();
        bridge.initialize_default_task_scheduler();
        bridge.frame_callback();
        bridge.on_shutting_down();
        log::info!("Managed runtime shut down cleanly");
    }

    Ok(())
}

/// Command-line flags win over the config file
fn apply_overrides(mut config: AppConfig, args: &Args) -> AppConfig {
    if let Some(library) = &args.library {
        config.runtime.library = Some(library.clone());
    }
    if let Some(entry) = &args.entry {
        config.runtime.entry_point = entry.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }
    if args.skip_startup_hooks {
        config.startup.run_startup_hooks = false;
    }
    config
}

fn write_report(report: &InstallReport, config: &AppConfig) -> Result<()> {
    let rendered = report.render(config.output.format)?;
    match &config.output.path {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn list_required() {
    println!("Required managed callbacks ({}):", ManagedCallbacks::required().len());
    for (i, slot) in ManagedCallbacks::required().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, slot.id);
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
#[path = "../../script-bridge/src/test_support.rs"]
mod test_support;
