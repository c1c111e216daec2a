mod cli;
mod drive;
mod error_fmt;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use handpilot_config::Config;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, FILE_GUARD, JSON_MODE};
use crate::drive::RunOpts;
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    // clap exits with 2 on usage errors
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        tracing::error!(error = %format!("{e:#}"), "exiting with error");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = load_config(&cli.config)?;
    init_tracing(&cli, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Run {
            replay,
            sim: _,
            dry_run,
            max_frames,
            fps,
            stats,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || {
                flag.store(true, Ordering::Relaxed);
            })
            .wrap_err("install Ctrl-C handler")?;

            let opts = RunOpts {
                replay,
                dry_run,
                max_frames,
                fps,
                stats,
                json: cli.json,
            };
            drive::run_pilot(&cfg, &opts, shutdown)?;
            Ok(())
        }
        Commands::Send {
            command,
            velocity,
            dry_run,
        } => drive::send_once(&cfg, command, velocity, dry_run, cli.json),
        Commands::SelfCheck => drive::self_check(&cfg, cli.json),
    }
}

/// Read and validate the config. A missing file is only acceptable at the
/// default path, where built-in defaults apply.
fn load_config(path: &Path) -> Result<Config> {
    let cfg = if path.exists() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read config {}", path.display()))?;
        handpilot_config::load_toml(&text)
            .wrap_err_with(|| format!("parse config {}", path.display()))?
    } else if path == Path::new(DEFAULT_CONFIG) {
        Config::default()
    } else {
        eyre::bail!("read config {}: file not found", path.display());
    };
    cfg.validate()?;
    Ok(cfg)
}

fn init_tracing(cli: &Cli, logging: &handpilot_config::Logging) -> Result<()> {
    use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(&cli.log_level)
            .wrap_err_with(|| format!("invalid --log-level {:?}", cli.log_level))?,
    };

    let mut layers = Vec::new();
    let console = if cli.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed()
    };
    layers.push(console);

    if let Some(file) = logging.file.as_deref() {
        use tracing_appender::rolling::{RollingFileAppender, Rotation};

        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let Some(name) = path.file_name() else {
            eyre::bail!("logging.file has no file name: {file:?}");
        };
        let rotation = match logging.rotation.as_deref() {
            Some("daily") => Rotation::DAILY,
            Some("hourly") => Rotation::HOURLY,
            _ => Rotation::NEVER,
        };
        let appender = RollingFileAppender::new(rotation, dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let level = logging.level.as_deref().unwrap_or("info");
        let file_filter = EnvFilter::try_new(level)
            .wrap_err_with(|| format!("invalid logging.level {level:?}"))?;
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .wrap_err("init logging")?;
    Ok(())
}
