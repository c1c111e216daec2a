//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use handpilot_core::Command;
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Used when `--config` is not given; missing is fine and means built-in defaults.
pub const DEFAULT_CONFIG: &str = "etc/handpilot.toml";

/// Test hook: make the simulated camera fail after N frames.
pub const ENV_CAPTURE_FAIL_AFTER: &str = "HANDPILOT_TEST_CAPTURE_FAIL_AFTER";

#[derive(Parser, Debug)]
#[command(
    name = "handpilot",
    version,
    about = "Drive a vehicle with hand gestures"
)]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

pub fn parse_command(s: &str) -> Result<Command, String> {
    s.parse()
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gesture pipeline until the source ends or Ctrl-C
    Run {
        /// Replay recorded landmarks (CSV: frame,landmark,x,y,z)
        #[arg(long, value_name = "FILE", conflicts_with = "sim")]
        replay: Option<PathBuf>,
        /// Use the built-in simulated hand (default without --replay)
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
        /// Log commands instead of sending them to the vehicle
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
        /// Stop after this many frames
        #[arg(long, value_name = "N")]
        max_frames: Option<u64>,
        /// Override source.fps (0 = as fast as frames arrive)
        #[arg(long, value_name = "FPS")]
        fps: Option<u32>,
        /// Print a run summary on exit
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Send a single manual command through the configured transport
    Send {
        /// Command code (f|b|l|r|s) or name (forward, stop, ...)
        #[arg(long, short = 'c', value_parser = parse_command)]
        command: Command,
        /// Speed value forwarded with the command
        #[arg(long, default_value_t = 100)]
        velocity: u32,
        /// Log the command instead of sending it
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Validate the config and print the effective zone layout
    SelfCheck,
}
