//! Collaborator assembly and the `run` / `send` / `self-check` commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use handpilot_config::Config;
use handpilot_core::error::Result as CoreResult;
use handpilot_core::zone::ZoneLayout;
use handpilot_core::{
    Command, Dispatcher, FrameReport, Pilot, PilotCfg, RunEnd, RunParams, RunSummary,
};
use handpilot_io::{HttpTransport, ReplaySource, SimulatedHand, SimulatedTransport};
use handpilot_traits::{LandmarkSource, Transport};
use serde_json::json;

use crate::cli::ENV_CAPTURE_FAIL_AFTER;

/// Options of the `run` subcommand.
#[derive(Debug, Clone, Default)]
pub struct RunOpts {
    pub replay: Option<PathBuf>,
    pub dry_run: bool,
    pub max_frames: Option<u64>,
    pub fps: Option<u32>,
    pub stats: bool,
    pub json: bool,
}

pub fn end_name(end: RunEnd) -> &'static str {
    match end {
        RunEnd::SourceClosed => "SourceClosed",
        RunEnd::Interrupted => "Interrupted",
        RunEnd::FrameLimit => "FrameLimit",
    }
}

fn make_transport(cfg: &Config, dry_run: bool) -> CoreResult<Box<dyn Transport>> {
    if dry_run {
        tracing::info!("dry run: commands are logged, not sent");
        return Ok(Box::new(SimulatedTransport::new()));
    }
    let timeout = Duration::from_millis(cfg.transport.timeout_ms);
    let http = HttpTransport::new(&cfg.transport.base_url, timeout)
        .wrap_err("init vehicle transport")?;
    Ok(Box::new(http))
}

fn make_source(cfg: &Config, opts: &RunOpts) -> CoreResult<Box<dyn LandmarkSource>> {
    if let Some(path) = &opts.replay {
        let src = ReplaySource::open(path)?;
        return Ok(Box::new(src));
    }
    let fail_after = std::env::var(ENV_CAPTURE_FAIL_AFTER)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok());
    let sim = SimulatedHand::new(cfg.frame.width, cfg.frame.height, cfg.zones.depth)
        .mirrored(cfg.frame.mirror)
        .fail_after(fail_after);
    tracing::info!(
        width = cfg.frame.width,
        height = cfg.frame.height,
        "using simulated hand"
    );
    Ok(Box::new(sim))
}

fn print_dispatch(report: &FrameReport, json_mode: bool) {
    let Some(d) = report.dispatch else {
        return;
    };
    if json_mode {
        let line = json!({
            "frame": report.frame,
            "command": d.command.label(),
            "code": d.command.code().to_string(),
            "speed": d.speed,
            "delivered": d.delivered,
            "angle": report.hand.map(|h| h.smoothed_angle),
        });
        println!("{line}");
    } else {
        let status = if d.delivered { "sent" } else { "FAILED" };
        let angle = report
            .hand
            .map_or_else(|| "no hand".to_string(), |h| format!("{:+.1}°", h.smoothed_angle));
        println!(
            "frame {:>5}  {:<8} speed {:<4} {:<7} ({angle})",
            report.frame,
            d.command.label(),
            d.speed,
            status
        );
    }
}

/// Run the pipeline with the configured collaborators.
pub fn run_pilot(
    cfg: &Config,
    opts: &RunOpts,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunSummary> {
    let source = make_source(cfg, opts)?;
    let transport = make_transport(cfg, opts.dry_run)?;
    let mut pilot = Pilot::builder()
        .with_source(source)
        .with_transport(transport)
        .with_config(PilotCfg::from(cfg))
        .build()?;

    let fps = opts.fps.unwrap_or(cfg.source.fps);
    let params = RunParams {
        max_frames: opts.max_frames,
        frame_period: handpilot_core::util::frame_period(fps),
    };
    tracing::info!(
        endpoint = %pilot.target(),
        fps,
        max_frames = ?opts.max_frames,
        "run start"
    );

    let t0 = Instant::now();
    let summary = handpilot_core::run(&mut pilot, params, &shutdown, |r| {
        print_dispatch(r, opts.json);
    })?;
    let elapsed = t0.elapsed();

    if opts.json {
        println!(
            "{}",
            json!({
                "end": end_name(summary.end),
                "frames": summary.frames,
                "hand_frames": summary.hand_frames,
                "delivered": summary.dispatch.delivered,
                "failed": summary.dispatch.failed,
                "last_command": summary.last_command.label(),
                "final_stop": summary.final_stop_delivered,
                "duration_ms": elapsed.as_millis() as u64,
            })
        );
    } else {
        println!(
            "run finished ({}): last command {}",
            end_name(summary.end),
            summary.last_command
        );
    }
    if opts.stats {
        print_stats(&summary, elapsed);
    }
    Ok(summary)
}

/// Print a run summary to stderr.
fn print_stats(s: &RunSummary, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    let fps = if secs > 0.0 {
        s.frames as f64 / secs
    } else {
        0.0
    };
    eprintln!("\n--- Handpilot Stats ---");
    eprintln!("Frames: {} ({} with a hand)", s.frames, s.hand_frames);
    eprintln!("Effective rate: {fps:.1} fps over {secs:.2} s");
    eprintln!(
        "Dispatches delivered/failed: {} / {}",
        s.dispatch.delivered, s.dispatch.failed
    );
    eprintln!(
        "Final stop: {}",
        if s.final_stop_delivered {
            "delivered"
        } else {
            "not delivered"
        }
    );
    eprintln!("-----------------------\n");
}

/// Relay one manual command, as the companion web relay does.
pub fn send_once(
    cfg: &Config,
    command: Command,
    velocity: u32,
    dry_run: bool,
    json_mode: bool,
) -> CoreResult<()> {
    let transport = make_transport(cfg, dry_run)?;
    let mut dispatcher = Dispatcher::new(transport);
    dispatcher.send_or_report(command, velocity)?;
    if json_mode {
        println!(
            "{}",
            json!({
                "command": command.label(),
                "code": command.code().to_string(),
                "velocity": velocity,
                "target": dispatcher.target(),
                "delivered": true,
            })
        );
    } else {
        println!(
            "sent {} ({}) velocity {} to {}",
            command.label(),
            command.code(),
            velocity,
            dispatcher.target()
        );
    }
    Ok(())
}

/// Report the effective configuration without touching the network.
pub fn self_check(cfg: &Config, json_mode: bool) -> CoreResult<()> {
    let pilot_cfg = PilotCfg::from(cfg);
    let layout = ZoneLayout::new(&pilot_cfg.frame, &pilot_cfg.zones);
    if json_mode {
        let zone = |z: handpilot_core::zone::Zone| {
            json!([z.top_left.x, z.top_left.y, z.bottom_right.x, z.bottom_right.y])
        };
        println!(
            "{}",
            json!({
                "ok": true,
                "base_url": cfg.transport.base_url,
                "timeout_ms": cfg.transport.timeout_ms,
                "frame": [cfg.frame.width, cfg.frame.height],
                "mirror": cfg.frame.mirror,
                "upper_zone": zone(layout.upper),
                "lower_zone": zone(layout.lower),
                "deadzone_deg": cfg.gesture.deadzone_deg,
                "cooldown_ms": cfg.gesture.cooldown_ms,
                "default_speed": cfg.gesture.default_speed,
            })
        );
        return Ok(());
    }
    println!("config OK");
    println!(
        "  vehicle:  {} (timeout {} ms)",
        cfg.transport.base_url, cfg.transport.timeout_ms
    );
    println!(
        "  frame:    {}x{} (mirror: {})",
        cfg.frame.width, cfg.frame.height, cfg.frame.mirror
    );
    for (name, z) in [("upper", layout.upper), ("lower", layout.lower)] {
        println!(
            "  {name} zone: ({}, {}) - ({}, {})",
            z.top_left.x, z.top_left.y, z.bottom_right.x, z.bottom_right.y
        );
    }
    println!(
        "  gesture:  deadzone ±{}°, cooldown {} ms, speed {}",
        cfg.gesture.deadzone_deg, cfg.gesture.cooldown_ms, cfg.gesture.default_speed
    );
    Ok(())
}
