//! Human-readable error descriptions and structured JSON error formatting.

use handpilot_core::error::{BuildError, PilotError};

/// Exit code for a capture failure (camera or replay source died mid-run).
pub const EXIT_CAPTURE: i32 = 3;

/// Stable name for the JSON `reason` field.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(pe) = err.downcast_ref::<PilotError>() {
        return match pe {
            PilotError::Transport(_) => "Transport",
            PilotError::Timeout => "Timeout",
            PilotError::Capture(_) => "Capture",
            PilotError::Config(_) => "Config",
            PilotError::State(_) => "State",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    "Error"
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSource => {
                "What happened: No landmark source was provided to the pilot.\nLikely causes: The camera/replay source failed to initialize or was not wired into the builder.\nHow to fix: Pass --replay FILE or --sim, and check the logs for source errors.".to_string()
            }
            BuildError::MissingTransport => {
                "What happened: No transport was provided to the pilot.\nLikely causes: The vehicle transport failed to initialize or was not wired into the builder.\nHow to fix: Check [transport] in the config, or use --dry-run.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun `handpilot self-check`."
            ),
        };
    }

    if let Some(pe) = err.downcast_ref::<PilotError>() {
        return match pe {
            PilotError::Timeout => "What happened: The vehicle did not answer within the configured timeout.\nLikely causes: Vehicle powered off, wrong address, or weak Wi-Fi.\nHow to fix: Check transport.base_url, make sure the vehicle is reachable, or raise transport.timeout_ms.".to_string(),
            PilotError::Transport(msg) => format!(
                "What happened: The command was not delivered ({msg}).\nLikely causes: Vehicle unreachable, wrong transport.base_url, or the vehicle rejected the request.\nHow to fix: Verify the URL with `handpilot self-check` and that the vehicle answers HTTP requests."
            ),
            PilotError::Capture(msg) => format!(
                "What happened: Frame capture failed ({msg}).\nLikely causes: Camera disconnected, or the landmark source stopped unexpectedly.\nHow to fix: Reconnect the camera or check the replay file, then start a new run. A stop command was sent before exiting."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let chain = format!("{err:#}");
    let lower = chain.to_ascii_lowercase();

    if lower.contains("landmark csv must have headers") {
        return "Invalid headers in landmark CSV. Expected 'frame,landmark,x,y,z'.".to_string();
    }

    if lower.contains("replay frames must be non-decreasing")
        || lower.contains("expected landmark")
        || lower.contains("invalid csv row")
        || lower.contains("mixes a no-hand row")
    {
        return format!(
            "What happened: The replay file is malformed.\nLikely causes: Rows out of order, a missing landmark index, or a non-numeric value.\nHow to fix: Regenerate the recording. Details: {chain}"
        );
    }

    if lower.contains("config") && (lower.contains("parse") || lower.contains("read")) {
        return format!(
            "What happened: The configuration file could not be loaded.\nLikely causes: Wrong --config path or invalid TOML.\nHow to fix: Check the path and syntax. Details: {chain}"
        );
    }

    if lower.contains("transport.")
        || lower.contains("frame.")
        || lower.contains("zones.")
        || lower.contains("gesture.")
        || lower.contains("source.")
        || lower.contains("logging.")
    {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: An out-of-range value in the TOML.\nHow to fix: Edit the config file and run `handpilot self-check`."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Capture failures exit with 3; everything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<PilotError>() {
        Some(PilotError::Capture(_)) => EXIT_CAPTURE,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let detail = match err.downcast_ref::<PilotError>() {
        Some(PilotError::Transport(m) | PilotError::Capture(m) | PilotError::Config(m)) => {
            Some(m.clone())
        }
        _ => None,
    };
    let obj = if let Some(d) = detail {
        json!({ "reason": reason_name(err), "detail": d, "message": humanize(err) })
    } else {
        json!({ "reason": reason_name(err), "message": humanize(err) })
    };
    obj.to_string()
}
