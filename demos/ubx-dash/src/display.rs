use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::PoisonError;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use ubx_nav::{NavigationSnapshot, SnapshotReader};

use crate::device::{LinkStatus, SharedLinkStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// One dashboard line for a snapshot
pub fn render(snapshot: &NavigationSnapshot, format: Format) -> Result<String> {
    match format {
        Format::Json => serde_json::to_string(snapshot).context("Failed to serialize snapshot"),
        Format::Text => {
            let time = format_time(snapshot.utc);
            let age = match snapshot.correction_age_secs {
                255 => "n/a".to_string(),
                secs => format!("{secs}s"),
            };
            Ok(format!(
                "{time} UTC | {lat:>12.7} {lon:>12.7} {alt:>7.1} m | {mph:>5.1} mph {heading:>5.1}° {cardinal:<2} | {sats:>2} sv {fix} {ok} | {mode} age {age}",
                lat = snapshot.lat,
                lon = snapshot.lon,
                alt = snapshot.height_msl,
                mph = snapshot.speed_over_ground_mph,
                heading = snapshot.heading,
                cardinal = snapshot.cardinal.as_str(),
                sats = snapshot.satellites,
                fix = snapshot.fix_type,
                ok = if snapshot.gnss_fix_ok { "ok" } else { "--" },
                mode = snapshot.differential_mode,
            ))
        },
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        None => "----------".to_string(),
    }
}

/// Line shown instead of the snapshot while the receiver is unreachable
pub fn render_disconnected(link: &LinkStatus, format: Format) -> String {
    let reason = link.last_error.as_deref().unwrap_or("not connected");
    match format {
        Format::Json => serde_json::json!({ "connected": false, "error": reason }).to_string(),
        Format::Text => format!("-- receiver disconnected: {reason} --"),
    }
}

/// Poll the snapshot and link state at `refresh_hz` until `stop` is set.
pub fn run(
    reader: &SnapshotReader,
    link: &SharedLinkStatus,
    refresh_hz: f64,
    format: Format,
    stop: &AtomicBool,
) -> Result<()> {
    let period = Duration::from_secs_f64(1.0 / refresh_hz.clamp(0.1, 100.0));
    let stdout = std::io::stdout();
    while !stop.load(Ordering::Relaxed) {
        let link = link.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let line = if link.connected {
            match reader.snapshot() {
                Some(snapshot) => render(&snapshot, format)?,
                None => "-- waiting for fix --".to_string(),
            }
        } else {
            render_disconnected(&link, format)
        };
        writeln!(stdout.lock(), "{line}").context("Failed to write to stdout")?;
        thread::sleep(period);
    }
    debug!("Display stopped");
    Ok(())
}
