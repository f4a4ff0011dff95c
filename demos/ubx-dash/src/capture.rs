use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use ubx_nav::constants::MILLISECONDS_PER_WEEK;
use ubx_nav::{encode_frame, ned, GeodeticPoint, GnssClient, NavPvtBuilder, NavigationSnapshot};

use crate::display::{render, Format};

/// 10 Hz
const EPOCH_MS: u64 = 100;
/// Thursday 00:00 GPS time
const START_ITOW_MS: u64 = 345_600_000;
const CIRCLE_RADIUS_M: f64 = 150.0;

/// GPS time of week for `epoch`, rolling over into the next week on long captures
fn itow_at(epoch: u32) -> u32 {
    let ms = (START_ITOW_MS + u64::from(epoch) * EPOCH_MS) % MILLISECONDS_PER_WEEK.unsigned_abs();
    // below one week, so it fits
    ms as u32
}

/// Build a capture of a vehicle driving a circle that starts at `center`.
///
/// Each epoch carries a NAV-PVT frame, an unrelated ACK-ACK frame and some idle
/// filler, which is roughly what a receiver bridge puts on the wire.
pub fn synthesize(center: GeodeticPoint, speed: f64, epochs: u32) -> Vec<u8> {
    // metres per 1e-7 degree around the centre
    let step = ned(
        center.lat,
        center.lon,
        center.height,
        center.lat + 1e-3,
        center.lon + 1e-3,
        center.height,
    );
    let m_per_lat_unit = step.north / 1e4;
    let m_per_lon_unit = step.east / 1e4;
    let angular_rate = speed / CIRCLE_RADIUS_M;

    let mut out = Vec::new();
    for epoch in 0..epochs {
        let elapsed_ms = u64::from(epoch) * EPOCH_MS;
        let t = elapsed_ms as f64 / 1000.0;
        let angle = angular_rate * t;
        let north = CIRCLE_RADIUS_M * angle.sin();
        let east = CIRCLE_RADIUS_M * (1.0 - angle.cos());
        // clockwise seen from above, starting northbound
        let vel_north = speed * angle.cos();
        let vel_east = speed * angle.sin();
        let heading = vel_east.atan2(vel_north).to_degrees().rem_euclid(360.0);

        let frame = NavPvtBuilder {
            itow: itow_at(epoch),
            year: 2026,
            month: 2,
            day: 26,
            sec: (epoch / 10 % 60) as u8,
            valid: 0x07,
            fix_type: 3,
            flags: 0x01,
            num_satellites: 16,
            lat: (center.lat * 1e7) as i32 + (north / m_per_lat_unit) as i32,
            lon: (center.lon * 1e7) as i32 + (east / m_per_lon_unit) as i32,
            height: (center.height * 1e3) as i32,
            height_msl: (center.height * 1e3) as i32,
            vel_north: (vel_north * 1e3) as i32,
            vel_east: (vel_east * 1e3) as i32,
            g_speed: (speed * 1e3) as i32,
            head_motion: (heading * 1e5) as i32,
            pdop: 120,
            ..NavPvtBuilder::default()
        }
        .into_packet_bytes();
        out.extend_from_slice(&frame);
        out.extend_from_slice(&encode_frame(0x0501, &[0x06, 0x01]));
        out.extend_from_slice(&[0xff; 3]);
    }
    out
}

pub fn simulate(file: &Path, center: GeodeticPoint, speed: f64, epochs: u32) -> Result<()> {
    let data = synthesize(center, speed, epochs);
    std::fs::write(file, &data)
        .with_context(|| format!("Failed to write capture to {}", file.display()))?;
    info!(
        "Wrote {} epochs ({} bytes) to {}",
        epochs,
        data.len(),
        file.display()
    );
    Ok(())
}

/// Decode a capture and print every new snapshot
pub fn replay(
    file: &Path,
    mut client: GnssClient,
    chunk: usize,
    delay: std::time::Duration,
    format: Format,
) -> Result<()> {
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read capture {}", file.display()))?;
    let reader = client.reader();
    let mut first: Option<NavigationSnapshot> = None;
    let mut published = 0;

    for part in data.chunks(chunk.max(1)) {
        client.feed(part);
        if client.fixes() != published {
            published = client.fixes();
            if let Some(snapshot) = reader.snapshot() {
                first.get_or_insert(snapshot);
                println!("{}", render(&snapshot, format)?);
            }
        }
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    let stats = client.stats();
    info!(
        "Replayed {} bytes: {} frames, {} fixes, {} checksum errors, {} oversized, {} rejected",
        data.len(),
        stats.frames,
        client.fixes(),
        stats.checksum_errors,
        stats.oversized,
        stats.rejected
    );
    if let (Some(first), Some(last)) = (first, reader.snapshot()) {
        let start = GeodeticPoint::new(first.lat, first.lon, first.height_ellipsoid);
        let end = GeodeticPoint::new(last.lat, last.lon, last.height_ellipsoid);
        let d = start.ned_to(&end);
        info!(
            "Net displacement N {:.1} m, E {:.1} m, D {:.1} m",
            d.north, d.east, d.down
        );
    }
    Ok(())
}
