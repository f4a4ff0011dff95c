use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use ubx_nav::{GeodeticPoint, GnssClient};

mod capture;
mod cli;
mod device;
mod display;

use cli::{Args, Command};
use device::Device;
use display::Format;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("{}=info", env!("CARGO_CRATE_NAME"))),
    );
    logger.format_timestamp_millis().format_target(false);
    if let Some(level) = args.log_level() {
        logger.filter_level(level);
    }
    logger.init();

    if args.refresh_hz.is_nan() || args.refresh_hz <= 0.0 {
        bail!("--refresh-hz must be positive, got {}", args.refresh_hz);
    }
    let format = if args.json { Format::Json } else { Format::Text };
    let client = GnssClient::new(args.time_config());
    info!(
        "GPS week {}, {} leap seconds",
        args.gps_week, args.leap_seconds
    );

    match args.command {
        Command::Connect {
            ref host,
            port,
            duration_secs,
        } => {
            let mut device = Device::new(
                client,
                host.clone(),
                port,
                Duration::from_secs(args.reconnect_secs),
            );
            let stop = Arc::new(AtomicBool::new(false));
            if let Some(secs) = duration_secs {
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    thread::sleep(Duration::from_secs(secs));
                    stop.store(true, Ordering::Relaxed);
                });
            }

            let display = {
                let reader = device.client().reader();
                let link = device.link_status();
                let stop = Arc::clone(&stop);
                let refresh_hz = args.refresh_hz;
                thread::Builder::new()
                    .name("display".into())
                    .spawn(move || display::run(&reader, &link, refresh_hz, format, &stop))
                    .context("Failed to start display thread")?
            };

            device.run(&stop);
            stop.store(true, Ordering::Relaxed);
            match display.join() {
                Ok(result) => result,
                Err(_) => bail!("Display thread panicked"),
            }
        },
        Command::Replay {
            ref file,
            chunk,
            delay_ms,
        } => capture::replay(file, client, chunk, Duration::from_millis(delay_ms), format),
        Command::Simulate {
            ref file,
            epochs,
            lat,
            lon,
            speed,
        } => capture::simulate(file, GeodeticPoint::new(lat, lon, 0.0), speed, epochs),
    }
}
