use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ubx_nav::GpsTimeConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Live GNSS dashboard for u-blox receivers speaking UBX")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Full GPS week number used to turn time-of-week into UTC
    #[arg(long, global = true, default_value_t = GpsTimeConfig::default().week)]
    pub gps_week: u32,

    /// GPS minus UTC, in seconds
    #[arg(long, global = true, default_value_t = GpsTimeConfig::default().leap_seconds)]
    pub leap_seconds: u32,

    /// Display refresh rate
    #[arg(long, global = true, default_value_t = 5.0)]
    pub refresh_hz: f64,

    /// Delay before reconnecting after the receiver connection drops
    #[arg(long, global = true, default_value_t = 2)]
    pub reconnect_secs: u64,

    /// Print snapshots as JSON lines instead of the text dashboard
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output, repeat for trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream from a receiver or serial-to-TCP bridge
    Connect {
        #[arg(long, default_value = "192.168.4.1")]
        host: String,

        #[arg(short, long, default_value_t = 23)]
        port: u16,

        /// Stop after this many seconds instead of running until killed
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Feed a recorded byte capture through the decoder
    Replay {
        file: PathBuf,

        /// Bytes handed to the decoder per read
        #[arg(long, default_value_t = 256)]
        chunk: usize,

        /// Pause between chunks, 0 replays as fast as possible
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
    /// Write a synthetic capture of a vehicle driving a circle
    Simulate {
        file: PathBuf,

        /// Number of NAV-PVT epochs at 10 Hz
        #[arg(long, default_value_t = 600)]
        epochs: u32,

        #[arg(long, default_value_t = 48.137_154, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, default_value_t = 11.576_124, allow_hyphen_values = true)]
        lon: f64,

        /// Ground speed in m/s
        #[arg(long, default_value_t = 12.0)]
        speed: f64,
    },
}

impl Args {
    pub fn time_config(&self) -> GpsTimeConfig {
        GpsTimeConfig {
            week: self.gps_week,
            leap_seconds: self.leap_seconds,
        }
    }

    pub fn log_level(&self) -> Option<log::LevelFilter> {
        match self.verbose {
            0 => None,
            1 => Some(log::LevelFilter::Debug),
            _ => Some(log::LevelFilter::Trace),
        }
    }
}
