//! # ubx_nav
//!
//! Streaming decoder for the u-blox UBX protocol that turns a receiver byte
//! stream into a live navigation snapshot: position, speed, heading, UTC time
//! and fix quality, ready for a dashboard.
//!
//! Only the NAV-PVT fix report is decoded. Nothing is ever written to the receiver.
//!
//! Parsing Frames
//! ==============
//!
//! The [Parser] is a byte-oriented state machine with a fixed payload buffer.
//! Bytes are handed over in chunks of any size and every checksum-validated
//! frame is passed to a [FrameHandler], which may be a closure:
//! ```
//! use ubx_nav::{Frame, Parser};
//!
//! let mut parser = Parser::default();
//! let my_raw_data = vec![0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x04, 0x05, 0x11, 0x38];
//! let mut count = 0;
//! parser.feed(&my_raw_data, &mut |frame: Frame<'_>| {
//!     // Frames borrow the parser's buffer and only live for this call
//!     count += 1;
//!     frame.message_id() == 0x0501
//! });
//! assert_eq!(count, 1);
//! ```
//! Corrupt frames, oversized length fields and line noise are dropped
//! silently and counted in [ParserStats].
//!
//! Navigation Snapshots
//! ====================
//!
//! [GnssClient] glues the parser to the NAV-PVT decoder and publishes a
//! [NavigationSnapshot] after every decoded fix. Readers on other threads
//! poll it through a [SnapshotReader]:
//! ```
//! use ubx_nav::{GnssClient, GpsTimeConfig, NavPvtBuilder};
//!
//! let mut client = GnssClient::new(GpsTimeConfig { week: 2407, leap_seconds: 18 });
//! let reader = client.reader();
//!
//! let bytes = NavPvtBuilder {
//!     vel_north: 3_000,
//!     vel_east: 4_000,
//!     ..NavPvtBuilder::default()
//! }
//! .into_packet_bytes();
//! client.feed(&bytes);
//!
//! let snapshot = reader.snapshot().unwrap();
//! assert!((snapshot.speed_2d - 5.0).abs() < 1e-9);
//! ```
//!
//! Building Frames
//! ===============
//!
//! [NavPvtBuilder] and [encode_frame] produce valid frames for fixtures and
//! recorded-capture simulation.

pub use crate::{
    client::{GnssClient, SnapshotReader},
    constants::MAX_PAYLOAD_LEN,
    error::{DateTimeError, ParserError},
    geodetic::{ned, GeodeticPoint, Ned},
    navigation::{
        correction_age_secs, CardinalDirection, DifferentialMode, GpsTimeConfig,
        NavigationSnapshot,
    },
    parser::{ubx_checksum, Frame, FrameHandler, Parser, ParserState, ParserStats, UbxChecksumCalc},
    ubx_packets::*,
};

mod client;
pub mod constants;
mod error;
pub mod geodetic;
pub mod navigation;
mod parser;
mod ubx_packets;
