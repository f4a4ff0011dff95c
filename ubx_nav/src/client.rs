use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};

use crate::navigation::{GpsTimeConfig, NavigationSnapshot};
use crate::parser::{Frame, Parser, ParserStats};
use crate::ubx_packets::{NavDecoder, NavPvt};

type SharedSnapshot = Arc<RwLock<Option<NavigationSnapshot>>>;

/// Cloneable read handle on the latest published [NavigationSnapshot].
///
/// Readers always get a copy of one whole snapshot, never a mix of two fixes.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReader {
    shared: SharedSnapshot,
}

impl SnapshotReader {
    /// `None` until the first fix is decoded, and again after a reset
    pub fn snapshot(&self) -> Option<NavigationSnapshot> {
        *self.shared.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Byte stream in, navigation snapshots out.
///
/// Owns the frame parser and the NAV-PVT decoder. Every successfully decoded
/// NAV-PVT recomputes the snapshot and publishes it to all readers.
///
/// ```
/// use ubx_nav::{GnssClient, NavPvtBuilder};
///
/// let mut client = GnssClient::default();
/// let reader = client.reader();
/// let bytes = NavPvtBuilder { lat: 515_000_000, ..NavPvtBuilder::default() }.into_packet_bytes();
/// client.feed(&bytes);
/// let snapshot = reader.snapshot().unwrap();
/// assert!((snapshot.lat - 51.5).abs() < 1e-9);
/// ```
#[derive(Debug, Default)]
pub struct GnssClient {
    parser: Parser,
    decoder: NavDecoder,
    time: GpsTimeConfig,
    shared: SharedSnapshot,
    fixes: u64,
}

impl GnssClient {
    pub fn new(time: GpsTimeConfig) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn time_config(&self) -> GpsTimeConfig {
        self.time
    }

    /// Takes effect from the next decoded fix
    pub fn set_time_config(&mut self, time: GpsTimeConfig) {
        self.time = time;
    }

    /// Feed a chunk of the receiver byte stream. Chunk boundaries do not matter.
    pub fn feed(&mut self, bytes: &[u8]) {
        let decoder = &mut self.decoder;
        let shared = &self.shared;
        let time = &self.time;
        let fixes = &mut self.fixes;
        self.parser.feed(bytes, &mut |frame: Frame<'_>| {
            if !decoder.decode(frame.message_id(), frame.payload()) {
                return false;
            }
            if frame.message_id() == NavPvt::MESSAGE_ID {
                if let Some(pvt) = decoder.last_fix() {
                    let snapshot = NavigationSnapshot::from_fix(pvt, time);
                    *shared.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
                    *fixes += 1;
                }
            }
            true
        });
    }

    /// Forget all stream state: partial frame, last record and published snapshot.
    ///
    /// Call on every transport (re)connect before feeding the first byte.
    pub fn reset(&mut self) {
        debug!("Resetting GNSS client after {} fixes", self.fixes);
        self.parser.reset();
        self.decoder.reset();
        self.fixes = 0;
        *self.shared.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("GNSS client reset");
    }

    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }

    pub fn last_fix(&self) -> Option<&NavPvt> {
        self.decoder.last_fix()
    }

    /// Number of snapshots published since construction or the last reset
    pub fn fixes(&self) -> u64 {
        self.fixes
    }
}
