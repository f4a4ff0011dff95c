mod builder;
mod nav_pvt;
mod types;

pub use builder::{encode_frame, NavPvtBuilder};
pub use nav_pvt::{NavPvt, NavPvtFlags, NavPvtFlags2, NavPvtFlags3, NavPvtValidFlags};
pub use types::{CarrierSolution, GnssFixType};

use log::{debug, trace};

use crate::parser::{Frame, FrameHandler};

/// Turns validated frames into the last known NAV-PVT record.
///
/// Only NAV-PVT is decoded. Any other message id is accepted and ignored, a
/// NAV-PVT frame of the wrong length is refused and leaves the previous
/// record in place.
#[derive(Debug, Default, Clone)]
pub struct NavDecoder {
    last: Option<NavPvt>,
}

impl NavDecoder {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Returns `false` only when a NAV-PVT payload could not be decoded.
    pub fn decode(&mut self, message_id: u16, payload: &[u8]) -> bool {
        if message_id != NavPvt::MESSAGE_ID {
            trace!("Ignoring UBX message {:#06x}", message_id);
            return true;
        }
        match NavPvt::parse(payload) {
            Ok(pvt) => {
                self.last = Some(pvt);
                true
            },
            Err(err) => {
                debug!("{}", err);
                false
            },
        }
    }

    /// Most recent successfully decoded record
    pub fn last_fix(&self) -> Option<&NavPvt> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl FrameHandler for NavDecoder {
    fn handle(&mut self, frame: Frame<'_>) -> bool {
        self.decode(frame.message_id(), frame.payload())
    }
}
