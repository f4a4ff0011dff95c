//! Streaming UBX frame parser.
//!
//! The parser is an explicit state machine over single bytes, so feeding a
//! stream one byte at a time gives exactly the same frames as feeding it in
//! one call. It owns a fixed-capacity payload buffer and never allocates.

mod checksum;
mod frame;

pub use checksum::{ubx_checksum, UbxChecksumCalc};
pub use frame::{Frame, FrameHandler};

use log::{debug, info, trace, warn};

use crate::constants::{MAX_PAYLOAD_LEN, UBX_IDLE_CHAR, UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2};
use crate::error::ParserError;

/// Where the parser is within a frame. Each variant names the last field consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Looking for the first sync character
    #[default]
    Scanning,
    Sync1Seen,
    Sync2Seen,
    MsgIdHigh,
    MsgIdLow,
    LengthLow,
    /// Collecting payload, then expecting `CK_A`
    Payload,
    /// `CK_A` matched, expecting `CK_B`
    ChecksumA,
}

/// Diagnostic counters, cleared by [Parser::reset]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParserStats {
    /// Frames that passed both checksum bytes and were handed to the handler
    pub frames: u64,
    /// Delivered frames the handler refused
    pub rejected: u64,
    pub checksum_errors: u64,
    /// Frames whose declared length exceeded [MAX_PAYLOAD_LEN]
    pub oversized: u64,
    /// First sync character not followed by the second one
    pub sync_errors: u64,
    pub idle_bytes: u64,
}

/// Streaming parser for the UBX protocol.
///
/// ```
/// use ubx_nav::{Frame, Parser};
///
/// let mut parser = Parser::default();
/// let mut ids = Vec::new();
/// let bytes = [0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x04, 0x05, 0x11, 0x38];
/// parser.feed(&bytes, &mut |frame: Frame<'_>| {
///     ids.push(frame.message_id());
///     true
/// });
/// assert_eq!(ids, vec![0x0501]);
/// ```
pub struct Parser {
    state: ParserState,
    message_id: u16,
    payload_len: usize,
    received: usize,
    payload: [u8; MAX_PAYLOAD_LEN],
    checksum: UbxChecksumCalc,
    stats: ParserStats,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Parser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("state", &self.state)
            .field("message_id", &self.message_id)
            .field("payload_len", &self.payload_len)
            .field("received", &self.received)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            state: ParserState::Scanning,
            message_id: 0,
            payload_len: 0,
            received: 0,
            payload: [0; MAX_PAYLOAD_LEN],
            checksum: UbxChecksumCalc::new(),
            stats: ParserStats {
                frames: 0,
                rejected: 0,
                checksum_errors: 0,
                oversized: 0,
                sync_errors: 0,
                idle_bytes: 0,
            },
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Drop any partially assembled frame and return to [ParserState::Scanning].
    ///
    /// Must be called whenever the transport reconnects.
    pub fn reset(&mut self) {
        if self.state != ParserState::Scanning {
            info!(
                "Parser reset discards partial frame {:#06x} in state {:?}",
                self.message_id, self.state
            );
        }
        *self = Self::new();
    }

    /// Fold `bytes` into the parser, calling `handler` for every complete frame.
    pub fn feed<H: FrameHandler + ?Sized>(&mut self, bytes: &[u8], handler: &mut H) {
        for &byte in bytes {
            self.consume_byte(byte, handler);
        }
    }

    fn consume_byte<H: FrameHandler + ?Sized>(&mut self, byte: u8, handler: &mut H) {
        match self.state {
            ParserState::Scanning => self.scan(byte),
            ParserState::Sync1Seen => {
                if byte == UBX_SYNC_CHAR_2 {
                    self.state = ParserState::Sync2Seen;
                } else {
                    trace!("Sync mismatch, got {:#04x}", byte);
                    self.stats.sync_errors += 1;
                    self.state = ParserState::Scanning;
                    // The offending byte may itself start the next frame
                    self.scan(byte);
                }
            },
            ParserState::Sync2Seen => {
                self.message_id = u16::from(byte) << 8;
                self.checksum = UbxChecksumCalc::new();
                self.checksum.update_byte(byte);
                self.state = ParserState::MsgIdHigh;
            },
            ParserState::MsgIdHigh => {
                self.message_id |= u16::from(byte);
                self.checksum.update_byte(byte);
                self.state = ParserState::MsgIdLow;
            },
            ParserState::MsgIdLow => {
                self.payload_len = usize::from(byte);
                self.checksum.update_byte(byte);
                self.state = ParserState::LengthLow;
            },
            ParserState::LengthLow => {
                self.payload_len |= usize::from(byte) << 8;
                self.checksum.update_byte(byte);
                if self.payload_len > MAX_PAYLOAD_LEN {
                    warn!(
                        "Dropping UBX frame {:#06x}: {}",
                        self.message_id,
                        ParserError::PayloadTooLarge {
                            len: self.payload_len,
                            max: MAX_PAYLOAD_LEN,
                        }
                    );
                    self.stats.oversized += 1;
                    self.state = ParserState::Scanning;
                } else {
                    self.received = 0;
                    self.state = ParserState::Payload;
                }
            },
            ParserState::Payload => {
                if self.received < self.payload_len {
                    self.payload[self.received] = byte;
                    self.received += 1;
                    self.checksum.update_byte(byte);
                } else if byte == self.checksum.ck_a() {
                    self.state = ParserState::ChecksumA;
                } else {
                    debug!(
                        "Dropping UBX frame {:#06x}: CK_A expect {:#04x}, got {:#04x}",
                        self.message_id,
                        self.checksum.ck_a(),
                        byte
                    );
                    self.stats.checksum_errors += 1;
                    self.state = ParserState::Scanning;
                }
            },
            ParserState::ChecksumA => {
                if byte == self.checksum.ck_b() {
                    let frame = Frame::new(self.message_id, &self.payload[..self.payload_len]);
                    self.stats.frames += 1;
                    if !handler.handle(frame) {
                        debug!("UBX frame {:#06x} rejected by handler", self.message_id);
                        self.stats.rejected += 1;
                    }
                } else {
                    debug!(
                        "Dropping UBX frame {:#06x}: {}",
                        self.message_id,
                        ParserError::InvalidChecksum {
                            expect: self.checksum.as_u16(),
                            got: u16::from_le_bytes([self.checksum.ck_a(), byte]),
                        }
                    );
                    self.stats.checksum_errors += 1;
                }
                // Accepted or not, the next frame starts from a clean scan
                self.state = ParserState::Scanning;
            },
        }
    }

    fn scan(&mut self, byte: u8) {
        match byte {
            UBX_SYNC_CHAR_1 => self.state = ParserState::Sync1Seen,
            UBX_IDLE_CHAR => self.stats.idle_bytes += 1,
            _ => {},
        }
    }
}
