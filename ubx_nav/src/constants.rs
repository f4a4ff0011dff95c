pub const UBX_SYNC_CHAR_1: u8 = 0xb5;
pub const UBX_SYNC_CHAR_2: u8 = 0x62;
/// Keep-alive filler some receivers and TCP bridges emit between frames.
pub const UBX_IDLE_CHAR: u8 = 0xff;

pub(crate) const UBX_SYNC_SIZE: usize = 2;
pub(crate) const UBX_MSG_ID_LEN: usize = 2;
pub(crate) const UBX_PAYLOAD_SIZE_LEN: usize = 2;
pub(crate) const UBX_HEADER_LEN: usize = UBX_SYNC_SIZE + UBX_MSG_ID_LEN + UBX_PAYLOAD_SIZE_LEN;
pub(crate) const UBX_CHECKSUM_LEN: usize = 2;

/// Largest payload the parser will buffer. Frames declaring more are treated as a desync.
pub const MAX_PAYLOAD_LEN: usize = 640;

/// Milliseconds in one GPS week
pub const MILLISECONDS_PER_WEEK: i64 = 604_800_000;

pub const METERS_PER_SEC_TO_MILES_PER_HOUR: f64 = 2.23694;
