/// A checksum-validated UBX frame, borrowed from the parser's payload buffer.
///
/// Frames only live for the duration of a [FrameHandler::handle] call. The
/// message id is the class byte in the high half and the id byte in the low
/// half, e.g. `0x0107` for NAV-PVT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    message_id: u16,
    payload: &'a [u8],
}

impl<'a> Frame<'a> {
    pub(crate) const fn new(message_id: u16, payload: &'a [u8]) -> Self {
        Self {
            message_id,
            payload,
        }
    }

    pub const fn message_id(&self) -> u16 {
        self.message_id
    }

    /// Message class (first id byte on the wire)
    pub const fn class(&self) -> u8 {
        (self.message_id >> 8) as u8
    }

    /// Message id within its class (second id byte on the wire)
    pub const fn msg_id(&self) -> u8 {
        (self.message_id & 0xff) as u8
    }

    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub const fn len(&self) -> usize {
        self.payload.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Receives frames as the [Parser](super::Parser) completes them.
///
/// The return value reports whether the frame was accepted. It only feeds the
/// parser statistics, the state machine resynchronizes either way.
pub trait FrameHandler {
    fn handle(&mut self, frame: Frame<'_>) -> bool;
}

/// Implement handler for simple callbacks / closures
impl<F: FnMut(Frame<'_>) -> bool> FrameHandler for F {
    fn handle(&mut self, frame: Frame<'_>) -> bool {
        self(frame)
    }
}
