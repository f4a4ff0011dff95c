use std::fmt;

/// Error that possible during packets parsing
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParserError {
    InvalidChecksum {
        expect: u16,
        got: u16,
    },
    InvalidPacketLen {
        packet: &'static str,
        expect: usize,
        got: usize,
    },
    PayloadTooLarge {
        len: usize,
        max: usize,
    },
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::InvalidChecksum { expect, got } => write!(
                f,
                "Not valid packet's checksum, expect {:x}, got {:x}",
                expect, got
            ),
            ParserError::InvalidPacketLen {
                packet,
                expect,
                got,
            } => write!(
                f,
                "Invalid packet({}) length, expect {}, got {}",
                packet, expect, got
            ),
            ParserError::PayloadTooLarge { len, max } => {
                write!(f, "Declared payload length {} exceeds maximum {}", len, max)
            },
        }
    }
}

impl std::error::Error for ParserError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeError {
    InvalidDate,
    InvalidTime,
    InvalidNanoseconds,
    OutOfRange,
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeError::InvalidDate => f.write_str("invalid date"),
            DateTimeError::InvalidTime => f.write_str("invalid time"),
            DateTimeError::InvalidNanoseconds => f.write_str("invalid nanoseconds"),
            DateTimeError::OutOfRange => f.write_str("timestamp out of range"),
        }
    }
}

impl std::error::Error for DateTimeError {}
