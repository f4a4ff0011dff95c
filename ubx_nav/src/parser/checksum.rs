/// UBX [Fletcher-16 checksum](https://en.wikipedia.org/wiki/Fletcher%27s_checksum) calculator.
///
/// The checksum covers the two message id bytes, the two length bytes and the
/// payload, never the sync characters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UbxChecksumCalc {
    ck_a: u8,
    ck_b: u8,
}

impl UbxChecksumCalc {
    pub const fn new() -> Self {
        Self { ck_a: 0, ck_b: 0 }
    }

    /// Update checksum with new bytes
    pub const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub const fn update_byte(&mut self, byte: u8) {
        self.ck_a = self.ck_a.wrapping_add(byte);
        self.ck_b = self.ck_b.wrapping_add(self.ck_a);
    }

    pub const fn ck_a(&self) -> u8 {
        self.ck_a
    }

    pub const fn ck_b(&self) -> u8 {
        self.ck_b
    }

    /// Get the current checksum result
    pub const fn result(self) -> (u8, u8) {
        (self.ck_a, self.ck_b)
    }

    /// Checksum result packed the way it appears on the wire, `CK_A` in the low byte
    pub const fn as_u16(self) -> u16 {
        u16::from_le_bytes([self.ck_a, self.ck_b])
    }
}

/// One-shot checksum over `bytes`
pub const fn ubx_checksum(bytes: &[u8]) -> (u8, u8) {
    let mut calc = UbxChecksumCalc::new();
    calc.update(bytes);
    calc.result()
}
