use super::nav_pvt::NavPvt;
use crate::constants::{UBX_CHECKSUM_LEN, UBX_HEADER_LEN, UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2};
use crate::parser::UbxChecksumCalc;

/// Wrap `payload` into a complete UBX frame: sync characters, id, length and checksum.
///
/// Used for fixtures and capture generation; payloads longer than `u16::MAX`
/// are truncated to what the length field can describe.
pub fn encode_frame(message_id: u16, payload: &[u8]) -> Vec<u8> {
    let len = payload.len().min(usize::from(u16::MAX));
    let payload = &payload[..len];
    let mut out = Vec::with_capacity(UBX_HEADER_LEN + len + UBX_CHECKSUM_LEN);
    out.push(UBX_SYNC_CHAR_1);
    out.push(UBX_SYNC_CHAR_2);
    out.extend_from_slice(&message_id.to_be_bytes());
    out.extend_from_slice(&(len as u16).to_le_bytes());
    out.extend_from_slice(payload);

    let mut checksum = UbxChecksumCalc::new();
    checksum.update(&out[2..]);
    let (ck_a, ck_b) = checksum.result();
    out.push(ck_a);
    out.push(ck_b);
    out
}

/// Field values for a synthetic NAV-PVT message, in wire units.
///
/// ```
/// use ubx_nav::{NavPvt, NavPvtBuilder};
///
/// let payload = NavPvtBuilder {
///     lon: 123_456_780,
///     lat: -77_123_400,
///     height_msl: 15_000,
///     ..NavPvtBuilder::default()
/// }
/// .into_payload_bytes();
/// let pvt = NavPvt::parse(&payload).unwrap();
/// assert_eq!(pvt.height_msl, 15_000);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavPvtBuilder {
    pub itow: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
    pub valid: u8,
    pub time_accuracy: u32,
    pub nanosec: i32,
    pub fix_type: u8,
    pub flags: u8,
    pub flags2: u8,
    pub num_satellites: u8,
    pub lon: i32,
    pub lat: i32,
    pub height: i32,
    pub height_msl: i32,
    pub h_acc: u32,
    pub v_acc: u32,
    pub vel_north: i32,
    pub vel_east: i32,
    pub vel_down: i32,
    pub g_speed: i32,
    pub head_motion: i32,
    pub s_acc: u32,
    pub head_acc: u32,
    pub pdop: u16,
    pub invalid_llh: bool,
    /// 4-bit age code, higher bits are dropped
    pub last_correction_age: u8,
    pub head_vehicle: i32,
    pub magnetic_declination: i16,
    pub magnetic_declination_accuracy: u16,
}

impl NavPvtBuilder {
    pub fn into_payload_bytes(self) -> [u8; NavPvt::PACKET_LEN] {
        let mut out = [0u8; NavPvt::PACKET_LEN];
        let flags3 = u16::from(self.invalid_llh) | (u16::from(self.last_correction_age & 0x0f) << 1);
        let mut off = 0;
        let mut put = |bytes: &[u8]| {
            out[off..off + bytes.len()].copy_from_slice(bytes);
            off += bytes.len();
        };
        put(&self.itow.to_le_bytes());
        put(&self.year.to_le_bytes());
        put(&[self.month, self.day, self.hour, self.min, self.sec, self.valid]);
        put(&self.time_accuracy.to_le_bytes());
        put(&self.nanosec.to_le_bytes());
        put(&[self.fix_type, self.flags, self.flags2, self.num_satellites]);
        put(&self.lon.to_le_bytes());
        put(&self.lat.to_le_bytes());
        put(&self.height.to_le_bytes());
        put(&self.height_msl.to_le_bytes());
        put(&self.h_acc.to_le_bytes());
        put(&self.v_acc.to_le_bytes());
        put(&self.vel_north.to_le_bytes());
        put(&self.vel_east.to_le_bytes());
        put(&self.vel_down.to_le_bytes());
        put(&self.g_speed.to_le_bytes());
        put(&self.head_motion.to_le_bytes());
        put(&self.s_acc.to_le_bytes());
        put(&self.head_acc.to_le_bytes());
        put(&self.pdop.to_le_bytes());
        put(&flags3.to_le_bytes());
        put(&[0; 4]);
        put(&self.head_vehicle.to_le_bytes());
        put(&self.magnetic_declination.to_le_bytes());
        put(&self.magnetic_declination_accuracy.to_le_bytes());
        out
    }

    pub fn into_packet_bytes(self) -> Vec<u8> {
        encode_frame(NavPvt::MESSAGE_ID, &self.into_payload_bytes())
    }
}
