use bitflags::bitflags;

use super::types::{CarrierSolution, GnssFixType};
use crate::error::ParserError;

bitflags! {
    /// Validity flags
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct NavPvtValidFlags: u8 {
        /// 1 = valid UTC Date
        const VALID_DATE = 0x01;
        /// 1 = valid UTC time of day
        const VALID_TIME = 0x02;
        /// 1 = UTC time of day has been fully resolved (no seconds uncertainty).
        /// Cannot be used to check if time is completely solved.
        const FULLY_RESOLVED = 0x04;
        /// 1 = valid magnetic declination
        const VALID_MAG = 0x08;
    }
}

bitflags! {
    /// Additional flags for `NavPvt`, informational only
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct NavPvtFlags2: u8 {
        /// 1 = information about UTC Date and Time of Day validity confirmation
        /// is available
        const CONFIRMED_AVAI = 0x20;
        /// 1 = UTC Date validity could be confirmed
        const CONFIRMED_DATE = 0x40;
        /// 1 = UTC Time of Day could be confirmed
        const CONFIRMED_TIME = 0x80;
    }
}

/// Fix status flags for `NavPvt`.
///
/// | bit | field |
/// |-----|-------|
/// | 0   | `gnssFixOK`, fix within DOP and accuracy masks |
/// | 1   | `diffSoln`, differential corrections applied |
/// | 2-4 | reserved |
/// | 5   | `headVehValid` |
/// | 6-7 | `carrSoln`, see [CarrierSolution] |
#[repr(transparent)]
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct NavPvtFlags(u8);

impl NavPvtFlags {
    const GNSS_FIX_OK: u8 = 0x01;
    const DIFF_SOLN: u8 = 0x02;
    const HEAD_VEH_VALID: u8 = 0x20;
    const CARR_SOLN_SHIFT: u8 = 6;
    const CARR_SOLN_MASK: u8 = 0x03;

    pub const fn from(x: u8) -> Self {
        Self(x)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn gnss_fix_ok(&self) -> bool {
        self.0 & Self::GNSS_FIX_OK != 0
    }

    pub const fn diff_soln(&self) -> bool {
        self.0 & Self::DIFF_SOLN != 0
    }

    pub const fn head_veh_valid(&self) -> bool {
        self.0 & Self::HEAD_VEH_VALID != 0
    }

    /// Raw 2-bit carrier solution code
    pub const fn carr_soln_code(&self) -> u8 {
        (self.0 >> Self::CARR_SOLN_SHIFT) & Self::CARR_SOLN_MASK
    }

    pub const fn carr_soln(&self) -> CarrierSolution {
        CarrierSolution::from_code(self.carr_soln_code())
    }
}

impl core::fmt::Debug for NavPvtFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavPvtFlags")
            .field("gnss_fix_ok", &self.gnss_fix_ok())
            .field("diff_soln", &self.diff_soln())
            .field("head_veh_valid", &self.head_veh_valid())
            .field("carr_soln", &self.carr_soln())
            .finish()
    }
}

/// Extended flags word, the first two bytes of the reserved block after `pDOP`.
///
/// | bit  | field |
/// |------|-------|
/// | 0    | `invalidLlh`, position fields must not be trusted |
/// | 1-4  | `lastCorrectionAge`, see [correction_age_secs](crate::correction_age_secs) |
/// | 5-15 | reserved |
///
/// Firmware that predates the word sends zeroes, so the age code reads 0 (none).
#[repr(transparent)]
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct NavPvtFlags3(u16);

impl NavPvtFlags3 {
    const INVALID_LLH: u16 = 0x0001;
    const CORRECTION_AGE_SHIFT: u16 = 1;
    const CORRECTION_AGE_MASK: u16 = 0x0f;

    pub const fn from(x: u16) -> Self {
        Self(x)
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub const fn invalid_llh(&self) -> bool {
        self.0 & Self::INVALID_LLH != 0
    }

    /// Raw 4-bit age code. 0 means no correction was received, 12 and above
    /// mean two minutes or older.
    pub const fn last_correction_age(&self) -> u8 {
        ((self.0 >> Self::CORRECTION_AGE_SHIFT) & Self::CORRECTION_AGE_MASK) as u8
    }
}

impl core::fmt::Debug for NavPvtFlags3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavPvtFlags3")
            .field("invalid_llh", &self.invalid_llh())
            .field("last_correction_age", &self.last_correction_age())
            .finish()
    }
}

/// Navigation Position Velocity Time Solution (UBX-NAV-PVT), decoded field by field.
///
/// Raw integers are kept in their wire units; the `*_degrees`, `height_*` and
/// `vel_*` accessors apply the scale factors.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NavPvt {
    /// GPS Millisecond time of week of the navigation epoch.
    pub itow: u32,

    /// Year (UTC)
    pub year: u16,
    /// Month, range 1..12 (UTC)
    pub month: u8,
    /// Day of month, range 1..31 (UTC)
    pub day: u8,
    /// Hour of day, range 0..23 (UTC)
    pub hour: u8,
    /// Minute of hour, range 0..59 (UTC)
    pub min: u8,
    /// Seconds of minute, range 0..60 (UTC)
    pub sec: u8,
    pub valid: NavPvtValidFlags,
    /// Time accuracy estimate in nanoseconds (UTC)
    pub time_accuracy: u32,
    /// Fraction of second, range -1e9 .. 1e9 (UTC)
    pub nanosec: i32,
    pub fix_type: u8,
    pub flags: NavPvtFlags,
    pub flags2: NavPvtFlags2,
    /// Number of satellites used in Nav Solution
    pub num_satellites: u8,
    /// Longitude, 1e-7 deg
    pub lon: i32,
    /// Latitude, 1e-7 deg
    pub lat: i32,
    /// Height above reference ellipsoid, mm
    pub height: i32,
    /// Height above mean sea level, mm
    pub height_msl: i32,
    /// Horizontal accuracy, mm
    pub h_acc: u32,
    /// Vertical accuracy, mm
    pub v_acc: u32,
    /// mm/s
    pub vel_north: i32,
    /// mm/s
    pub vel_east: i32,
    /// mm/s
    pub vel_down: i32,
    /// Ground speed, mm/s
    pub g_speed: i32,
    /// Heading of motion 2-D, 1e-5 deg
    pub head_motion: i32,
    /// Speed accuracy, mm/s
    pub s_acc: u32,
    /// Heading accuracy, 1e-5 deg
    pub head_acc: u32,
    /// Position DOP, 0.01
    pub pdop: u16,
    pub flags3: NavPvtFlags3,
    /// Raw bytes of the block after `pDOP`, including the `flags3` word
    pub reserved1: [u8; 6],
    /// Heading of vehicle 2-D, 1e-5 deg
    pub head_vehicle: i32,
    /// Magnetic declination, 1e-2 deg
    pub magnetic_declination: i16,
    /// Magnetic declination accuracy, 1e-2 deg
    pub magnetic_declination_accuracy: u16,
}

/// Little-endian cursor over a payload whose length was checked up front
struct FieldReader<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0; N];
        out.copy_from_slice(&self.buf[self.off..self.off + N]);
        self.off += N;
        out
    }

    fn u8(&mut self) -> u8 {
        let [b] = self.bytes::<1>();
        b
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.bytes())
    }

    fn i16(&mut self) -> i16 {
        i16::from_le_bytes(self.bytes())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.bytes())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.bytes())
    }
}

impl NavPvt {
    pub const CLASS: u8 = 0x01;
    pub const ID: u8 = 0x07;
    pub const MESSAGE_ID: u16 = ((Self::CLASS as u16) << 8) | Self::ID as u16;
    pub const PACKET_LEN: usize = 92;
    pub const NAME: &'static str = "NavPvt";

    /// Decode a NAV-PVT payload. The payload must be exactly [Self::PACKET_LEN] bytes.
    pub fn parse(payload: &[u8]) -> Result<Self, ParserError> {
        if payload.len() != Self::PACKET_LEN {
            return Err(ParserError::InvalidPacketLen {
                packet: Self::NAME,
                expect: Self::PACKET_LEN,
                got: payload.len(),
            });
        }

        let mut r = FieldReader::new(payload);
        let itow = r.u32();
        let year = r.u16();
        let month = r.u8();
        let day = r.u8();
        let hour = r.u8();
        let min = r.u8();
        let sec = r.u8();
        let valid = NavPvtValidFlags::from_bits_retain(r.u8());
        let time_accuracy = r.u32();
        let nanosec = r.i32();
        let fix_type = r.u8();
        let flags = NavPvtFlags::from(r.u8());
        let flags2 = NavPvtFlags2::from_bits_retain(r.u8());
        let num_satellites = r.u8();
        let lon = r.i32();
        let lat = r.i32();
        let height = r.i32();
        let height_msl = r.i32();
        let h_acc = r.u32();
        let v_acc = r.u32();
        let vel_north = r.i32();
        let vel_east = r.i32();
        let vel_down = r.i32();
        let g_speed = r.i32();
        let head_motion = r.i32();
        let s_acc = r.u32();
        let head_acc = r.u32();
        let pdop = r.u16();
        let reserved1: [u8; 6] = r.bytes();
        let flags3 = NavPvtFlags3::from(u16::from_le_bytes([reserved1[0], reserved1[1]]));
        let head_vehicle = r.i32();
        let magnetic_declination = r.i16();
        let magnetic_declination_accuracy = r.u16();
        debug_assert_eq!(r.off, Self::PACKET_LEN);

        Ok(Self {
            itow,
            year,
            month,
            day,
            hour,
            min,
            sec,
            valid,
            time_accuracy,
            nanosec,
            fix_type,
            flags,
            flags2,
            num_satellites,
            lon,
            lat,
            height,
            height_msl,
            h_acc,
            v_acc,
            vel_north,
            vel_east,
            vel_down,
            g_speed,
            head_motion,
            s_acc,
            head_acc,
            pdop,
            flags3,
            reserved1,
            head_vehicle,
            magnetic_declination,
            magnetic_declination_accuracy,
        })
    }

    pub fn fix_type(&self) -> GnssFixType {
        GnssFixType::from(self.fix_type)
    }

    /// Longitude in \[deg\]
    pub fn lon_degrees(&self) -> f64 {
        f64::from(self.lon) * 1e-7
    }

    /// Latitude in \[deg\]
    pub fn lat_degrees(&self) -> f64 {
        f64::from(self.lat) * 1e-7
    }

    /// Height above reference ellipsoid in \[m\]
    pub fn height_above_ellipsoid(&self) -> f64 {
        f64::from(self.height) * 1e-3
    }

    /// Height above Mean Sea Level in \[m\]
    pub fn height_msl(&self) -> f64 {
        f64::from(self.height_msl) * 1e-3
    }

    /// Velocity North component \[m/s\]
    pub fn vel_north(&self) -> f64 {
        f64::from(self.vel_north) * 1e-3
    }

    /// Velocity East component \[m/s\]
    pub fn vel_east(&self) -> f64 {
        f64::from(self.vel_east) * 1e-3
    }

    /// Velocity Down component \[m/s\]
    pub fn vel_down(&self) -> f64 {
        f64::from(self.vel_down) * 1e-3
    }

    /// Heading of motion 2-D \[deg\]
    pub fn heading_motion(&self) -> f64 {
        f64::from(self.head_motion) * 1e-5
    }

    /// Heading of vehicle 2-D \[deg\]
    pub fn heading_vehicle(&self) -> f64 {
        f64::from(self.head_vehicle) * 1e-5
    }

    /// Position DOP
    pub fn pdop(&self) -> f64 {
        f64::from(self.pdop) * 1e-2
    }

    /// Magnetic declination \[deg\]
    pub fn magnetic_declination(&self) -> f64 {
        f64::from(self.magnetic_declination) * 1e-2
    }
}
