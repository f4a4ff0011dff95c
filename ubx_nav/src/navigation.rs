//! Navigation state derived from a single NAV-PVT record.
//!
//! Everything here is pure arithmetic: the same record and [GpsTimeConfig]
//! always produce the same [NavigationSnapshot].

use chrono::{DateTime, Utc};
use core::fmt;

use crate::constants::{METERS_PER_SEC_TO_MILES_PER_HOUR, MILLISECONDS_PER_WEEK};
use crate::error::DateTimeError;
use crate::ubx_packets::{CarrierSolution, GnssFixType, NavPvt};

/// Unix time of the GPS epoch, 1980-01-06T00:00:00Z, in milliseconds
const GPS_EPOCH_UNIX_MS: i64 = 315_964_800_000;

/// Seconds since the last differential correction, indexed by the 4-bit age code.
/// `255` means no correction has been received.
const CORRECTION_AGE_SECS: [u8; 13] = [255, 0, 1, 2, 5, 10, 15, 20, 30, 45, 60, 90, 120];

/// GPS week and UTC offset used to turn time-of-week into a UTC instant.
///
/// NAV-PVT only carries the millisecond time of week, so the week number has
/// to come from somewhere else. Both values change over time and must be kept
/// current by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsTimeConfig {
    /// Full GPS week number, not the 10-bit broadcast value
    pub week: u32,
    /// GPS minus UTC in seconds
    pub leap_seconds: u32,
}

impl Default for GpsTimeConfig {
    fn default() -> Self {
        Self {
            week: 2407,
            leap_seconds: 18,
        }
    }
}

impl GpsTimeConfig {
    /// UTC instant for a GPS time-of-week in milliseconds
    pub fn utc_from_itow(&self, itow_ms: u32) -> Result<DateTime<Utc>, DateTimeError> {
        let ms = GPS_EPOCH_UNIX_MS
            + i64::from(self.week) * MILLISECONDS_PER_WEEK
            + i64::from(itow_ms)
            - i64::from(self.leap_seconds) * 1000;
        DateTime::from_timestamp_millis(ms).ok_or(DateTimeError::OutOfRange)
    }
}

/// Eight-way compass point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    const ALL: [CardinalDirection; 8] = [
        CardinalDirection::N,
        CardinalDirection::NE,
        CardinalDirection::E,
        CardinalDirection::SE,
        CardinalDirection::S,
        CardinalDirection::SW,
        CardinalDirection::W,
        CardinalDirection::NW,
    ];

    /// Nearest compass point, each one covering a 45° sector centred on it
    pub fn from_degrees(heading: f64) -> Self {
        let sector = ((heading + 22.5) / 45.0).floor() as i64;
        Self::ALL[sector.rem_euclid(8) as usize]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality of the position solution as far as corrections are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum DifferentialMode {
    /// Standard positioning, no corrections applied
    Sps,
    /// Code-based differential corrections
    Dgnss,
    /// RTK with floating ambiguities
    Float,
    /// RTK with fixed ambiguities
    Integer,
}

impl DifferentialMode {
    pub fn from_fix(pvt: &NavPvt) -> Self {
        if !pvt.flags.diff_soln() {
            return DifferentialMode::Sps;
        }
        match pvt.flags.carr_soln() {
            CarrierSolution::Float => DifferentialMode::Float,
            CarrierSolution::Fixed => DifferentialMode::Integer,
            CarrierSolution::None | CarrierSolution::Unknown(_) => DifferentialMode::Dgnss,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            DifferentialMode::Sps => "SPS",
            DifferentialMode::Dgnss => "DGNSS",
            DifferentialMode::Float => "FLOAT",
            DifferentialMode::Integer => "INTEGER",
        }
    }
}

impl fmt::Display for DifferentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bound in seconds of the correction age bucket `code` falls in.
///
/// Returns `255` for code `0` (not available). Codes above 12 are clamped.
pub fn correction_age_secs(code: u8) -> u8 {
    let idx = usize::from(code).min(CORRECTION_AGE_SECS.len() - 1);
    CORRECTION_AGE_SECS[idx]
}

/// Everything the dashboard shows, in display units, computed from one fix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationSnapshot {
    /// deg
    pub lat: f64,
    /// deg
    pub lon: f64,
    /// Height above mean sea level, m
    pub height_msl: f64,
    /// Height above the WGS-84 ellipsoid, m
    pub height_ellipsoid: f64,
    /// m/s
    pub vel_north: f64,
    /// m/s
    pub vel_east: f64,
    /// m/s
    pub vel_down: f64,
    /// Horizontal speed from the N/E velocity, m/s
    pub speed_2d: f64,
    /// m/s
    pub speed_3d: f64,
    /// `speed_2d` in miles per hour
    pub speed_over_ground_mph: f64,
    /// Heading of motion in `[0, 360)` degrees
    pub heading: f64,
    pub cardinal: CardinalDirection,
    pub satellites: u8,
    pub fix_type: GnssFixType,
    pub gnss_fix_ok: bool,
    /// GPS time of week, ms
    pub gps_tow_ms: u32,
    /// Instant derived from `gps_tow_ms` and the configured GPS week
    pub utc: Option<DateTime<Utc>>,
    /// Date and time fields as reported by the receiver
    pub receiver_utc: Option<DateTime<Utc>>,
    pub differential_mode: DifferentialMode,
    /// s, `255` when no correction has been received
    pub correction_age_secs: u8,
}

impl NavigationSnapshot {
    pub fn from_fix(pvt: &NavPvt, time: &GpsTimeConfig) -> Self {
        let vel_north = pvt.vel_north();
        let vel_east = pvt.vel_east();
        let vel_down = pvt.vel_down();
        let speed_2d = vel_north.hypot(vel_east);
        let speed_3d = (vel_north * vel_north + vel_east * vel_east + vel_down * vel_down).sqrt();
        let heading = pvt.heading_motion().rem_euclid(360.0);

        Self {
            lat: pvt.lat_degrees(),
            lon: pvt.lon_degrees(),
            height_msl: pvt.height_msl(),
            height_ellipsoid: pvt.height_above_ellipsoid(),
            vel_north,
            vel_east,
            vel_down,
            speed_2d,
            speed_3d,
            speed_over_ground_mph: speed_2d * METERS_PER_SEC_TO_MILES_PER_HOUR,
            heading,
            cardinal: CardinalDirection::from_degrees(heading),
            satellites: pvt.num_satellites,
            fix_type: pvt.fix_type(),
            gnss_fix_ok: pvt.flags.gnss_fix_ok(),
            gps_tow_ms: pvt.itow,
            utc: time.utc_from_itow(pvt.itow).ok(),
            receiver_utc: DateTime::<Utc>::try_from(pvt).ok(),
            differential_mode: DifferentialMode::from_fix(pvt),
            correction_age_secs: correction_age_secs(pvt.flags3.last_correction_age()),
        }
    }
}
