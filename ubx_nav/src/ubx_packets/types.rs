use super::nav_pvt::NavPvt;
use crate::error::DateTimeError;
use chrono::prelude::*;
use core::{convert::TryFrom, fmt};

/// GNSS fix type reported in `NavPvt::fix_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GnssFixType {
    NoFix,
    DeadReckoningOnly,
    Fix2D,
    Fix3D,
    GPSPlusDeadReckoning,
    TimeOnlyFix,
    /// Reserved values in the receiver's numbering
    Unknown(u8),
}

impl From<u8> for GnssFixType {
    fn from(val: u8) -> Self {
        match val {
            0 => GnssFixType::NoFix,
            1 => GnssFixType::DeadReckoningOnly,
            2 => GnssFixType::Fix2D,
            3 => GnssFixType::Fix3D,
            4 => GnssFixType::GPSPlusDeadReckoning,
            5 => GnssFixType::TimeOnlyFix,
            other => GnssFixType::Unknown(other),
        }
    }
}

impl GnssFixType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GnssFixType::NoFix => "no fix",
            GnssFixType::DeadReckoningOnly => "dead reckoning",
            GnssFixType::Fix2D => "2D",
            GnssFixType::Fix3D => "3D",
            GnssFixType::GPSPlusDeadReckoning => "GNSS+DR",
            GnssFixType::TimeOnlyFix => "time only",
            GnssFixType::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for GnssFixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Carrier phase range solution status, the 2-bit `carrSoln` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierSolution {
    /// No carrier phase range solution
    None,
    /// Carrier phase range solution with floating ambiguities
    Float,
    /// Carrier phase range solution with fixed ambiguities
    Fixed,
    /// The reserved code `3`
    Unknown(u8),
}

impl CarrierSolution {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => CarrierSolution::None,
            1 => CarrierSolution::Float,
            2 => CarrierSolution::Fixed,
            other => CarrierSolution::Unknown(other),
        }
    }
}

/// Receiver-reported UTC date and time, including the nanosecond correction
impl TryFrom<&NavPvt> for DateTime<Utc> {
    type Error = DateTimeError;
    fn try_from(sol: &NavPvt) -> Result<Self, Self::Error> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(sol.year),
            u32::from(sol.month),
            u32::from(sol.day),
        )
        .ok_or(DateTimeError::InvalidDate)?;
        let time = NaiveTime::from_hms_opt(u32::from(sol.hour), u32::from(sol.min), u32::from(sol.sec))
            .ok_or(DateTimeError::InvalidTime)?;
        const NANOS_LIM: u32 = 1_000_000_000;
        if sol.nanosec.unsigned_abs() >= NANOS_LIM {
            return Err(DateTimeError::InvalidNanoseconds);
        }

        let dt = NaiveDateTime::new(date, time) + chrono::Duration::nanoseconds(i64::from(sol.nanosec));

        Ok(Utc.from_utc_datetime(&dt))
    }
}
