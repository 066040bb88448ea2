//! Date codec for the two numeric date encodings used by the Things store.
//!
//! ## Calendar dates
//!
//! Scheduled dates (`startDate`) and deadlines (`deadline`) are stored as a
//! single integer with the layout
//!
//! ```text
//! bit 26 ........ 16 | 15 .. 12 | 11 .... 7 | 6 ... 0
//!       year (11)    | month (4)|  day (5)  | reserved
//! ```
//!
//! Zero or NULL means "unset". Values are naive calendar dates with no
//! timezone. "Today" is packed with the same layout and all comparisons are
//! done on the packed integer, never on decoded components.
//!
//! ## Instants
//!
//! Creation, modification and completion times are seconds since the Unix
//! epoch (fractional seconds allowed). Zero or NULL means "unset".

use super::error::{EngineError, EngineResult};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

const YEAR_SHIFT: u32 = 16;
const MONTH_SHIFT: u32 = 12;
const DAY_SHIFT: u32 = 7;
const YEAR_MASK: i64 = 0x7FF;
const MONTH_MASK: i64 = 0xF;
const DAY_MASK: i64 = 0x1F;

/// Bits that carry the date; everything else is reserved.
const DATE_BITS: i64 = (YEAR_MASK << YEAR_SHIFT) | (MONTH_MASK << MONTH_SHIFT) | (DAY_MASK << DAY_SHIFT);

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated packed calendar date.
///
/// Ordering and equality follow the packed integer, which orders the same way
/// as the calendar because the year occupies the most significant bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackedDate {
    raw: i64,
    date: NaiveDate,
}

impl PackedDate {
    /// Packs a calendar date. Years outside the 11-bit field cannot be encoded.
    pub fn encode(date: NaiveDate) -> EngineResult<Self> {
        let year = i64::from(date.year());
        if !(0..=YEAR_MASK).contains(&year) {
            return Err(EngineError::InvalidArgument(format!(
                "year {} does not fit the packed date layout (0..={})",
                year, YEAR_MASK
            )));
        }
        let raw = (year << YEAR_SHIFT) | (i64::from(date.month()) << MONTH_SHIFT) | (i64::from(date.day()) << DAY_SHIFT);
        Ok(PackedDate { raw, date })
    }

    /// Decodes a stored packed integer into a calendar date.
    ///
    /// Out-of-range months or days are reported as a data-integrity failure
    /// rather than clamped.
    pub fn decode(raw: i64) -> EngineResult<NaiveDate> {
        let year = (raw >> YEAR_SHIFT) & YEAR_MASK;
        let month = (raw >> MONTH_SHIFT) & MONTH_MASK;
        let day = (raw >> DAY_SHIFT) & DAY_MASK;

        NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).ok_or_else(|| {
            EngineError::DataIntegrity(format!(
                "packed date {} decodes to invalid calendar date {:04}-{:02}-{:02}",
                raw, year, month, day
            ))
        })
    }

    /// Validates a non-zero stored value, dropping the reserved low bits.
    pub fn from_raw(raw: i64) -> EngineResult<Self> {
        let date = Self::decode(raw)?;
        Ok(PackedDate { raw: raw & DATE_BITS, date })
    }

    /// Reads an optional column value: NULL and zero both mean unset.
    pub fn from_column(raw: Option<i64>) -> EngineResult<Option<Self>> {
        match raw {
            None | Some(0) => Ok(None),
            Some(value) => Self::from_raw(value).map(Some),
        }
    }

    /// Today's local date, packed.
    ///
    /// Only collaborators call this. The engine always receives "today" as an
    /// argument.
    pub fn today() -> EngineResult<Self> {
        Self::encode(Local::now().date_naive())
    }

    /// Parses a `YYYY-MM-DD` string.
    pub fn parse(value: &str) -> EngineResult<Self> {
        let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map_err(|e| EngineError::InvalidArgument(format!("unparseable date '{}': {}", value, e)))?;
        Self::encode(date)
    }

    pub fn add_days(self, days: i64) -> EngineResult<Self> {
        let shifted = Duration::try_days(days)
            .and_then(|delta| self.date.checked_add_signed(delta))
            .ok_or_else(|| EngineError::InvalidArgument(format!("{} + {} days is out of range", self, days)))?;
        Self::encode(shifted)
    }

    pub fn raw(self) -> i64 {
        self.raw
    }

    pub fn date(self) -> NaiveDate {
        self.date
    }
}

impl Display for PackedDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format(DATE_FORMAT))
    }
}

impl Serialize for PackedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Decodes an epoch-seconds column. NULL and zero both mean unset.
pub fn decode_instant(seconds: Option<f64>) -> EngineResult<Option<DateTime<Utc>>> {
    let seconds = match seconds {
        None => return Ok(None),
        Some(s) if s == 0.0 => return Ok(None),
        Some(s) => s,
    };
    if !seconds.is_finite() {
        return Err(EngineError::DataIntegrity(format!("timestamp {} is not a finite number", seconds)));
    }

    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
        .map(Some)
        .ok_or_else(|| EngineError::DataIntegrity(format!("timestamp {} is out of range", seconds)))
}

/// Encodes an instant as fractional epoch seconds.
pub fn encode_instant(instant: DateTime<Utc>) -> f64 {
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1_000_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::error::ErrorKind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn encodes_known_layout() {
        let packed = PackedDate::encode(ymd(2024, 1, 15)).unwrap();
        assert_eq!(packed.raw(), 132_650_880);
        assert_eq!(PackedDate::decode(132_650_880).unwrap(), ymd(2024, 1, 15));
    }

    #[test]
    fn round_trips_every_day_in_range() {
        let mut day = ymd(1900, 1, 1);
        let last = ymd(2047, 12, 31);
        while day <= last {
            let packed = PackedDate::encode(day).unwrap();
            assert_eq!(PackedDate::decode(packed.raw()).unwrap(), day);
            assert_eq!(PackedDate::from_raw(packed.raw()).unwrap(), packed);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn ordering_follows_calendar_across_month_and_year_boundaries() {
        let dec31 = PackedDate::encode(ymd(2023, 12, 31)).unwrap();
        let jan1 = PackedDate::encode(ymd(2024, 1, 1)).unwrap();
        let jan31 = PackedDate::encode(ymd(2024, 1, 31)).unwrap();
        let feb1 = PackedDate::encode(ymd(2024, 2, 1)).unwrap();
        assert!(dec31 < jan1);
        assert!(jan31 < feb1);
    }

    #[test]
    fn reserved_bits_are_ignored() {
        let packed = PackedDate::encode(ymd(2025, 6, 3)).unwrap();
        let noisy = PackedDate::from_raw(packed.raw() | 0x55).unwrap();
        assert_eq!(noisy, packed);
    }

    #[test]
    fn zero_and_null_are_unset() {
        assert_eq!(PackedDate::from_column(None).unwrap(), None);
        assert_eq!(PackedDate::from_column(Some(0)).unwrap(), None);
    }

    #[test]
    fn invalid_components_are_data_integrity_errors() {
        let bad_month = (2024 << 16) | (13 << 12) | (1 << 7);
        let bad_day = (2023 << 16) | (2 << 12) | (30 << 7);
        assert_eq!(PackedDate::from_raw(bad_month).unwrap_err().kind(), ErrorKind::DataIntegrity);
        assert_eq!(PackedDate::from_raw(bad_day).unwrap_err().kind(), ErrorKind::DataIntegrity);
    }

    #[test]
    fn years_beyond_eleven_bits_cannot_be_encoded() {
        let err = PackedDate::encode(ymd(2048, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn parse_and_add_days() {
        let date = PackedDate::parse("2024-02-28").unwrap();
        assert_eq!(date.add_days(1).unwrap().to_string(), "2024-02-29");
        assert_eq!(date.add_days(2).unwrap().to_string(), "2024-03-01");
        assert_eq!(PackedDate::parse("28/02/2024").unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn huge_day_offsets_are_invalid_arguments() {
        let date = PackedDate::parse("2024-02-28").unwrap();
        assert_eq!(date.add_days(i64::MAX).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(date.add_days(i64::MIN).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(date.add_days(100_000).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn instants_decode_fractional_seconds() {
        assert_eq!(decode_instant(None).unwrap(), None);
        assert_eq!(decode_instant(Some(0.0)).unwrap(), None);

        let instant = decode_instant(Some(1_700_000_000.5)).unwrap().unwrap();
        assert_eq!(instant.to_rfc3339(), "2023-11-14T22:13:20.500+00:00");
        assert_eq!(encode_instant(instant), 1_700_000_000.5);
    }

    #[test]
    fn non_finite_instants_are_rejected() {
        let err = decode_instant(Some(f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }
}
