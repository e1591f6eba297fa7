//! Time of day with a fixed UTC offset.
//!
//! Parties store their start and end as a `DATE` plus a `TIMETZ` so that a
//! party can be looked up by day without touching the clock time. `TimeTz` is
//! the Rust side of a `TIMETZ` value.

use chrono::{FixedOffset, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PostgreSQL rejects zone offsets beyond 15:59:59.
const MAX_OFFSET_SECS: i32 = 15 * 3600 + 59 * 60 + 59;

const MICROS_PER_DAY: i64 = 86_400_000_000;

/// A `TIMETZ` value: wall-clock time plus the offset it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeTz {
    time: NaiveTime,
    offset: FixedOffset,
}

impl TimeTz {
    pub fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    /// Build from hour/minute and a whole-hour offset east of UTC.
    pub fn from_hm(hour: u32, minute: u32, offset_hours: i32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        let offset = FixedOffset::east_opt(offset_hours * 3600)?;
        Some(Self { time, offset })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Microseconds since local midnight, as sent on the wire.
    pub fn micros_since_midnight(&self) -> i64 {
        i64::from(self.time.num_seconds_from_midnight()) * 1_000_000
            + i64::from(self.time.nanosecond() / 1_000)
    }

    /// Microseconds since midnight UTC, which is how the server orders
    /// `TIMETZ` values. May fall outside a single day.
    pub fn utc_micros(&self) -> i64 {
        self.micros_since_midnight() - i64::from(self.offset.local_minus_utc()) * 1_000_000
    }

    /// Rebuild from the wire pair. `zone_west_secs` follows the server's
    /// convention of seconds *west* of UTC.
    /// The server also stores `24:00:00`, which has no `NaiveTime` and is
    /// rejected here.
    pub fn from_wire(micros: i64, zone_west_secs: i32) -> Result<Self, String> {
        if micros == MICROS_PER_DAY {
            return Err("timetz 24:00:00 is not supported".to_string());
        }
        if !(0..MICROS_PER_DAY).contains(&micros) {
            return Err(format!("timetz value out of range: {} us", micros));
        }
        let secs = (micros / 1_000_000) as u32;
        let nanos = ((micros % 1_000_000) * 1_000) as u32;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
            .ok_or_else(|| format!("timetz value out of range: {} us", micros))?;
        let offset = FixedOffset::east_opt(-zone_west_secs)
            .ok_or_else(|| format!("timetz zone out of range: {} s", zone_west_secs))?;
        Ok(Self { time, offset })
    }
}

fn parse_offset(s: &str) -> Result<FixedOffset, String> {
    let (sign, body) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(format!("Missing sign in zone offset: {:?}", s)),
    };
    if !body.is_ascii() {
        return Err(format!("Invalid zone offset: {:?}", s));
    }

    let parts: Vec<&str> = if body.contains(':') {
        body.split(':').collect()
    } else if body.len() == 4 {
        vec![&body[..2], &body[2..]]
    } else {
        vec![body]
    };
    if parts.is_empty() || parts.len() > 3 {
        return Err(format!("Invalid zone offset: {:?}", s));
    }

    let mut secs = 0i32;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid zone offset: {:?}", s));
        }
        let value: i32 = part
            .parse()
            .map_err(|_| format!("Invalid zone offset: {:?}", s))?;
        if i > 0 && value >= 60 {
            return Err(format!("Invalid zone offset: {:?}", s));
        }
        secs += value * [3600, 60, 1][i];
    }
    if secs > MAX_OFFSET_SECS {
        return Err(format!("Zone offset out of range: {:?}", s));
    }

    FixedOffset::east_opt(sign * secs).ok_or_else(|| format!("Zone offset out of range: {:?}", s))
}

impl FromStr for TimeTz {
    type Err = String;

    /// Parse `HH:MM[:SS[.ffffff]]` followed by `±HH[:MM[:SS]]` or `±HHMM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .rfind(['+', '-'])
            .ok_or_else(|| format!("Missing zone offset in time: {:?}", s))?;
        let (time_part, offset_part) = s.split_at(split);

        let time = NaiveTime::parse_from_str(time_part, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(time_part, "%H:%M"))
            .map_err(|_| format!("Invalid time of day: {:?}", time_part))?;

        Ok(Self {
            time,
            offset: parse_offset(offset_part)?,
        })
    }
}

impl fmt::Display for TimeTz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.time.nanosecond() == 0 {
            write!(f, "{}", self.time.format("%H:%M:%S"))?;
        } else {
            write!(f, "{}", self.time.format("%H:%M:%S%.6f"))?;
        }

        let east = self.offset.local_minus_utc();
        let sign = if east < 0 { '-' } else { '+' };
        let abs = east.abs();
        write!(f, "{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)?;
        if abs % 60 != 0 {
            write!(f, ":{:02}", abs % 60)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for TimeTz {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeTz> for String {
    fn from(value: TimeTz) -> Self {
        value.to_string()
    }
}

#[cfg(feature = "postgres")]
mod sql {
    use super::TimeTz;
    use bytes::{BufMut, BytesMut};
    use postgres_types::{accepts, to_sql_checked, FromSql, IsNull, ToSql, Type};
    use std::error::Error;

    impl ToSql for TimeTz {
        fn to_sql(
            &self,
            _ty: &Type,
            out: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
            out.put_i64(self.micros_since_midnight());
            out.put_i32(-self.offset.local_minus_utc());
            Ok(IsNull::No)
        }

        accepts!(TIMETZ);

        to_sql_checked!();
    }

    impl<'a> FromSql<'a> for TimeTz {
        fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
            if raw.len() != 12 {
                return Err(format!("invalid timetz message length: {}", raw.len()).into());
            }
            let micros = i64::from_be_bytes(raw[..8].try_into()?);
            let zone = i32::from_be_bytes(raw[8..].try_into()?);
            Ok(TimeTz::from_wire(micros, zone)?)
        }

        accepts!(TIMETZ);
    }
}
