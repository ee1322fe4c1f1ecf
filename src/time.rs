use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};
use tracing::debug;

/// A value for time of day in whole minutes past midnight.
/// For example 8am is 480 minutes past midnight. The last minute of the day is 23:59;
/// there is no 24:00.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const START_OF_DAY: MinuteOfDay = MinuteOfDay(0);
    pub const END_OF_DAY: MinuteOfDay = MinuteOfDay(23 * 60 + 59);

    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(MinuteOfDay(hour * 60 + minute))
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// One minute later on the same day. 23:59 stays 23:59.
    pub fn next_minute(self) -> Self {
        MinuteOfDay((self.0 + 1).min(Self::END_OF_DAY.0))
    }

    /// One minute earlier on the same day. 00:00 stays 00:00.
    pub fn previous_minute(self) -> Self {
        MinuteOfDay(self.0.saturating_sub(1))
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for MinuteOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<NaiveTime> for MinuteOfDay {
    fn from(time: NaiveTime) -> Self {
        MinuteOfDay((time.hour() * 60 + time.minute()) as u16)
    }
}

// Survey exports are not consistent about how they write a clock time.
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%H.%M", "%H%M"];

impl FromStr for MinuteOfDay {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
            .map(MinuteOfDay::from)
            .ok_or(())
    }
}

/// Parses a surveyed clock time, returning `default` when the value is absent or unreadable.
///
/// "24:00" is read as 23:59 and a leading "va " ("from") is ignored. Unreadable values are not
/// an error: the slot simply keeps its default bound.
pub fn parse_time_or(value: Option<&str>, default: MinuteOfDay) -> MinuteOfDay {
    let Some(value) = value else {
        return default;
    };
    let value = if value == "24:00" { "23:59" } else { value };
    let value = value.strip_prefix("va ").unwrap_or(value);
    value.parse().unwrap_or_else(|_| {
        debug!(value, %default, "unreadable time, using default bound");
        default
    })
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y%m%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Parses a temporary-measure date. Unreadable dates are treated as absent.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok());
    if date.is_none() {
        debug!(value, "unreadable date, treating as absent");
    }
    date
}
