use serde::{Serialize, Serializer};
use std::{fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Day {
    #[serde(rename = "mon")]
    Monday,
    #[serde(rename = "tue")]
    Tuesday,
    #[serde(rename = "wed")]
    Wednesday,
    #[serde(rename = "thu")]
    Thursday,
    #[serde(rename = "fri")]
    Friday,
    #[serde(rename = "sat")]
    Saturday,
    #[serde(rename = "sun")]
    Sunday,
}

impl Day {
    pub const WEEK: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Day::Monday => "mon",
            Day::Tuesday => "tue",
            Day::Wednesday => "wed",
            Day::Thursday => "thu",
            Day::Friday => "fri",
            Day::Saturday => "sat",
            Day::Sunday => "sun",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The weekday columns of one survey record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayFlags {
    pub monday_to_friday: bool,
    pub monday_to_saturday: bool,
    /// Individual days, Monday first.
    pub days: [bool; 7],
}

/// The days a regime applies to, in week order and without repeats.
///
/// One rule is resolved per record and shared by every regime derived from it, so cloning
/// only bumps a reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRule(Arc<[Day]>);

impl DayRule {
    pub fn all_week() -> Self {
        DayRule(Arc::from(Day::WEEK.as_slice()))
    }

    pub fn from_days(days: impl IntoIterator<Item = Day>) -> Self {
        let mut days: Vec<Day> = days.into_iter().collect();
        days.sort();
        days.dedup();
        DayRule(days.into())
    }

    /// Resolves the weekday flags, first match wins:
    /// Monday-Friday, Monday-Saturday, no day flagged (every day), the flagged days.
    pub fn resolve(flags: &WeekdayFlags) -> Self {
        if flags.monday_to_friday {
            DayRule::from_days(Day::WEEK[..5].iter().copied())
        } else if flags.monday_to_saturday {
            DayRule::from_days(Day::WEEK[..6].iter().copied())
        } else if !flags.days.iter().any(|flagged| *flagged) {
            DayRule::all_week()
        } else {
            DayRule::from_days(
                Day::WEEK
                    .iter()
                    .zip(flags.days)
                    .filter(|(_, flagged)| *flagged)
                    .map(|(day, _)| *day),
            )
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.0
    }
}

impl Serialize for DayRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}
