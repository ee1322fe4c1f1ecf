use chrono::NaiveDate;

use super::days::DayRule;
use super::modes::{FISCAAL, Mode, ModeOrigin};
use super::records::SpotId;
use super::sign_types::SignTypes;
use super::time::MinuteOfDay;

/// One time-and-day qualified restriction of a parking spot.
#[derive(Debug, Clone, PartialEq)]
pub struct Regime {
    pub parent_id: SpotId,
    pub kind: String,
    pub sign_type: Option<String>,
    pub sign_description: String,
    pub board: Option<String>,
    pub begin: MinuteOfDay,
    pub end: MinuteOfDay,
    pub remark: Option<String>,
    pub day_rule: DayRule,
    pub license_plate: Option<String>,
    pub begin_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub capacity: Option<u32>,
}

/// What every regime of one spot shares.
pub struct RegimeContext<'a> {
    pub parent_id: SpotId,
    pub day_rule: DayRule,
    /// The record's general remark, carried by fillers and by modes read from the time slots.
    pub remark: Option<&'a str>,
    pub capacity: Option<u32>,
    pub sign_types: &'a SignTypes,
}

impl RegimeContext<'_> {
    fn filler(&self, begin: MinuteOfDay, end: MinuteOfDay) -> Regime {
        Regime {
            parent_id: self.parent_id,
            kind: FISCAAL.to_string(),
            sign_type: None,
            sign_description: String::new(),
            board: None,
            begin,
            end,
            remark: self.remark.map(str::to_string),
            day_rule: self.day_rule.clone(),
            license_plate: None,
            begin_date: None,
            end_date: None,
            capacity: self.capacity,
        }
    }

    fn regime_for(&self, mode: &Mode) -> Regime {
        Regime {
            parent_id: self.parent_id,
            kind: mode.kind.clone(),
            sign_type: mode.sign_type.clone(),
            sign_description: self
                .sign_types
                .describe(mode.sign_type.as_deref())
                .to_string(),
            board: mode.board.clone(),
            begin: mode.begin,
            end: mode.end,
            // A temporary measure only ever carries its own remark.
            remark: match mode.origin {
                ModeOrigin::TemporaryMeasure => mode.remark.clone(),
                _ => mode
                    .remark
                    .clone()
                    .or_else(|| self.remark.map(str::to_string)),
            },
            day_rule: self.day_rule.clone(),
            license_plate: mode.license_plate.clone(),
            begin_date: mode.begin_date,
            end_date: mode.end_date,
            capacity: self.capacity,
        }
    }
}

/// Lays the modes out over the day, in the order given, filling every stretch no mode claims
/// with a FISCAAL regime.
///
/// Neighbouring regimes meet at whole minutes: a mode ending at 18:00 is followed by a filler
/// from 18:01. Without modes the whole day is FISCAAL.
pub fn assemble(context: &RegimeContext, modes: &[Mode]) -> Vec<Regime> {
    let Some(last) = modes.last() else {
        return vec![context.filler(MinuteOfDay::START_OF_DAY, MinuteOfDay::END_OF_DAY)];
    };

    let mut regimes = Vec::with_capacity(modes.len() * 2 + 1);
    let mut cursor = MinuteOfDay::START_OF_DAY;
    for mode in modes {
        if mode.begin > cursor {
            regimes.push(context.filler(cursor, mode.begin.previous_minute()));
        }
        regimes.push(context.regime_for(mode));
        cursor = mode.end.next_minute();
    }

    if last.end < MinuteOfDay::END_OF_DAY {
        regimes.push(context.filler(cursor, MinuteOfDay::END_OF_DAY));
    }
    regimes
}

/// FISCAAL, unless a single regime covers the spot.
pub fn dominant_kind(regimes: &[Regime]) -> &str {
    match regimes {
        [only] => &only.kind,
        _ => FISCAAL,
    }
}

/// Whether the regimes, ordered by begin time, run from 00:00 to 23:59 with each one starting
/// the minute after the previous one ends.
///
/// Only an overnight slot 2 (which is not split) or a slot overlapping an earlier one can
/// break this.
pub fn covers_day_contiguously(regimes: &[Regime]) -> bool {
    let mut spans = regimes
        .iter()
        .map(|regime| (regime.begin, regime.end))
        .collect::<Vec<_>>();
    spans.sort();

    let (Some(first), Some(last)) = (spans.first(), spans.last()) else {
        return false;
    };
    first.0 == MinuteOfDay::START_OF_DAY
        && last.1 == MinuteOfDay::END_OF_DAY
        && spans.iter().all(|(begin, end)| begin <= end)
        && spans
            .windows(2)
            .all(|pair| pair[0].1 < pair[1].0 && pair[1].0 == pair[0].1.next_minute())
}
