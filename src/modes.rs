use chrono::NaiveDate;

use super::records::RawSpotRecord;
use super::time::{MinuteOfDay, parse_date, parse_time_or};

/// General paid parking; what applies whenever nothing else does.
pub const FISCAAL: &str = "FISCAAL";

/// Which part of the survey record a mode was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOrigin {
    TemporaryMeasure,
    Slot1,
    /// One of the two same-day halves of an overnight slot 1.
    Slot1Overnight,
    Slot2,
    /// The record's own restriction, for the whole day.
    FullOverride,
}

/// A restriction read from one record, not yet tied to days.
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    pub origin: ModeOrigin,
    pub kind: String,
    pub sign_type: Option<String>,
    pub board: Option<String>,
    pub begin: MinuteOfDay,
    pub end: MinuteOfDay,
    pub license_plate: Option<String>,
    pub begin_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub remark: Option<String>,
}

impl Mode {
    /// A mode carrying the record's own kind, sign and plate.
    fn from_record(
        record: &RawSpotRecord,
        origin: ModeOrigin,
        begin: MinuteOfDay,
        end: MinuteOfDay,
    ) -> Self {
        Mode {
            origin,
            kind: record.kind.clone().unwrap_or_else(|| FISCAAL.to_string()),
            sign_type: record.sign_type.clone(),
            board: record.board.clone(),
            begin,
            end,
            license_plate: record.license_plate.clone(),
            begin_date: None,
            end_date: None,
            remark: None,
        }
    }
}

/// Reads the modes of one record. The order is the priority the regimes are laid out in:
///
/// 1. the temporary measure (TVM), if the record has any TVM column;
/// 2. slot 1, split into `[00:00, end]` and `[begin, 23:59]` when it runs overnight;
/// 3. slot 2, taken as is;
/// 4. if none of the above, the record's own restriction for the whole day.
///
/// Slot 2 is never split overnight, so a wrapping slot 2 ends up with `begin > end`.
pub fn extract_modes(record: &RawSpotRecord) -> Vec<Mode> {
    let mut modes = Vec::with_capacity(3);

    if record.has_temporary_measure() {
        modes.push(Mode {
            origin: ModeOrigin::TemporaryMeasure,
            kind: record
                .sign_type
                .clone()
                .unwrap_or_else(|| FISCAAL.to_string()),
            begin: parse_time_or(
                record.tvm_begin_time.as_deref(),
                MinuteOfDay::START_OF_DAY,
            ),
            end: parse_time_or(record.tvm_end_time.as_deref(), MinuteOfDay::END_OF_DAY),
            begin_date: parse_date(record.tvm_begin_date.as_deref()),
            end_date: parse_date(record.tvm_end_date.as_deref()),
            remark: record.tvm_remark.clone(),
            ..Mode::from_record(
                record,
                ModeOrigin::TemporaryMeasure,
                MinuteOfDay::START_OF_DAY,
                MinuteOfDay::END_OF_DAY,
            )
        });
    }

    if record.slot1_begin.is_some() || record.slot1_end.is_some() {
        let begin = parse_time_or(record.slot1_begin.as_deref(), MinuteOfDay::START_OF_DAY);
        let end = parse_time_or(record.slot1_end.as_deref(), MinuteOfDay::END_OF_DAY);
        if begin < end {
            modes.push(Mode::from_record(record, ModeOrigin::Slot1, begin, end));
        } else {
            // e.g. 20:00 - 06:00
            modes.push(Mode::from_record(
                record,
                ModeOrigin::Slot1Overnight,
                MinuteOfDay::START_OF_DAY,
                end,
            ));
            modes.push(Mode::from_record(
                record,
                ModeOrigin::Slot1Overnight,
                begin,
                MinuteOfDay::END_OF_DAY,
            ));
        }
    }

    if record.slot2_begin.is_some() || record.slot2_end.is_some() {
        modes.push(Mode::from_record(
            record,
            ModeOrigin::Slot2,
            parse_time_or(record.slot2_begin.as_deref(), MinuteOfDay::START_OF_DAY),
            parse_time_or(record.slot2_end.as_deref(), MinuteOfDay::END_OF_DAY),
        ));
    }

    if modes.is_empty() {
        modes.push(Mode::from_record(
            record,
            ModeOrigin::FullOverride,
            MinuteOfDay::START_OF_DAY,
            MinuteOfDay::END_OF_DAY,
        ));
    }

    modes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SpotId;

    fn is_whole_day(mode: &Mode) -> bool {
        (mode.begin, mode.end) == (MinuteOfDay::START_OF_DAY, MinuteOfDay::END_OF_DAY)
    }

    fn hm(hour: u16, minute: u16) -> MinuteOfDay {
        MinuteOfDay::new(hour, minute).unwrap()
    }

    fn record() -> RawSpotRecord {
        RawSpotRecord {
            id: Some(SpotId(1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_slots_gives_whole_day_override() {
        let modes = extract_modes(&record());
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].origin, ModeOrigin::FullOverride);
        assert_eq!(modes[0].kind, FISCAAL);
        assert!(is_whole_day(&modes[0]));
    }

    #[test]
    fn test_full_override_inherits_kind_and_plate() {
        let modes = extract_modes(&RawSpotRecord {
            kind: Some("VERGUNP".to_string()),
            sign_type: Some("E6b".to_string()),
            license_plate: Some("12-ABC-3".to_string()),
            ..record()
        });
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].kind, "VERGUNP");
        assert_eq!(modes[0].sign_type.as_deref(), Some("E6b"));
        assert_eq!(modes[0].license_plate.as_deref(), Some("12-ABC-3"));
    }

    #[test]
    fn test_slot1_within_the_day() {
        let modes = extract_modes(&RawSpotRecord {
            slot1_begin: Some("08:00".to_string()),
            slot1_end: Some("18:00".to_string()),
            ..record()
        });
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].origin, ModeOrigin::Slot1);
        assert_eq!((modes[0].begin, modes[0].end), (hm(8, 0), hm(18, 0)));
    }

    #[test]
    fn test_overnight_slot1_is_split_in_two() {
        let modes = extract_modes(&RawSpotRecord {
            slot1_begin: Some("20:00".to_string()),
            slot1_end: Some("06:00".to_string()),
            ..record()
        });
        assert_eq!(modes.len(), 2);
        assert_eq!((modes[0].begin, modes[0].end), (hm(0, 0), hm(6, 0)));
        assert_eq!((modes[1].begin, modes[1].end), (hm(20, 0), hm(23, 59)));
        assert!(modes.iter().all(|m| m.origin == ModeOrigin::Slot1Overnight));
    }

    #[test]
    fn test_slot1_with_only_an_end_starts_at_midnight() {
        let modes = extract_modes(&RawSpotRecord {
            slot1_end: Some("09:30".to_string()),
            ..record()
        });
        assert_eq!(modes.len(), 1);
        assert_eq!((modes[0].begin, modes[0].end), (hm(0, 0), hm(9, 30)));
    }

    #[test]
    fn test_unreadable_slot1_times_fall_back_to_whole_day() {
        let modes = extract_modes(&RawSpotRecord {
            slot1_begin: Some("25:99".to_string()),
            slot1_end: Some("nvt".to_string()),
            ..record()
        });
        assert_eq!(modes.len(), 1);
        assert!(is_whole_day(&modes[0]));
    }

    #[test]
    fn test_overnight_slot2_is_not_split() {
        let modes = extract_modes(&RawSpotRecord {
            slot2_begin: Some("22:00".to_string()),
            slot2_end: Some("05:00".to_string()),
            ..record()
        });
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].origin, ModeOrigin::Slot2);
        assert_eq!((modes[0].begin, modes[0].end), (hm(22, 0), hm(5, 0)));
    }

    #[test]
    fn test_temporary_measure_comes_first() {
        let modes = extract_modes(&RawSpotRecord {
            kind: Some("MULDER".to_string()),
            sign_type: Some("E1".to_string()),
            tvm_begin_date: Some("2021-03-01".to_string()),
            tvm_end_date: Some("2021-03-14".to_string()),
            tvm_begin_time: Some("va 07:00".to_string()),
            tvm_end_time: Some("24:00".to_string()),
            tvm_remark: Some("Bouwwerkzaamheden".to_string()),
            slot1_begin: Some("09:00".to_string()),
            slot1_end: Some("17:00".to_string()),
            slot2_begin: Some("19:00".to_string()),
            slot2_end: Some("21:00".to_string()),
            ..record()
        });
        let origins = modes.iter().map(|m| m.origin).collect::<Vec<_>>();
        assert_eq!(
            origins,
            vec![
                ModeOrigin::TemporaryMeasure,
                ModeOrigin::Slot1,
                ModeOrigin::Slot2
            ]
        );
        let tvm = &modes[0];
        assert_eq!(tvm.kind, "E1");
        assert_eq!((tvm.begin, tvm.end), (hm(7, 0), hm(23, 59)));
        assert_eq!(tvm.begin_date, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(tvm.end_date, NaiveDate::from_ymd_opt(2021, 3, 14));
        assert_eq!(tvm.remark.as_deref(), Some("Bouwwerkzaamheden"));
        assert_eq!(modes[1].kind, "MULDER");
        assert_eq!(modes[1].remark, None);
    }

    #[test]
    fn test_temporary_measure_without_sign_type_is_fiscaal() {
        let modes = extract_modes(&RawSpotRecord {
            kind: Some("MULDER".to_string()),
            tvm_remark: Some("markt".to_string()),
            ..record()
        });
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].kind, FISCAAL);
        assert!(is_whole_day(&modes[0]));
    }
}
