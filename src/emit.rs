use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::days::DayRule;
use super::records::{RawSpotRecord, SpotId};
use super::regimes::{Regime, dominant_kind};
use super::time::MinuteOfDay;

/// A parking spot row, named after the columns of the `parkeervakken` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotRecord {
    pub id: SpotId,
    #[serde(rename = "buurtcode")]
    pub neighborhood_code: Option<String>,
    #[serde(rename = "straatnaam")]
    pub street_name: Option<String>,
    #[serde(rename = "soort")]
    pub kind: String,
    #[serde(rename = "type")]
    pub spot_type: Option<String>,
    #[serde(rename = "aantal")]
    pub capacity: Option<u32>,
    pub geometry: Option<Value>,
    #[serde(rename = "e_type")]
    pub sign_type: Option<String>,
}

/// A regime row, referring to its spot through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeRecord {
    pub parent_id: SpotId,
    #[serde(rename = "soort")]
    pub kind: String,
    #[serde(rename = "e_type")]
    pub sign_type: Option<String>,
    #[serde(rename = "e_type_description")]
    pub sign_description: String,
    #[serde(rename = "bord")]
    pub board: Option<String>,
    #[serde(rename = "begin_tijd")]
    pub begin_time: MinuteOfDay,
    #[serde(rename = "eind_tijd")]
    pub end_time: MinuteOfDay,
    #[serde(rename = "opmerking")]
    pub remark: Option<String>,
    #[serde(rename = "dagen")]
    pub days: DayRule,
    #[serde(rename = "kenteken")]
    pub license_plate: Option<String>,
    #[serde(rename = "begin_datum")]
    pub begin_date: Option<NaiveDate>,
    #[serde(rename = "eind_datum")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "aantal")]
    pub capacity: Option<u32>,
}

impl From<Regime> for RegimeRecord {
    fn from(regime: Regime) -> Self {
        RegimeRecord {
            parent_id: regime.parent_id,
            kind: regime.kind,
            sign_type: regime.sign_type,
            sign_description: regime.sign_description,
            board: regime.board,
            begin_time: regime.begin,
            end_time: regime.end,
            remark: regime.remark,
            days: regime.day_rule,
            license_plate: regime.license_plate,
            begin_date: regime.begin_date,
            end_date: regime.end_date,
            capacity: regime.capacity,
        }
    }
}

/// A spot with its regimes, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedSpot {
    pub spot: SpotRecord,
    pub regimes: Vec<RegimeRecord>,
}

/// Packages a spot and its regimes, in the order they were assembled.
pub fn emit(record: &RawSpotRecord, id: SpotId, regimes: Vec<Regime>) -> EmittedSpot {
    let spot = SpotRecord {
        id,
        neighborhood_code: record.neighborhood_code.clone(),
        street_name: record.street_name.clone(),
        kind: dominant_kind(&regimes).to_string(),
        spot_type: record.spot_type.clone(),
        capacity: record.capacity,
        geometry: record.geometry.clone(),
        sign_type: record.sign_type.clone(),
    };
    EmittedSpot {
        spot,
        regimes: regimes.into_iter().map(RegimeRecord::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{FISCAAL, extract_modes};
    use crate::regimes::{RegimeContext, assemble};
    use crate::sign_types::SignTypes;
    use serde_json::json;

    fn emit_record(record: &RawSpotRecord) -> EmittedSpot {
        let sign_types = SignTypes::default();
        let id = record.id.unwrap();
        let context = RegimeContext {
            parent_id: id,
            day_rule: DayRule::resolve(&record.weekday_flags()),
            remark: record.remark.as_deref(),
            capacity: record.capacity,
            sign_types: &sign_types,
        };
        emit(record, id, assemble(&context, &extract_modes(record)))
    }

    #[test]
    fn test_spot_with_several_regimes_is_fiscaal() {
        let record = RawSpotRecord {
            id: Some(SpotId(42)),
            neighborhood_code: Some("A01a".to_string()),
            street_name: Some("Damrak".to_string()),
            kind: Some("VERGUNP".to_string()),
            capacity: Some(2),
            geometry: Some(json!({"type": "Polygon", "coordinates": []})),
            slot1_begin: Some("08:00".to_string()),
            slot1_end: Some("18:00".to_string()),
            ..Default::default()
        };
        let emitted = emit_record(&record);
        assert_eq!(emitted.spot.id, SpotId(42));
        assert_eq!(emitted.spot.kind, FISCAAL);
        assert_eq!(emitted.spot.street_name.as_deref(), Some("Damrak"));
        assert_eq!(emitted.spot.geometry, record.geometry);
        assert_eq!(emitted.regimes.len(), 3);
        assert!(emitted.regimes.iter().all(|r| r.parent_id == SpotId(42)));
        assert!(emitted.regimes.iter().all(|r| r.capacity == Some(2)));
    }

    #[test]
    fn test_spot_with_one_regime_takes_its_kind() {
        let record = RawSpotRecord {
            id: Some(SpotId(5)),
            kind: Some("TAXI".to_string()),
            ..Default::default()
        };
        assert_eq!(emit_record(&record).spot.kind, "TAXI");
    }

    #[test]
    fn test_regime_record_uses_table_columns() {
        let record = RawSpotRecord {
            id: Some(SpotId(9)),
            sign_type: Some("E6b".to_string()),
            license_plate: Some("12-ABC-3".to_string()),
            tvm_begin_date: Some("2021-03-01".to_string()),
            tvm_remark: Some("tijdelijk".to_string()),
            monday_to_friday: true,
            capacity: Some(1),
            ..Default::default()
        };
        let emitted = emit_record(&record);
        assert_eq!(emitted.regimes.len(), 1);
        let value = serde_json::to_value(&emitted.regimes[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "parent_id": 9,
                "soort": "E6b",
                "e_type": "E6b",
                "e_type_description": "Gehandicaptenparkeerplaats op kenteken",
                "bord": null,
                "begin_tijd": "00:00",
                "eind_tijd": "23:59",
                "opmerking": "tijdelijk",
                "dagen": ["mon", "tue", "wed", "thu", "fri"],
                "kenteken": "12-ABC-3",
                "begin_datum": "2021-03-01",
                "eind_datum": null,
                "aantal": 1
            })
        );
    }
}
