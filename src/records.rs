use anyhow::{Context, Result};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::info;

use super::days::WeekdayFlags;
use super::error::{RecordError, RecordFault, Stage};
use super::utils::progress_bar_for_count;

/// Decodes a JSON lines export, one parking spot per line.
/// Blank lines are skipped; a line that cannot be decoded becomes a per-record error
/// instead of failing the whole file.
pub fn parse(raw_text: &str) -> Vec<Result<RawSpotRecord, RecordError>> {
    let lines = raw_text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect::<Vec<(usize, &str)>>();

    info!("Decoding {} spot records", lines.len());
    let progress = progress_bar_for_count(lines.len());

    lines
        .par_iter()
        .progress_with(progress)
        .map(|(index, line)| {
            let line_number = index + 1;
            serde_json::from_str::<RawSpotRecord>(line)
                .map(|record| RawSpotRecord {
                    line: line_number,
                    ..record
                })
                .map_err(|err| RecordError {
                    id: None,
                    line: line_number,
                    stage: Stage::Decode,
                    fault: RecordFault::Malformed(err),
                })
        })
        .collect()
}

pub fn read_file(file_path: &Path) -> Result<String> {
    fs_err::read_to_string(file_path).context("Something went wrong reading the export")
}

/// Lists the `*.jsonl` shards of one export, in file name order.
pub fn list_shards(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut shards = fs_err::read_dir(input_dir)
        .with_context(|| format!("Could not list export directory {}", input_dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "jsonl"))
        .collect::<Vec<_>>();
    shards.sort();
    Ok(shards)
}

/// PARKEER_ID, unique within one revision of the survey.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SpotId(pub i64);

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpotId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SpotId)
    }
}

/// One surveyed parking spot, as exported from the survey shapefiles.
/// Blank text columns are read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpotRecord {
    /// Line in the export this record was read from.
    #[serde(skip)]
    pub line: usize,
    #[serde(rename = "PARKEER_ID", default, deserialize_with = "spot_id")]
    pub id: Option<SpotId>,
    #[serde(rename = "BUURTCODE", default, deserialize_with = "text")]
    pub neighborhood_code: Option<String>,
    #[serde(rename = "STRAATNAAM", default, deserialize_with = "text")]
    pub street_name: Option<String>,
    #[serde(rename = "SOORT", default, deserialize_with = "text")]
    pub kind: Option<String>,
    #[serde(rename = "TYPE", default, deserialize_with = "text")]
    pub spot_type: Option<String>,
    #[serde(rename = "AANTAL", default, deserialize_with = "count")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(rename = "E_TYPE", default, deserialize_with = "text")]
    pub sign_type: Option<String>,
    #[serde(rename = "BORD", default, deserialize_with = "text")]
    pub board: Option<String>,
    #[serde(rename = "KENTEKEN", default, deserialize_with = "text")]
    pub license_plate: Option<String>,
    #[serde(rename = "OPMERKING", default, deserialize_with = "text")]
    pub remark: Option<String>,
    #[serde(rename = "BEGINTIJD1", default, deserialize_with = "text")]
    pub slot1_begin: Option<String>,
    #[serde(rename = "EINDTIJD1", default, deserialize_with = "text")]
    pub slot1_end: Option<String>,
    #[serde(rename = "BEGINTIJD2", default, deserialize_with = "text")]
    pub slot2_begin: Option<String>,
    #[serde(rename = "EINDTIJD2", default, deserialize_with = "text")]
    pub slot2_end: Option<String>,
    #[serde(rename = "MA_VR", default, deserialize_with = "flag")]
    pub monday_to_friday: bool,
    #[serde(rename = "MA_ZA", default, deserialize_with = "flag")]
    pub monday_to_saturday: bool,
    #[serde(rename = "MA", default, deserialize_with = "flag")]
    pub monday: bool,
    #[serde(rename = "DI", default, deserialize_with = "flag")]
    pub tuesday: bool,
    #[serde(rename = "WO", default, deserialize_with = "flag")]
    pub wednesday: bool,
    #[serde(rename = "DO", default, deserialize_with = "flag")]
    pub thursday: bool,
    #[serde(rename = "VR", default, deserialize_with = "flag")]
    pub friday: bool,
    #[serde(rename = "ZA", default, deserialize_with = "flag")]
    pub saturday: bool,
    #[serde(rename = "ZO", default, deserialize_with = "flag")]
    pub sunday: bool,
    #[serde(rename = "TVM_BEGIND", default, deserialize_with = "text")]
    pub tvm_begin_date: Option<String>,
    #[serde(rename = "TVM_EINDD", default, deserialize_with = "text")]
    pub tvm_end_date: Option<String>,
    #[serde(rename = "TVM_BEGINT", default, deserialize_with = "text")]
    pub tvm_begin_time: Option<String>,
    #[serde(rename = "TVM_EINDT", default, deserialize_with = "text")]
    pub tvm_end_time: Option<String>,
    #[serde(rename = "TVM_OPMERK", default, deserialize_with = "text")]
    pub tvm_remark: Option<String>,
}

impl RawSpotRecord {
    pub fn weekday_flags(&self) -> WeekdayFlags {
        WeekdayFlags {
            monday_to_friday: self.monday_to_friday,
            monday_to_saturday: self.monday_to_saturday,
            days: [
                self.monday,
                self.tuesday,
                self.wednesday,
                self.thursday,
                self.friday,
                self.saturday,
                self.sunday,
            ],
        }
    }

    pub fn has_temporary_measure(&self) -> bool {
        [
            &self.tvm_begin_date,
            &self.tvm_end_date,
            &self.tvm_begin_time,
            &self.tvm_end_time,
            &self.tvm_remark,
        ]
        .iter()
        .any(|field| field.is_some())
    }

    /// The identifier, or the error to report for this record when it has none.
    pub fn require_id(&self, stage: Stage) -> Result<SpotId, RecordError> {
        self.id.ok_or(RecordError {
            id: None,
            line: self.line,
            stage,
            fault: RecordFault::MissingIdentifier,
        })
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// Shapefile exports write logical columns as booleans, numbers or "J"/"N" text.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !matches!(
            s.trim().to_lowercase().as_str(),
            "" | "0" | "n" | "nee" | "f" | "false"
        ),
        _ => false,
    })
}

// A non-numeric PARKEER_ID is treated as missing.
fn spot_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SpotId>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().map(SpotId),
        Some(Value::String(s)) => SpotId::from_str(&s).ok(),
        _ => None,
    })
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
