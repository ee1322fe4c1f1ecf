use anyhow::Result;
use indicatif::ProgressIterator;
use std::{fmt, path::Path};
use tracing::{info, warn};

use super::days::DayRule;
use super::dedup::{Admission, SeenIds};
use super::emit::{EmittedSpot, emit};
use super::error::{RecordError, Stage};
use super::modes::extract_modes;
use super::records::{self, RawSpotRecord, SpotId};
use super::regimes::{RegimeContext, assemble, covers_day_contiguously};
use super::sign_types::SignTypes;
use super::utils::progress_bar_for_count;

/// Everything one import run (or one shard of it) produced.
#[derive(Debug, Default)]
pub struct ImportOutput {
    pub emitted: Vec<EmittedSpot>,
    /// Identifiers skipped because an earlier record already had them, in input order.
    pub duplicates: Vec<SpotId>,
    /// Records that were dropped; the rest of the run went ahead without them.
    pub warnings: Vec<RecordError>,
}

impl ImportOutput {
    pub fn merge(&mut self, other: ImportOutput) {
        self.emitted.extend(other.emitted);
        self.duplicates.extend(other.duplicates);
        self.warnings.extend(other.warnings);
    }

    pub fn report(&self) -> ImportReport {
        ImportReport {
            spots: self.emitted.len(),
            regimes: self.emitted.iter().map(|emitted| emitted.regimes.len()).sum(),
            duplicates: self.duplicates.clone(),
            warnings: self.warnings.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub spots: usize,
    pub regimes: usize,
    pub duplicates: Vec<SpotId>,
    pub warnings: usize,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created: {} parkeervakken and {} regimes ({} duplicates skipped, {} records dropped)",
            self.spots,
            self.regimes,
            self.duplicates.len(),
            self.warnings
        )
    }
}

/// Turns one record into its spot and regimes: modes and day rule, then the regimes laid out
/// over the day, then packaging.
pub fn process_record(
    record: &RawSpotRecord,
    sign_types: &SignTypes,
) -> Result<EmittedSpot, RecordError> {
    let id = record.require_id(Stage::Extract)?;
    let modes = extract_modes(record);
    let context = RegimeContext {
        parent_id: id,
        day_rule: DayRule::resolve(&record.weekday_flags()),
        remark: record.remark.as_deref(),
        capacity: record.capacity,
        sign_types,
    };
    let regimes = assemble(&context, &modes);
    if !covers_day_contiguously(&regimes) {
        // Kept as surveyed; see the slot 2 note on `extract_modes`.
        warn!(spot = %id, line = record.line, "Regimes overlap or leave a gap in the day");
    }
    Ok(emit(record, id, regimes))
}

/// Imports decoded records in order. Records whose identifier is already in `seen` are
/// skipped and reported as duplicates; records that cannot be processed are reported as
/// warnings. Neither stops the import.
pub fn import_records(
    records: Vec<Result<RawSpotRecord, RecordError>>,
    seen: &mut SeenIds,
    sign_types: &SignTypes,
) -> ImportOutput {
    let mut output = ImportOutput::default();
    let progress = progress_bar_for_count(records.len());

    for entry in records.into_iter().progress_with(progress) {
        let processed = entry.and_then(|record| {
            let id = record.require_id(Stage::Deduplicate)?;
            Ok(match seen.admit(id) {
                Admission::Accepted => Some(process_record(&record, sign_types)?),
                Admission::Duplicate => {
                    output.duplicates.push(id);
                    None
                }
            })
        });
        match processed {
            Ok(Some(emitted)) => output.emitted.push(emitted),
            Ok(None) => {}
            Err(err) => {
                warn!("{err}");
                output.warnings.push(err);
            }
        }
    }
    output
}

/// Reads, decodes and imports one `*.jsonl` shard.
pub fn import_shard(
    path: &Path,
    seen: &mut SeenIds,
    sign_types: &SignTypes,
) -> Result<ImportOutput> {
    info!("Processing: {}", path.display());
    let text = records::read_file(path)?;
    let output = import_records(records::parse(&text), seen, sign_types);
    if !output.duplicates.is_empty() {
        warn!(
            "Duplicates found: {}",
            output
                .duplicates
                .iter()
                .map(SpotId::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    info!("{}", output.report());
    Ok(output)
}
