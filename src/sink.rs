use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::emit::{EmittedSpot, RegimeRecord, SpotRecord};
use super::records::SpotId;
use super::utils::write_json_file;

/// Where emitted spots end up. Encoding (SQL, files, ...) is entirely up to the implementation.
pub trait RecordSink {
    fn write(&mut self, emitted: &[EmittedSpot], duplicates: &[SpotId]) -> Result<()>;
}

/// Writes `spots.json`, `regimes.json` and `duplicates.json` to one directory, the shape the
/// database loader bulk inserts from.
pub struct JsonFileSink {
    output_directory: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_directory: &Path) -> Result<Self> {
        fs_err::create_dir_all(output_directory)
            .context("Could not create the output directory")?;
        Ok(Self {
            output_directory: output_directory.to_path_buf(),
        })
    }
}

impl RecordSink for JsonFileSink {
    fn write(&mut self, emitted: &[EmittedSpot], duplicates: &[SpotId]) -> Result<()> {
        let spots = emitted
            .iter()
            .map(|emitted| &emitted.spot)
            .collect::<Vec<&SpotRecord>>();
        let regimes = emitted
            .iter()
            .flat_map(|emitted| &emitted.regimes)
            .collect::<Vec<&RegimeRecord>>();
        write_json_file("spots", &self.output_directory, &spots)?;
        write_json_file("regimes", &self.output_directory, &regimes)?;
        write_json_file("duplicates", &self.output_directory, duplicates)?;
        Ok(())
    }
}
