//! Error types for the regime import.
//!
//! A [`RecordError`] is scoped to one spot record: the import logs it and moves on to the next
//! record. Only configuration and I/O failures at the edges stop a run.

use std::fmt;
use thiserror::Error;

use super::records::SpotId;

/// Where in the import a record was given up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Deduplicate,
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Decode => "decode",
            Stage::Deduplicate => "deduplicate",
            Stage::Extract => "extract",
        })
    }
}

#[derive(Error, Debug)]
pub enum RecordFault {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no usable PARKEER_ID")]
    MissingIdentifier,
}

/// A record that could not be turned into a spot and its regimes.
#[derive(Error, Debug)]
#[error("spot {} (line {line}) dropped at {stage} stage: {fault}", describe_id(.id))]
pub struct RecordError {
    pub id: Option<SpotId>,
    pub line: usize,
    pub stage: Stage,
    #[source]
    pub fault: RecordFault,
}

fn describe_id(id: &Option<SpotId>) -> String {
    id.map_or_else(|| "<unknown>".to_string(), |id| id.to_string())
}

/// Errors loading the sign type catalogue overrides.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read sign type overrides: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid sign type overrides: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_names_spot_and_stage() {
        let err = RecordError {
            id: Some(SpotId(7)),
            line: 12,
            stage: Stage::Extract,
            fault: RecordFault::MissingIdentifier,
        };
        assert_eq!(
            err.to_string(),
            "spot 7 (line 12) dropped at extract stage: no usable PARKEER_ID"
        );
    }

    #[test]
    fn test_record_error_without_id() {
        let err = RecordError {
            id: None,
            line: 3,
            stage: Stage::Decode,
            fault: RecordFault::MissingIdentifier,
        };
        assert!(err.to_string().starts_with("spot <unknown> (line 3)"));
    }
}
