//! Derives parking regimes from the parkeervakken survey.
//!
//! Each surveyed spot carries up to two time slots, an optional temporary measure and weekday
//! flags. [`import::process_record`] turns one record into the spot and a gap-free series of
//! regimes covering 00:00 to 23:59; [`import::import_records`] does so for a whole export while
//! skipping repeated spot identifiers.

pub mod days;
pub mod dedup;
pub mod emit;
pub mod error;
pub mod import;
pub mod modes;
pub mod records;
pub mod regimes;
pub mod sign_types;
pub mod sink;
pub mod time;
pub mod utils;
