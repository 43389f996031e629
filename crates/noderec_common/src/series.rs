//! Typed loaders for the tabular survey inputs.
//!
//! Three inputs feed the workflows: the per-node analyze series, the 4D
//! navigation table and the bumper/serial table. All three are parsed into
//! typed records up front; a row that does not parse fails the load instead
//! of leaking ambiguous values downstream.

use serde::Deserialize;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::NoderecError;

/// Metadata lines preceding the header row of a 4dnav file.
const NAV_PREAMBLE_LINES: usize = 8;

/// One row of the analyze series. `second` is the nominal recording clock,
/// `delta` the observed distance to the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SeriesRecord {
    pub second: i64,
    pub delta: i64,
}

/// One row of the 4D navigation table, keyed by node code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavigationRecord {
    #[serde(rename = "Line")]
    pub line: i64,
    #[serde(rename = "Point")]
    pub point: i64,
    #[serde(rename = "NodeCode")]
    pub node_code: String,
    #[serde(rename = "Index")]
    pub index: i64,
}

/// One row of the bumper/serial table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumperEntry {
    pub bumper: String,
    pub serial: String,
}

/// Load the analyze series in file order.
pub fn load_series(path: &Path) -> Result<Vec<SeriesRecord>, NoderecError> {
    let file = fs::File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: SeriesRecord = row.map_err(|e| NoderecError::parse(path, e.to_string()))?;
        records.push(record);
    }
    debug!(path = %path.display(), rows = records.len(), "loaded analyze series");
    Ok(records)
}

/// Load the 4D navigation table, skipping the preamble and keeping only the
/// Line/Point/NodeCode/Index columns. A missing or empty file is not fatal:
/// it is reported as `None` ("navigation unavailable") and the caller
/// decides whether the workflow can continue.
pub fn load_navigation(path: &Path) -> Result<Option<Vec<NavigationRecord>>, NoderecError> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Ok(None),
    };
    if meta.len() == 0 {
        return Ok(None);
    }

    let file = fs::File::open(path)?;
    let mut lines = BufReader::new(file);
    let mut skipped = String::new();
    for _ in 0..NAV_PREAMBLE_LINES {
        skipped.clear();
        if lines.read_line(&mut skipped)? == 0 {
            // File ends inside the preamble: nothing usable
            return Ok(None);
        }
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(lines);

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: NavigationRecord = row.map_err(|e| NoderecError::parse(path, e.to_string()))?;
        records.push(record);
    }
    debug!(path = %path.display(), rows = records.len(), "loaded navigation table");
    Ok(Some(records))
}

/// Load the whitespace-delimited bumper/serial table. This table is required
/// auxiliary data; an unreadable file is an error, unlike the navigation
/// table.
pub fn load_bumper_table(path: &Path) -> Result<Vec<BumperEntry>, NoderecError> {
    let raw = fs::read_to_string(path)?;
    let mut entries = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(bumper), Some(serial)) => entries.push(BumperEntry {
                bumper: bumper.to_string(),
                serial: serial.to_string(),
            }),
            _ => {
                return Err(NoderecError::parse(
                    path,
                    format!("line {}: expected bumper and serial columns", number + 1),
                ))
            }
        }
    }
    Ok(entries)
}
