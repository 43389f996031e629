//! Node-code to survey-coordinate resolution.
//!
//! The navigation table is keyed by node code (the bumper painted on the
//! node), not by hardware serial. The serial-to-bumper table that bridges
//! the two can lag behind a survey relabel, so the bumper encoded in the
//! repaired raw file's name is kept as the authoritative fallback.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::error::NoderecError;
use crate::series::{BumperEntry, NavigationRecord};

/// Raw file names carry `..._b<bumper>_rsn<serial>...`.
const BUMPER_PATTERN: &str = r"\w+_\d{1,3}_\d{6}_b(\d+)_rsn(\d+)";

/// A node's survey coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub line: i64,
    pub point: i64,
    pub index: i64,
}

fn bumper_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BUMPER_PATTERN).expect("bumper pattern is a valid regex"))
}

/// Exact-match lookup on node code. When the table carries more than one
/// entry for a code, the first wins; surveys are expected to keep codes
/// unique, so the narrowing is not an error here.
pub fn resolve(node_code: &str, navigation: &[NavigationRecord]) -> Option<Coordinate> {
    navigation
        .iter()
        .find(|record| record.node_code == node_code)
        .map(|record| Coordinate {
            line: record.line,
            point: record.point,
            index: record.index,
        })
}

/// Bumper recorded for `serial` in the auxiliary table, if any.
pub fn bumper_for_serial<'a>(table: &'a [BumperEntry], serial: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|entry| entry.serial == serial)
        .map(|entry| entry.bumper.as_str())
}

/// Decode the (bumper, serial) pair encoded in a raw file's basename.
pub fn decode_raw_name(raw_path: &Path) -> Result<(String, String), NoderecError> {
    let name = raw_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let captures = bumper_regex().captures(&name).ok_or_else(|| {
        NoderecError::parse(raw_path, "file name does not carry bumper/serial fields")
    })?;
    Ok((captures[1].to_string(), captures[2].to_string()))
}

/// Fallback resolution: take the bumper from the raw file's name and look it
/// up in the navigation table. Failing here means the node cannot be placed
/// on the survey at all, and the caller must not write any ledger entry.
pub fn resolve_from_raw_name(
    raw_path: &Path,
    navigation: &[NavigationRecord],
) -> Result<(Coordinate, String), NoderecError> {
    let (bumper, _serial) = decode_raw_name(raw_path)?;
    match resolve(&bumper, navigation) {
        Some(coordinate) => Ok((coordinate, bumper)),
        None => {
            warn!(bumper = %bumper, raw = %raw_path.display(), "raw file bumper missing from navigation");
            Err(NoderecError::Unresolved(bumper))
        }
    }
}
