//! Repair-report parsing for the digest flow.
//!
//! Repair reports are free-text files written by the repair bench. The
//! digest flow needs the repaired time window, the bench output path and
//! the created raw file path, plus the bumper/serial pair encoded in the
//! raw file's basename. The destination of the repaired raw file in
//! permanent storage is the output file's directory joined with the raw
//! file's name.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{LocalResult, TimeZone, Utc};
use regex::Regex;

use crate::coordinate::decode_raw_name;
use crate::error::NoderecError;

/// Bench output path inside an `Out File` line.
const OUT_PATH_PATTERN: &str = r"/dl\d/\w+/\w+/\d{4}-\d{2}-\d{2}/\w+\.raw";
/// Created raw file path inside a `Created raw file` line.
const RAW_PATH_PATTERN: &str = r"/dl\d/\w+/\d{4}-\d{2}-\d{2}/\w+\.raw";

fn out_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(OUT_PATH_PATTERN).expect("out path pattern is a valid regex"))
}

fn raw_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RAW_PATH_PATTERN).expect("raw path pattern is a valid regex"))
}

fn unix_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("unix time pattern is a valid regex"))
}

/// Fields extracted from one repair report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport {
    pub bumper: String,
    pub serial: String,
    pub start_unix: i64,
    pub stop_unix: i64,
    pub out_path: String,
    pub raw_path: String,
    /// Destination of the repaired raw file in permanent storage.
    pub destination: PathBuf,
}

impl RepairReport {
    /// The comma-delimited digest payload: everything after the sequence
    /// field of a digest record.
    pub fn digest_payload(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.bumper,
            self.serial,
            self.start_unix,
            self.stop_unix,
            from_unix(self.start_unix),
            from_unix(self.stop_unix),
            self.destination.display()
        )
    }

    /// Whether the repaired raw file has already been copied to its
    /// destination.
    pub fn destination_exists(&self) -> bool {
        self.destination.exists()
    }
}

/// Render a unix timestamp as UTC `YYYY-MM-DD HH:MM:SS`.
pub fn from_unix(seconds: i64) -> String {
    match Utc.timestamp_opt(seconds, 0) {
        LocalResult::Single(moment) => moment.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => format!("invalid({seconds})"),
    }
}

/// Parse a repair report file.
pub fn parse_repair_report(path: &Path) -> Result<RepairReport, NoderecError> {
    let body = fs::read_to_string(path)?;

    let start_unix = unix_field(&body, "Start second")
        .ok_or_else(|| NoderecError::parse(path, "no 'Start second' line with a timestamp"))?;
    let stop_unix = unix_field(&body, "Stop second")
        .ok_or_else(|| NoderecError::parse(path, "no 'Stop second' line with a timestamp"))?;

    let out_path = path_field(&body, "Out File", out_path_regex())
        .ok_or_else(|| NoderecError::parse(path, "no 'Out File' line with a raw path"))?;
    let raw_path = path_field(&body, "Created raw file", raw_path_regex())
        .ok_or_else(|| NoderecError::parse(path, "no 'Created raw file' line with a raw path"))?;

    let raw = PathBuf::from(&raw_path);
    let (bumper, serial) = decode_raw_name(&raw)?;

    // The bench writes into a scratch date directory; the permanent home is
    // the out file's directory with the raw file's name.
    let raw_name = raw
        .file_name()
        .ok_or_else(|| NoderecError::parse(path, "created raw file path has no file name"))?;
    let destination = Path::new(&out_path)
        .parent()
        .map(|parent| parent.join(raw_name))
        .ok_or_else(|| NoderecError::parse(path, "out file path has no parent directory"))?;

    Ok(RepairReport {
        bumper,
        serial,
        start_unix,
        stop_unix,
        out_path,
        raw_path,
        destination,
    })
}

/// First run of digits on the first line starting with `prefix`.
fn unix_field(body: &str, prefix: &str) -> Option<i64> {
    let line = body.lines().find(|line| line.starts_with(prefix))?;
    let digits = unix_time_regex().find(line)?;
    digits.as_str().parse().ok()
}

/// First `pattern` match on the first line starting with `prefix`.
fn path_field(body: &str, prefix: &str, pattern: &Regex) -> Option<String> {
    let line = body.lines().find(|line| line.starts_with(prefix))?;
    pattern.find(line).map(|m| m.as_str().to_string())
}
