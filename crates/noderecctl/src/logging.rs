//! Invocation logging for noderecctl.
//!
//! One JSON line per run, so the crew can reconstruct who reconciled which
//! node and when. Logging failures never fail the command.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Log entry for one noderecctl invocation
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp
    pub ts: String,

    /// Request ID (UUID)
    pub req_id: String,

    /// Command name
    pub command: String,

    /// Command arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Exit code
    pub exit_code: i32,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Success flag
    pub ok: bool,
}

/// Discover the log file path with a fallback chain
///
/// Priority:
/// 1. $NODERECCTL_LOG_FILE environment variable (explicit override)
/// 2. $XDG_STATE_HOME/noderec/ctl.jsonl (XDG standard)
/// 3. ~/.local/state/noderec/ctl.jsonl (XDG fallback)
fn discover_log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NODERECCTL_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg_state).join("noderec/ctl.jsonl"));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".local/state/noderec/ctl.jsonl"));
    }
    None
}

/// Append one entry for the finished invocation. Best effort only.
pub fn record(command: &str, args: &[String], exit_code: i32, started: Instant) {
    let entry = LogEntry {
        ts: chrono::Utc::now().to_rfc3339(),
        req_id: uuid::Uuid::new_v4().to_string(),
        command: command.to_string(),
        args: args.to_vec(),
        exit_code,
        duration_ms: started.elapsed().as_millis() as u64,
        ok: exit_code == 0,
    };

    let Some(path) = discover_log_path() else {
        return;
    };
    let Ok(json) = serde_json::to_string(&entry) else {
        return;
    };

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = writeln!(file, "{json}");
    }
}
