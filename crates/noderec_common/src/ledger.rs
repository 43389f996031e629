//! Dedup-safe appends to the shared crew ledgers.
//!
//! Two ledger shapes exist: the tab-delimited padded-node ledgers, where a
//! line must never repeat byte for byte, and the comma-delimited digest
//! ledger, where records carry a strictly increasing sequence number and a
//! payload that must never repeat regardless of its number. Existing
//! content is never rewritten or reordered.

use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::coordinate::Coordinate;
use crate::error::NoderecError;
use crate::gaps::GapInterval;
use crate::lock::with_ledger_lock;

/// Result of a ledger append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was written.
    Appended,
    /// The ledger already carries the record; nothing was written.
    AlreadyPresent,
}

/// Result of a sequenced append, with the number written on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencedAppend {
    pub outcome: AppendOutcome,
    pub sequence: Option<u64>,
}

/// The padded-node ledger line for one gap at one coordinate.
pub fn format_padded_line(coordinate: &Coordinate, gap: &GapInterval) -> String {
    format!(
        "{}\t\t{}\t\t\t{}\t\t\t{}\t\t{}\n",
        coordinate.line, coordinate.point, coordinate.index, gap.start, gap.stop
    )
}

/// Append `line` unless the ledger already contains it.
///
/// The whole read-check-append runs under the exclusive ledger lock, so the
/// append is idempotent even across concurrent invocations.
pub fn append_unique(path: &Path, line: &str) -> Result<AppendOutcome, NoderecError> {
    let wanted = line.trim_end_matches('\n');
    with_ledger_lock(path, |file| {
        let mut content = String::new();
        file.read_to_string(&mut content)?;

        if content.lines().any(|existing| existing == wanted) {
            debug!(path = %path.display(), "line already present, skipping");
            return Ok(AppendOutcome::AlreadyPresent);
        }

        file.write_all(line.as_bytes())?;
        if !line.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        info!(path = %path.display(), "ledger line appended");
        Ok(AppendOutcome::Appended)
    })
}

/// Append `payload` under the next sequence number.
///
/// The number is the running maximum of the leading field plus one (1 for an
/// empty ledger). Duplicate detection compares only the content after the
/// sequence field, so the same event is never recorded twice under a fresh
/// number. Lines whose leading field is not an integer are skipped for the
/// maximum but still checked for duplication.
pub fn append_sequenced(path: &Path, payload: &str) -> Result<SequencedAppend, NoderecError> {
    let wanted = payload.trim();
    with_ledger_lock(path, |file| {
        let mut content = String::new();
        file.read_to_string(&mut content)?;

        let mut max_sequence: u64 = 0;
        for line in content.lines() {
            let Some((sequence_field, rest)) = line.split_once(',') else {
                continue;
            };
            if rest.trim() == wanted {
                debug!(path = %path.display(), "digest payload already present, skipping");
                return Ok(SequencedAppend {
                    outcome: AppendOutcome::AlreadyPresent,
                    sequence: None,
                });
            }
            if let Ok(sequence) = sequence_field.trim().parse::<u64>() {
                max_sequence = max_sequence.max(sequence);
            }
        }

        let next = max_sequence + 1;
        writeln!(file, "{next},{wanted}")?;
        info!(path = %path.display(), sequence = next, "digest record appended");
        Ok(SequencedAppend {
            outcome: AppendOutcome::Appended,
            sequence: Some(next),
        })
    })
}
