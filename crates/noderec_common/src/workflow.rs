//! The padding and digest workflows.
//!
//! `run_padding` ties discovery, gap detection, coordinate resolution and
//! the ledger appends together for one node serial. `run_digest` parses a
//! repair report and appends its sequenced digest record. Neither prints;
//! the CLI renders the returned reports.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::coordinate::{self, Coordinate};
use crate::error::NoderecError;
use crate::gaps::{self, GapInterval};
use crate::ledger::{self, AppendOutcome, SequencedAppend};
use crate::locator::Locator;
use crate::report::{self, RepairReport};
use crate::series;

/// Ledger slots available per invocation. The shared ledgers hold one
/// interval per slot; any further gaps in the same series are ignored and
/// surfaced to the operator.
const LEDGER_SLOTS: usize = 2;

/// One padded-node ledger target and what happened to it. The targets are
/// written independently; one failing does not stop the other.
#[derive(Debug)]
pub struct SlotReport {
    pub ledger: PathBuf,
    pub interval: GapInterval,
    pub line: String,
    /// `None` on a dry run.
    pub result: Option<Result<AppendOutcome, NoderecError>>,
}

/// Everything the padding flow did for one node.
#[derive(Debug)]
pub struct PaddingReport {
    pub analyze_file: PathBuf,
    pub node_code: String,
    pub coordinate: Coordinate,
    pub slots: Vec<SlotReport>,
    /// Gaps beyond the available ledger slots, ignored by policy.
    pub ignored_gaps: usize,
}

impl PaddingReport {
    /// Whether any ledger target failed to take its append.
    pub fn any_write_failed(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| matches!(slot.result, Some(Err(_))))
    }
}

/// Terminal states of the padding flow.
#[derive(Debug)]
pub enum PaddingOutcome {
    /// The series has no padded samples; nothing to record.
    NoPaddedSamples { analyze_file: PathBuf },
    Processed(PaddingReport),
}

/// Run the padding flow for one node serial.
pub fn run_padding(
    config: &SiteConfig,
    serial: &str,
    dry_run: bool,
) -> Result<PaddingOutcome, NoderecError> {
    let locator = Locator::new(&config.search_root);
    let analyze_file = locator.find_analyze_file(serial)?;
    info!(serial, analyze = %analyze_file.display(), "analyze series located");

    let records = series::load_series(&analyze_file)?;
    let gaps = gaps::find_gaps(&records);
    if gaps.is_empty() {
        return Ok(PaddingOutcome::NoPaddedSamples { analyze_file });
    }

    let bumper_table = series::load_bumper_table(&config.bumper_serial_file)?;
    let primary = coordinate::bumper_for_serial(&bumper_table, serial);

    let navigation = series::load_navigation(&config.nav_file)?.ok_or_else(|| {
        NoderecError::NavigationUnavailable(config.nav_file.display().to_string())
    })?;

    let (coordinate, node_code) = match primary.and_then(|code| {
        coordinate::resolve(code, &navigation).map(|found| (found, code.to_string()))
    }) {
        Some(resolved) => resolved,
        None => {
            // Serial table stale or serial unlisted: the raw file name is
            // the authoritative bumper source.
            if let Some(code) = primary {
                warn!(
                    code,
                    serial, "bumper from serial table missing in navigation, trying raw file name"
                );
            }
            let raw_file = locator.find_raw_file(serial)?;
            coordinate::resolve_from_raw_name(&raw_file, &navigation)?
        }
    };
    info!(
        node_code = %node_code,
        line = coordinate.line,
        point = coordinate.point,
        index = coordinate.index,
        "coordinate resolved"
    );

    let targets = [&config.padded_ledger, &config.padded_ledger_2];
    let mut slots = Vec::new();
    for (interval, ledger_path) in gaps.iter().take(LEDGER_SLOTS).zip(targets) {
        let line = ledger::format_padded_line(&coordinate, interval);
        let result = if dry_run {
            None
        } else {
            Some(ledger::append_unique(ledger_path, &line))
        };
        slots.push(SlotReport {
            ledger: ledger_path.clone(),
            interval: *interval,
            line,
            result,
        });
    }

    let ignored_gaps = gaps.len().saturating_sub(LEDGER_SLOTS);
    if ignored_gaps > 0 {
        warn!(
            ignored_gaps,
            serial, "series has more gaps than ledger slots; extra intervals not recorded"
        );
    }

    Ok(PaddingOutcome::Processed(PaddingReport {
        analyze_file,
        node_code,
        coordinate,
        slots,
        ignored_gaps,
    }))
}

/// Everything the digest flow did for one repair report.
#[derive(Debug)]
pub struct DigestReport {
    pub report: RepairReport,
    /// Whether the repaired raw file is already at its destination.
    pub destination_exists: bool,
    pub appended: SequencedAppend,
}

/// Run the digest flow for one repair report file.
pub fn run_digest(config: &SiteConfig, report_path: &Path) -> Result<DigestReport, NoderecError> {
    let report = report::parse_repair_report(report_path)?;
    info!(
        bumper = %report.bumper,
        serial = %report.serial,
        "repair report parsed"
    );

    let destination_exists = report.destination_exists();
    if !destination_exists {
        warn!(destination = %report.destination.display(), "repaired raw file not yet copied");
    }

    let appended = ledger::append_sequenced(&config.digest_file, &report.digest_payload())?;
    Ok(DigestReport {
        report,
        destination_exists,
        appended,
    })
}
