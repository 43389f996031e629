//! Status rendering for noderecctl.
//!
//! Every workflow outcome gets a distinct, human-readable line: nothing to
//! do, already recorded, appended, write failed. Ledger lines are
//! whitespace-normalized for display only; the files keep the exact bytes.

use owo_colors::OwoColorize;

use noderec_common::ledger::AppendOutcome;
use noderec_common::report::from_unix;
use noderec_common::workflow::{DigestReport, PaddingReport};

/// Collapse runs of whitespace for display.
fn compact(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn failure(message: &str) {
    eprintln!("{}", message.red().bold());
}

pub fn nothing_to_do(analyze_file: &std::path::Path) {
    println!(
        "{}",
        format!(
            "No padded samples in {}. Nothing to record.",
            file_name(analyze_file)
        )
        .yellow()
    );
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn padding_report(report: &PaddingReport, dry_run: bool) {
    println!(
        "Node {} at line {} point {} index {} ({})",
        report.node_code.bold(),
        report.coordinate.line,
        report.coordinate.point,
        report.coordinate.index,
        file_name(&report.analyze_file)
    );

    for slot in &report.slots {
        let ledger = file_name(&slot.ledger);
        match &slot.result {
            None => {
                println!(
                    "{}",
                    format!("dry run: {} -> {}", compact(&slot.line), ledger).cyan()
                );
            }
            Some(Ok(AppendOutcome::Appended)) => {
                println!(
                    "{}",
                    format!("{} added to {}", compact(&slot.line), ledger).green()
                );
            }
            Some(Ok(AppendOutcome::AlreadyPresent)) => {
                println!(
                    "{}",
                    format!("{} already contains {}", ledger, compact(&slot.line)).yellow()
                );
            }
            Some(Err(err)) => {
                eprintln!("{}", format!("write to {} failed: {}", ledger, err).red());
            }
        }
    }

    if report.ignored_gaps > 0 {
        println!(
            "{}",
            format!(
                "{} further gap(s) beyond the two ledger slots were not recorded",
                report.ignored_gaps
            )
            .yellow()
            .bold()
        );
    }
    if dry_run {
        println!("{}", "dry run: no ledger was written".cyan());
    }
}

pub fn digest_report(digest: &DigestReport) {
    let report = &digest.report;
    println!(
        "Bumper {} serial {}, window {} ({}) .. {} ({})",
        report.bumper.bold(),
        report.serial.bold(),
        report.start_unix,
        from_unix(report.start_unix),
        report.stop_unix,
        from_unix(report.stop_unix)
    );

    if digest.destination_exists {
        println!(
            "{}",
            format!("repaired raw file already at {}", report.destination.display()).green()
        );
    } else {
        println!(
            "{}",
            format!(
                "repaired raw file must still be copied to {}",
                report.destination.display()
            )
            .yellow()
            .bold()
        );
    }

    match digest.appended.outcome {
        AppendOutcome::Appended => {
            // sequence is always present on an append
            let sequence = digest.appended.sequence.unwrap_or_default();
            println!(
                "{}",
                format!("digest record {} appended", sequence).green()
            );
        }
        AppendOutcome::AlreadyPresent => {
            println!(
                "{}",
                "digest already recorded; delete the existing line first to re-record"
                    .yellow()
            );
        }
    }
}
