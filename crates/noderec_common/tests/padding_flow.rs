//! End-to-end tests for the padding and digest workflows over a fixture
//! survey tree.

use std::fs;
use std::path::{Path, PathBuf};

use noderec_common::config::SiteConfig;
use noderec_common::error::NoderecError;
use noderec_common::ledger::AppendOutcome;
use noderec_common::workflow::{run_digest, run_padding, PaddingOutcome};

const SERIAL: &str = "12345";
const RAW_NAME: &str = "line_12_000123_b77_rsn12345_x.raw";

struct Fixture {
    _dir: tempfile::TempDir,
    config: SiteConfig,
    repairs: PathBuf,
}

impl Fixture {
    /// A mounted survey tree with one repaired node, plus empty ledgers.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let repairs = root.join("dl1/RawImageRepairs/2023-06-14");
        fs::create_dir_all(&repairs).unwrap();
        fs::create_dir_all(root.join("ledgers")).unwrap();

        let config = SiteConfig {
            search_root: root.to_path_buf(),
            padded_ledger: root.join("ledgers/padded_nodes.txt"),
            padded_ledger_2: root.join("ledgers/padded_nodes_2.txt"),
            nav_file: root.join("4dnav.csv"),
            bumper_serial_file: root.join("bumper_rsn.txt"),
            digest_file: root.join("ledgers/digest.csv"),
        };

        let fixture = Self {
            _dir: dir,
            config,
            repairs,
        };
        fixture.write_nav(&[("42", 100, 5, 3), ("77", 101, 9, 1)]);
        fixture.write_bumper_table("77 12345\n78 12346\n");
        fixture.write_raw_file();
        fixture
    }

    fn write_series(&self, body: &str) {
        fs::write(
            self.repairs.join(format!("sn{SERIAL}_analyze.csv")),
            format!("second,delta\n{body}"),
        )
        .unwrap();
    }

    fn write_nav(&self, rows: &[(&str, i64, i64, i64)]) {
        let mut content = String::new();
        for n in 1..=8 {
            content.push_str(&format!("# header {n}\n"));
        }
        content.push_str("Line,Point,NodeCode,Index\n");
        for (code, line, point, index) in rows {
            content.push_str(&format!("{line},{point},{code},{index}\n"));
        }
        fs::write(&self.config.nav_file, content).unwrap();
    }

    fn write_bumper_table(&self, body: &str) {
        fs::write(&self.config.bumper_serial_file, body).unwrap();
    }

    fn write_raw_file(&self) {
        fs::write(self.repairs.join(RAW_NAME), vec![0u8; 32]).unwrap();
    }

    fn ledger_content(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }
}

#[test]
fn padding_records_both_gaps_into_their_ledgers() {
    let fixture = Fixture::new();
    fixture.write_series("10,1\n11,5\n20,1\n30,10\n");

    let outcome = run_padding(&fixture.config, SERIAL, false).unwrap();
    let report = match outcome {
        PaddingOutcome::Processed(report) => report,
        other => panic!("expected processed outcome, got {other:?}"),
    };

    assert_eq!(report.node_code, "77");
    assert_eq!(report.slots.len(), 2);
    assert_eq!(report.ignored_gaps, 0);
    for slot in &report.slots {
        assert!(matches!(slot.result, Some(Ok(AppendOutcome::Appended))));
    }

    // Serial 12345 maps to bumper 77 at (101, 9, 1)
    assert_eq!(
        fixture.ledger_content(&fixture.config.padded_ledger),
        "101\t\t9\t\t\t1\t\t\t7\t\t11\n"
    );
    assert_eq!(
        fixture.ledger_content(&fixture.config.padded_ledger_2),
        "101\t\t9\t\t\t1\t\t\t21\t\t30\n"
    );
}

#[test]
fn padding_rerun_is_idempotent() {
    let fixture = Fixture::new();
    fixture.write_series("11,5\n");

    run_padding(&fixture.config, SERIAL, false).unwrap();
    let outcome = run_padding(&fixture.config, SERIAL, false).unwrap();
    let report = match outcome {
        PaddingOutcome::Processed(report) => report,
        other => panic!("expected processed outcome, got {other:?}"),
    };

    assert!(matches!(
        report.slots[0].result,
        Some(Ok(AppendOutcome::AlreadyPresent))
    ));
    assert_eq!(
        fixture
            .ledger_content(&fixture.config.padded_ledger)
            .lines()
            .count(),
        1
    );
}

#[test]
fn padding_clean_series_has_nothing_to_record() {
    let fixture = Fixture::new();
    fixture.write_series("10,1\n11,1\n");

    let outcome = run_padding(&fixture.config, SERIAL, false).unwrap();
    assert!(matches!(outcome, PaddingOutcome::NoPaddedSamples { .. }));
    assert_eq!(fixture.ledger_content(&fixture.config.padded_ledger), "");
}

#[test]
fn padding_falls_back_to_raw_file_bumper() {
    let fixture = Fixture::new();
    fixture.write_series("11,5\n");
    // Serial table says bumper 42, but navigation no longer carries 42;
    // the raw file name encodes bumper 77.
    fixture.write_bumper_table("42 12345\n");
    fixture.write_nav(&[("77", 101, 9, 1)]);

    let outcome = run_padding(&fixture.config, SERIAL, false).unwrap();
    let report = match outcome {
        PaddingOutcome::Processed(report) => report,
        other => panic!("expected processed outcome, got {other:?}"),
    };
    assert_eq!(report.node_code, "77");
    assert_eq!(report.coordinate.line, 101);
}

#[test]
fn padding_unresolvable_node_writes_nothing() {
    let fixture = Fixture::new();
    fixture.write_series("11,5\n");
    fixture.write_bumper_table("42 12345\n");
    // Navigation carries neither 42 nor the raw file's 77
    fixture.write_nav(&[("99", 1, 1, 1)]);

    let err = run_padding(&fixture.config, SERIAL, false).unwrap_err();
    assert!(matches!(err, NoderecError::Unresolved(_)));
    assert_eq!(fixture.ledger_content(&fixture.config.padded_ledger), "");
    assert_eq!(fixture.ledger_content(&fixture.config.padded_ledger_2), "");
}

#[test]
fn padding_ignores_gaps_beyond_the_two_slots() {
    let fixture = Fixture::new();
    fixture.write_series("11,5\n20,3\n40,7\n");

    let outcome = run_padding(&fixture.config, SERIAL, false).unwrap();
    let report = match outcome {
        PaddingOutcome::Processed(report) => report,
        other => panic!("expected processed outcome, got {other:?}"),
    };

    assert_eq!(report.slots.len(), 2);
    assert_eq!(report.ignored_gaps, 1);
    assert_eq!(
        fixture
            .ledger_content(&fixture.config.padded_ledger_2)
            .trim_end(),
        "101\t\t9\t\t\t1\t\t\t18\t\t20"
    );
}

#[test]
fn padding_dry_run_touches_no_ledger() {
    let fixture = Fixture::new();
    fixture.write_series("11,5\n");

    let outcome = run_padding(&fixture.config, SERIAL, true).unwrap();
    let report = match outcome {
        PaddingOutcome::Processed(report) => report,
        other => panic!("expected processed outcome, got {other:?}"),
    };

    assert!(report.slots[0].result.is_none());
    assert!(!fixture.config.padded_ledger.exists());
}

#[test]
fn padding_without_navigation_is_terminal() {
    let fixture = Fixture::new();
    fixture.write_series("11,5\n");
    fs::remove_file(&fixture.config.nav_file).unwrap();

    let err = run_padding(&fixture.config, SERIAL, false).unwrap_err();
    assert!(matches!(err, NoderecError::NavigationUnavailable(_)));
}

#[test]
fn padding_unknown_serial_is_not_found() {
    let fixture = Fixture::new();
    fixture.write_series("11,5\n");

    let err = run_padding(&fixture.config, "99999", false).unwrap_err();
    assert!(matches!(err, NoderecError::NotFound { .. }));
}

fn write_repair_report(dir: &Path) -> PathBuf {
    let path = dir.join("repair.txt");
    fs::write(
        &path,
        "Repair summary\n\
         Start second: 1686700000\n\
         Stop second: 1686700500\n\
         Out File: /dl2/Records/Current/2023-06-14/out_file.raw\n\
         Created raw file: /dl1/Repairs/2023-06-14/line_12_000123_b77_rsn12345_x.raw\n",
    )
    .unwrap();
    path
}

#[test]
fn digest_appends_sequenced_record_once() {
    let fixture = Fixture::new();
    let report_path = write_repair_report(fixture._dir.path());

    let first = run_digest(&fixture.config, &report_path).unwrap();
    assert_eq!(first.appended.outcome, AppendOutcome::Appended);
    assert_eq!(first.appended.sequence, Some(1));
    assert_eq!(first.report.bumper, "77");
    assert!(!first.destination_exists);

    let second = run_digest(&fixture.config, &report_path).unwrap();
    assert_eq!(second.appended.outcome, AppendOutcome::AlreadyPresent);

    let content = fixture.ledger_content(&fixture.config.digest_file);
    assert_eq!(content.lines().count(), 1);
    assert!(content.starts_with("1,77,12345,1686700000,1686700500,"));
}

#[test]
fn digest_sequence_continues_from_existing_records() {
    let fixture = Fixture::new();
    fs::write(&fixture.config.digest_file, "9,unrelated,record\n").unwrap();
    let report_path = write_repair_report(fixture._dir.path());

    let result = run_digest(&fixture.config, &report_path).unwrap();
    assert_eq!(result.appended.sequence, Some(10));
}
