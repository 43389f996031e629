//! Command implementations: workflow dispatch and exit-code mapping.

use std::path::Path;

use noderec_common::workflow::{self, PaddingOutcome};
use noderec_common::SiteConfig;

use crate::errors;
use crate::render;

/// Detect and record padded intervals for one node serial.
pub fn padding(config: &SiteConfig, serial: &str, dry_run: bool) -> i32 {
    match workflow::run_padding(config, serial, dry_run) {
        Ok(PaddingOutcome::NoPaddedSamples { analyze_file }) => {
            render::nothing_to_do(&analyze_file);
            errors::EXIT_NO_PADDING
        }
        Ok(PaddingOutcome::Processed(report)) => {
            let failed = report.any_write_failed();
            render::padding_report(&report, dry_run);
            if failed {
                errors::EXIT_WRITE_FAILED
            } else {
                errors::EXIT_SUCCESS
            }
        }
        Err(err) => {
            render::failure(&err.to_string());
            errors::exit_code_for(&err)
        }
    }
}

/// Parse a repair report and append its digest record.
pub fn digest(config: &SiteConfig, report_path: &Path) -> i32 {
    match workflow::run_digest(config, report_path) {
        Ok(digest) => {
            render::digest_report(&digest);
            errors::EXIT_SUCCESS
        }
        Err(err) => {
            render::failure(&err.to_string());
            errors::exit_code_for(&err)
        }
    }
}
