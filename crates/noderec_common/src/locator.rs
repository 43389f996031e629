//! Discovery of per-node repair artifacts on the mounted data volumes.
//!
//! Analyze series and raw files land under `dl*/RawImageRepairs/<date>/`
//! on whichever data volume handled the repair, so discovery is a glob over
//! an injected search root. The process working directory is never consulted
//! or changed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::NoderecError;

/// Tie-break policy when a pattern matches more than one candidate.
///
/// Multiple matches can happen when a node was repaired twice and both
/// repair trees are still mounted. Which candidate is authoritative is an
/// open product question; until that is settled the policy is explicit here
/// rather than an accident of iteration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Take the first candidate in lexical glob order.
    #[default]
    FirstMatch,
}

/// Finds repair artifacts for a node serial under a fixed search root.
#[derive(Debug, Clone)]
pub struct Locator {
    search_root: PathBuf,
    policy: MatchPolicy,
}

impl Locator {
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_policy(search_root: impl Into<PathBuf>, policy: MatchPolicy) -> Self {
        Self {
            search_root: search_root.into(),
            policy,
        }
    }

    /// Path of the node's analyze series, `sn<serial>_analyze.csv`.
    pub fn find_analyze_file(&self, serial: &str) -> Result<PathBuf, NoderecError> {
        self.find_unique(&format!("dl*/RawImageRepairs/*/sn{serial}_analyze.csv"))
    }

    /// Path of the node's repaired raw file, `*_rsn<serial>_*.raw`.
    pub fn find_raw_file(&self, serial: &str) -> Result<PathBuf, NoderecError> {
        self.find_unique(&format!("dl*/RawImageRepairs/*/*_rsn{serial}_*.raw"))
    }

    /// Match `relative_pattern` under the search root and narrow to one
    /// validated candidate.
    fn find_unique(&self, relative_pattern: &str) -> Result<PathBuf, NoderecError> {
        let pattern = self.search_root.join(relative_pattern);
        let pattern = pattern.to_string_lossy();
        debug!(pattern = %pattern, "searching for repair artifact");

        // glob yields paths in lexical order already
        let mut matches: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| NoderecError::Parse {
                path: pattern.to_string(),
                message: e.to_string(),
            })?
            .filter_map(Result::ok)
            .collect();

        if matches.is_empty() {
            return Err(NoderecError::NotFound {
                pattern: pattern.to_string(),
            });
        }
        if matches.len() > 1 {
            info!(
                candidates = matches.len(),
                pattern = %pattern,
                "multiple candidates, narrowing by match policy"
            );
        }

        let candidate = match self.policy {
            MatchPolicy::FirstMatch => matches.remove(0),
        };
        validate(&candidate)?;
        Ok(candidate)
    }
}

/// A candidate is only usable if it still exists and is non-empty. Repair
/// trees are unmounted and remounted during a shift, so a path that matched
/// moments ago may already be gone.
fn validate(path: &Path) -> Result<(), NoderecError> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(NoderecError::InvalidFile(path.display().to_string())),
    }
}
