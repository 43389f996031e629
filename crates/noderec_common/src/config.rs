//! Site configuration for noderec
//!
//! Paths to the mounted survey volumes and the shared ledger files.
//! Configuration lives in /etc/noderec/config.toml; a missing file or
//! missing keys fall back to the crew's standard deployment paths, so the
//! tool works unconfigured on a standard mount layout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::NoderecError;

/// System configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/noderec";
const CONFIG_FILE: &str = "config.toml";

/// Site path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root of the data-volume tree searched for repair artifacts
    #[serde(default = "default_search_root")]
    pub search_root: PathBuf,

    /// Shared ledger for the first padded interval of an invocation
    #[serde(default = "default_padded_ledger")]
    pub padded_ledger: PathBuf,

    /// Shared ledger for the second padded interval of an invocation
    #[serde(default = "default_padded_ledger_2")]
    pub padded_ledger_2: PathBuf,

    /// 4D navigation table (8-line preamble, then Line/Point/NodeCode/Index)
    #[serde(default = "default_nav_file")]
    pub nav_file: PathBuf,

    /// Whitespace-delimited bumper/serial table for the survey's nodes
    #[serde(default = "default_bumper_serial_file")]
    pub bumper_serial_file: PathBuf,

    /// Sequence-numbered digest ledger for repaired raw files
    #[serde(default = "default_digest_file")]
    pub digest_file: PathBuf,
}

fn default_search_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_padded_ledger() -> PathBuf {
    PathBuf::from("/qc/06-ARAM/padding/padded_nodes.txt")
}

fn default_padded_ledger_2() -> PathBuf {
    PathBuf::from("/qc/06-ARAM/padding/padded_nodes_2.txt")
}

fn default_nav_file() -> PathBuf {
    PathBuf::from("/qc/06-ARAM/nav/Postplot_R/4dnav_lines/BR001522_4dnav.csv")
}

fn default_bumper_serial_file() -> PathBuf {
    PathBuf::from("/qc/06-ARAM/parameters/AllMantaNodes_bumper_rsn.txt")
}

fn default_digest_file() -> PathBuf {
    PathBuf::from("/home/geo3/Public/zdmefr/02_Tools/Inputs/DigestDownloads.csvManual")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            search_root: default_search_root(),
            padded_ledger: default_padded_ledger(),
            padded_ledger_2: default_padded_ledger_2(),
            nav_file: default_nav_file(),
            bumper_serial_file: default_bumper_serial_file(),
            digest_file: default_digest_file(),
        }
    }
}

impl SiteConfig {
    /// Standard config file location
    pub fn system_path() -> PathBuf {
        Path::new(SYSTEM_CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file is absent. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, NoderecError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| NoderecError::parse(path, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = SiteConfig::load(Path::new("/nonexistent/noderec.toml")).unwrap();
        assert_eq!(config.search_root, PathBuf::from("/"));
        assert_eq!(
            config.padded_ledger,
            PathBuf::from("/qc/06-ARAM/padding/padded_nodes.txt")
        );
    }

    #[test]
    fn test_partial_file_overrides_named_keys_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "search_root = \"/mnt/survey\"").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.search_root, PathBuf::from("/mnt/survey"));
        // Unnamed keys keep their defaults
        assert_eq!(
            config.nav_file,
            PathBuf::from("/qc/06-ARAM/nav/Postplot_R/4dnav_lines/BR001522_4dnav.csv")
        );
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "search_root = [not toml").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, NoderecError::Parse { .. }));
    }
}
