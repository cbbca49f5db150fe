//! Source distribution name parsing
//!
//! An sdist carries no metadata we read, so name and version come from the
//! `<name>-<version><suffix>` filename convention. The split is at the
//! rightmost hyphen followed by a digit, which misreads names that
//! themselves end in `-<digit>...`; there is no way to tell from the
//! filename alone.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::metadata::PackageRecord;
use crate::wheel::file_name;

/// Recognized sdist suffixes, multi-part suffixes first
pub const SDIST_SUFFIXES: &[&str] = &[".tar.gz", ".tar.bz2", ".tar.xz", ".tgz", ".zip"];

static NAME_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+)-(?P<version>\d\S*)$").expect("sdist pattern is valid")
});

/// Strip a recognized sdist suffix (case-insensitive) as a unit.
pub fn strip_sdist_suffix(filename: &str) -> Option<&str> {
    let lower = filename.to_ascii_lowercase();
    SDIST_SUFFIXES
        .iter()
        .find(|suffix| lower.ends_with(*suffix))
        .map(|suffix| &filename[..filename.len() - suffix.len()])
}

/// Whether `filename` carries a recognized sdist suffix
pub fn is_sdist(filename: &str) -> bool {
    strip_sdist_suffix(filename).is_some()
}

/// Split an sdist filename into `(name, version)`.
pub fn parse_sdist_filename(filename: &str) -> Option<(String, String)> {
    let base = strip_sdist_suffix(filename)?;
    let caps = NAME_VERSION.captures(base)?;
    Some((caps["name"].to_string(), caps["version"].to_string()))
}

/// Extract a [`PackageRecord`] from an sdist filename.
pub fn extract_sdist(path: &Path, hash: Option<String>) -> Option<PackageRecord> {
    let filename = file_name(path);

    match parse_sdist_filename(&filename) {
        Some((name, version)) => {
            debug!("Sdist {} -> {} {}", filename, name, version);
            Some(PackageRecord::from_filename(name, version, filename, hash))
        }
        None => {
            warn!("Unrecognized sdist filename: {}", filename);
            None
        }
    }
}
