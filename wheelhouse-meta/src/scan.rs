//! Mirror directory scanning

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::artifact::{classify, ArtifactKind};
use crate::Result;

/// Artifacts found at the top level of a mirror, each list sorted by name
#[derive(Debug, Clone, Default)]
pub struct MirrorListing {
    pub wheels: Vec<PathBuf>,
    pub sdists: Vec<PathBuf>,
}

impl MirrorListing {
    pub fn len(&self) -> usize {
        self.wheels.len() + self.sdists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!("Glob error: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn escaped(dir: &Path) -> String {
    glob::Pattern::escape(&dir.to_string_lossy())
}

/// Classify the files directly inside `dir`.
pub fn scan_mirror(dir: &Path) -> Result<MirrorListing> {
    let mut listing = MirrorListing::default();

    for path in glob_files(&format!("{}/*", escaped(dir)))? {
        match classify(&path) {
            Some(ArtifactKind::Wheel) => listing.wheels.push(path),
            Some(ArtifactKind::Sdist) => listing.sdists.push(path),
            None => debug!("Ignoring non-artifact {:?}", path),
        }
    }

    debug!(
        "Found {} wheels and {} sdists in {:?}",
        listing.wheels.len(),
        listing.sdists.len(),
        dir
    );
    Ok(listing)
}

/// Every regular file under `dir`, recursively, sorted by path.
pub fn list_files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    glob_files(&format!("{}/**/*", escaped(dir)))
}
