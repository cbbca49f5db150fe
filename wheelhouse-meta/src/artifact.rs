//! Artifact classification and extractor dispatch

use std::path::Path;

use crate::metadata::PackageRecord;
use crate::sdist::{extract_sdist, is_sdist};
use crate::wheel::{extract_wheel, file_name};
use crate::{Error, Result};

/// Kind of distribution artifact, decided by filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Wheel,
    Sdist,
}

/// Classify a path by extension; `None` for anything that is not an artifact.
pub fn classify(path: &Path) -> Option<ArtifactKind> {
    let filename = file_name(path);
    if filename.to_ascii_lowercase().ends_with(".whl") {
        Some(ArtifactKind::Wheel)
    } else if is_sdist(&filename) {
        Some(ArtifactKind::Sdist)
    } else {
        None
    }
}

/// Run the extractor matching the artifact kind.
pub fn extract(kind: ArtifactKind, path: &Path, hash: Option<String>) -> Option<PackageRecord> {
    match kind {
        ArtifactKind::Wheel => extract_wheel(path, hash),
        ArtifactKind::Sdist => extract_sdist(path, hash),
    }
}

/// Classify and extract a single file.
///
/// Errors only when the file is not a recognized artifact.
pub fn extract_path(path: &Path, hash: Option<String>) -> Result<Option<PackageRecord>> {
    let kind = classify(path).ok_or_else(|| Error::UnsupportedArtifact(path.to_path_buf()))?;
    Ok(extract(kind, path, hash))
}
