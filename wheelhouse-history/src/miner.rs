//! First-use mining over the history of a tracked manifest
//!
//! Walks every revision of the manifest, oldest first, and records the
//! earliest date each extracted key was present. History is optional
//! enrichment: no failure in here is fatal to the caller.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::git::{GitCli, RevisionSource};
use crate::models::FirstUseIndex;

/// Mine a first-use index from any [`RevisionSource`].
///
/// A failure listing revisions yields an empty index. A failure reading one
/// revision skips that revision and continues with the next.
pub fn mine_first_use<S, F, I>(source: &S, manifest: &str, extract: F) -> FirstUseIndex
where
    S: RevisionSource + ?Sized,
    F: Fn(&str) -> I,
    I: IntoIterator<Item = String>,
{
    let mut index = FirstUseIndex::new();

    let revisions = match source.revisions(manifest) {
        Ok(revisions) => revisions,
        Err(e) => {
            warn!("Failed to list revisions of {}: {}", manifest, e);
            return index;
        }
    };

    debug!("Found {} revisions of {}", revisions.len(), manifest);

    for revision in &revisions {
        let content = match source.content_at(revision, manifest) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Skipping revision {} of {}: {}",
                    revision.id, manifest, e
                );
                continue;
            }
        };

        let added = index.record(revision.date, extract(&content));
        if added > 0 {
            debug!("{} new keys at {} ({})", added, revision.id, revision.date);
        }
    }

    index
}

/// Mine the git repository at `repo` for first-use dates of `manifest`.
///
/// A missing repository is not an error and yields an empty index.
pub fn mine_repository<F, I>(repo: &Path, manifest: &str, extract: F) -> FirstUseIndex
where
    F: Fn(&str) -> I,
    I: IntoIterator<Item = String>,
{
    if !repo.exists() {
        debug!("History repository {:?} not present", repo);
        return FirstUseIndex::new();
    }

    let git = match GitCli::new(repo) {
        Ok(git) => git,
        Err(e) => {
            warn!("Cannot read history of {:?}: {}", repo, e);
            return FirstUseIndex::new();
        }
    };

    let index = mine_first_use(&git, manifest, extract);
    info!(
        "Mined first-use dates for {} packages from {:?}",
        index.len(),
        repo
    );
    index
}
