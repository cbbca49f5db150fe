//! Inventory pipeline
//!
//! Builds the hash lookup and first-use index, scans the mirror, runs the
//! extractors and joins everything into report rows. Both enrichment
//! sources are optional and fully built before the join.

use std::path::{Path, PathBuf};
use tracing::info;
use wheelhouse_history::{mine_repository, FirstUseIndex};

use crate::artifact::{extract, ArtifactKind};
use crate::baseline::{load_hash_lookup, HashLookup};
use crate::inventory::{join, InventoryRow, RowLabels};
use crate::metadata::PackageRecord;
use crate::requirements::{extract_keys, DEFAULT_MANIFEST};
use crate::scan::scan_mirror;
use crate::wheel::file_name;
use crate::{Error, Result};

/// Inputs of one inventory run
#[derive(Debug, Clone)]
pub struct InventoryOptions {
    /// Mirror directory to inventory
    pub mirror: PathBuf,
    /// Integrity baseline document
    pub baseline: Option<PathBuf>,
    /// Approved-packages git repository
    pub history_repo: Option<PathBuf>,
    /// Manifest path inside the history repository
    pub manifest: String,
    pub labels: RowLabels,
}

impl InventoryOptions {
    pub fn new(mirror: impl Into<PathBuf>) -> Self {
        Self {
            mirror: mirror.into(),
            baseline: None,
            history_repo: None,
            manifest: DEFAULT_MANIFEST.to_string(),
            labels: RowLabels::default(),
        }
    }
}

/// Mine first-use dates for the requirements manifest of `repo`.
pub fn first_use_index(repo: &Path, manifest: &str) -> FirstUseIndex {
    mine_repository(repo, manifest, extract_keys)
}

/// Extract records for every artifact in the mirror, wheels first.
pub fn extract_records(mirror: &Path, hashes: &HashLookup) -> Result<Vec<Option<PackageRecord>>> {
    let listing = scan_mirror(mirror)?;

    let wheels = listing.wheels.iter().map(|p| (ArtifactKind::Wheel, p));
    let sdists = listing.sdists.iter().map(|p| (ArtifactKind::Sdist, p));

    Ok(wheels
        .chain(sdists)
        .map(|(kind, path)| {
            let hash = hashes.get(&file_name(path)).map(str::to_string);
            extract(kind, path, hash)
        })
        .collect())
}

/// Run the whole inventory.
///
/// Fails only when the mirror directory is missing or cannot be listed.
pub fn build_inventory(options: &InventoryOptions) -> Result<Vec<InventoryRow>> {
    if !options.mirror.is_dir() {
        return Err(Error::MirrorNotFound(options.mirror.clone()));
    }

    let hashes = match &options.baseline {
        Some(path) => load_hash_lookup(path),
        None => HashLookup::new(),
    };

    let first_use = match &options.history_repo {
        Some(repo) => first_use_index(repo, &options.manifest),
        None => FirstUseIndex::new(),
    };

    let records = extract_records(&options.mirror, &hashes)?;
    let total = records.len();

    let location = options.mirror.to_string_lossy();
    let rows = join(records, &hashes, &first_use, &options.labels, &location);

    info!(
        "Inventoried {} of {} artifacts in {:?}",
        rows.len(),
        total,
        options.mirror
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_wheel;
    use crate::metadata::RecordOrigin;
    use std::process::Command;

    fn git(dir: &Path, args: &[&str], date: &str) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args([
                "-c",
                "user.name=Auditor",
                "-c",
                "user.email=auditor@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_missing_mirror_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let options = InventoryOptions::new(dir.path().join("missing"));
        assert!(matches!(
            build_inventory(&options),
            Err(Error::MirrorNotFound(_))
        ));
    }

    #[test]
    fn test_optional_sources_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = dir.path().join("mirror");
        std::fs::create_dir(&mirror).unwrap();
        write_wheel(&mirror, "foo-1.0-py3-none-any.whl", "Name: foo\nVersion: 1.0\n");
        std::fs::write(mirror.join("broken-1.0-py3-none-any.whl"), b"garbage").unwrap();

        let mut options = InventoryOptions::new(&mirror);
        options.baseline = Some(dir.path().join("no-baseline.json"));
        options.history_repo = Some(dir.path().join("no-repo"));

        let rows = build_inventory(&options).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "foo");
        assert_eq!(rows[0].date_first_used, "");
        assert_eq!(rows[0].hash, "");
    }

    #[test]
    fn test_end_to_end() {
        if which::which("git").is_err() {
            eprintln!("git not available, skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();

        let mirror = dir.path().join("mirror");
        std::fs::create_dir(&mirror).unwrap();
        write_wheel(
            &mirror,
            "Foo_Bar-1.2.3-py3-none-any.whl",
            "Metadata-Version: 2.1\nName: Foo_Bar\nVersion: 1.2.3\nSummary: Foo things\nRequires-Python: >=3.8\nHome-page: https://foo.example\n",
        );
        std::fs::write(mirror.join("lonely-0.9.tar.gz"), b"sdist").unwrap();

        let baseline = dir.path().join("baseline.json");
        std::fs::write(
            &baseline,
            r#"{"Mirror": {"Files": [
                {"RelativePath": "mirror/Foo_Bar-1.2.3-py3-none-any.whl", "Hash": "FOOHASH"}
            ]}}"#,
        )
        .unwrap();

        let repo = dir.path().join("approved");
        std::fs::create_dir(&repo).unwrap();
        git(&repo, &["init", "-q"], "2019-05-01T09:00:00+00:00");
        std::fs::write(repo.join("requirements.txt"), "# approved\nsix==1.16.0\n").unwrap();
        git(&repo, &["add", "requirements.txt"], "2019-05-01T09:00:00+00:00");
        git(&repo, &["commit", "-q", "-m", "initial"], "2019-05-01T09:00:00+00:00");
        std::fs::write(repo.join("requirements.txt"), "# approved\nsix==1.16.0\nfoo-bar>=1.0\n").unwrap();
        git(&repo, &["commit", "-q", "-a", "-m", "approve foo-bar"], "2021-07-14T16:20:00+00:00");

        let options = InventoryOptions {
            mirror: mirror.clone(),
            baseline: Some(baseline),
            history_repo: Some(repo),
            manifest: DEFAULT_MANIFEST.to_string(),
            labels: RowLabels::default(),
        };

        let rows = build_inventory(&options).unwrap();
        assert_eq!(rows.len(), 2);

        let wheel = &rows[0];
        assert_eq!(wheel.name, "Foo_Bar");
        assert_eq!(wheel.version, "1.2.3");
        assert_eq!(wheel.date_first_used, "2021-07-14");
        assert_eq!(wheel.hash, "FOOHASH");
        assert_eq!(wheel.requires_python, ">=3.8");
        assert_eq!(wheel.homepage, "https://foo.example");
        assert_eq!(wheel.location, mirror.to_string_lossy());
        assert_eq!(wheel.origin, RecordOrigin::Embedded);

        let sdist = &rows[1];
        assert_eq!(sdist.name, "lonely");
        assert_eq!(sdist.version, "0.9");
        assert_eq!(sdist.date_first_used, "");
        assert_eq!(sdist.hash, "");
        assert_eq!(sdist.origin, RecordOrigin::Filename);
    }
}
