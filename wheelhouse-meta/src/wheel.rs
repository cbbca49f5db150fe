//! Wheel metadata extraction
//!
//! Reads the `*.dist-info/METADATA` entry of a wheel and turns its
//! `Key: value` headers into a [`PackageRecord`].

use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::metadata::{PackageRecord, RecordOrigin};
use crate::{Error, Result};

/// Suffix of the metadata entry inside a wheel
pub const METADATA_SUFFIX: &str = ".dist-info/METADATA";

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Name|Version|Requires-Python|Summary|Home-page|Project-URL):(.*)$")
        .expect("header pattern is valid")
});

/// Header values captured from a METADATA file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFields {
    pub name: Option<String>,
    pub version: Option<String>,
    pub requires_python: Option<String>,
    pub summary: Option<String>,
    pub home_page: Option<String>,
    /// `Project-URL: Homepage, ...` value, used when `Home-page` is absent
    pub project_homepage: Option<String>,
}

impl MetadataFields {
    /// Parse METADATA text line by line.
    ///
    /// When a header repeats, the last occurrence wins.
    pub fn parse(text: &str) -> Self {
        let mut fields = Self::default();

        for line in text.lines() {
            let Some(caps) = HEADER.captures(line) else {
                continue;
            };
            let value = caps[2].trim().to_string();

            match &caps[1] {
                "Name" => fields.name = Some(value),
                "Version" => fields.version = Some(value),
                "Requires-Python" => fields.requires_python = Some(value),
                "Summary" => fields.summary = Some(value),
                "Home-page" => fields.home_page = Some(value),
                "Project-URL" => {
                    if let Some(url) = homepage_url(&value) {
                        fields.project_homepage = Some(url);
                    }
                }
                _ => {}
            }
        }

        fields
    }

    /// Build a record; `None` unless both name and version are present.
    pub fn into_record(self, filename: &str, hash: Option<String>) -> Option<PackageRecord> {
        let name = self.name.filter(|s| !s.is_empty())?;
        let version = self.version.filter(|s| !s.is_empty())?;

        Some(PackageRecord {
            name,
            version,
            requires_python: self.requires_python.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            homepage: self.home_page.or(self.project_homepage).unwrap_or_default(),
            hash,
            filename: filename.to_string(),
            origin: RecordOrigin::Embedded,
        })
    }
}

/// URL of a `Project-URL` value labelled `Homepage`
fn homepage_url(value: &str) -> Option<String> {
    let (label, url) = value.split_once(',')?;
    if label.trim().eq_ignore_ascii_case("homepage") {
        Some(url.trim().to_string()).filter(|u| !u.is_empty())
    } else {
        None
    }
}

/// `<name>-<version>.dist-info/METADATA` at the archive root
fn is_root_metadata(entry: &str) -> bool {
    entry.ends_with(METADATA_SUFFIX) && entry.matches('/').count() == 1
}

/// Pick the wheel's own METADATA entry.
///
/// Vendored packages ship nested `*.dist-info` directories, so an entry at
/// the archive root is preferred; any other match is used only without one.
pub fn select_metadata_entry<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut nested = None;
    for name in names {
        if is_root_metadata(name) {
            return Some(name);
        }
        if nested.is_none() && name.ends_with(METADATA_SUFFIX) {
            nested = Some(name);
        }
    }
    nested
}

/// Read the METADATA text of a wheel, if it has one.
pub fn read_metadata(path: &Path) -> Result<Option<String>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let Some(entry_name) = select_metadata_entry(archive.file_names()).map(str::to_string) else {
        return Ok(None);
    };

    let mut entry = archive.by_name(&entry_name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;

    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| Error::MetadataEncoding(path.to_path_buf()))
}

/// Extract a [`PackageRecord`] from a wheel.
///
/// Unreadable archives, wheels without METADATA and metadata lacking a name
/// or version all yield `None` with a warning; this never fails the scan.
pub fn extract_wheel(path: &Path, hash: Option<String>) -> Option<PackageRecord> {
    let filename = file_name(path);

    let text = match read_metadata(path) {
        Ok(Some(text)) => text,
        Ok(None) => {
            warn!("No {} entry in {}", METADATA_SUFFIX, filename);
            return None;
        }
        Err(e) => {
            warn!("Failed to read wheel {}: {}", filename, e);
            return None;
        }
    };

    let record = MetadataFields::parse(&text).into_record(&filename, hash);
    match &record {
        Some(r) => debug!("Wheel {} -> {} {}", filename, r.name, r.version),
        None => warn!("Wheel {} is missing Name or Version", filename),
    }
    record
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_wheel, write_zip};

    #[test]
    fn test_extract_basic_wheel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wheel(
            dir.path(),
            "foo-1.2.3-py3-none-any.whl",
            "Name: foo\nVersion: 1.2.3\nSummary: bar",
        );

        let record = extract_wheel(&path, None).unwrap();
        assert_eq!(record.name, "foo");
        assert_eq!(record.version, "1.2.3");
        assert_eq!(record.summary, "bar");
        assert_eq!(record.requires_python, "");
        assert_eq!(record.homepage, "");
        assert_eq!(record.hash, None);
        assert_eq!(record.filename, "foo-1.2.3-py3-none-any.whl");
        assert_eq!(record.origin, RecordOrigin::Embedded);
    }

    #[test]
    fn test_missing_version_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wheel(dir.path(), "foo-1.0-py3-none-any.whl", "Name: foo\nSummary: bar\n");
        assert!(extract_wheel(&path, None).is_none());
    }

    #[test]
    fn test_hash_is_carried() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wheel(dir.path(), "foo-1.0-py3-none-any.whl", "Name: foo\nVersion: 1.0\n");
        let record = extract_wheel(&path, Some("abc123".to_string())).unwrap();
        assert_eq!(record.hash.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_no_metadata_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(dir.path(), "foo-1.0-py3-none-any.whl", &[("foo/__init__.py", "")]);
        assert!(extract_wheel(&path, None).is_none());
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken-1.0-py3-none-any.whl");
        std::fs::write(&path, b"this is not a zip file").unwrap();
        assert!(extract_wheel(&path, None).is_none());
        assert!(matches!(read_metadata(&path), Err(Error::Zip(_))));
    }

    #[test]
    fn test_root_metadata_preferred_over_vendored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(
            dir.path(),
            "setuptools-70.0.0-py3-none-any.whl",
            &[
                (
                    "setuptools/_vendor/jaraco.text-3.12.1.dist-info/METADATA",
                    "Name: jaraco.text\nVersion: 3.12.1\n",
                ),
                (
                    "setuptools-70.0.0.dist-info/METADATA",
                    "Name: setuptools\nVersion: 70.0.0\n",
                ),
            ],
        );

        let record = extract_wheel(&path, None).unwrap();
        assert_eq!(record.name, "setuptools");
        assert_eq!(record.version, "70.0.0");
    }

    #[test]
    fn test_nested_metadata_fallback() {
        let names = ["pkg/__init__.py", "vendor/inner-1.0.dist-info/METADATA"];
        assert_eq!(
            select_metadata_entry(names),
            Some("vendor/inner-1.0.dist-info/METADATA")
        );
        assert_eq!(select_metadata_entry(["pkg/__init__.py"]), None);
    }

    #[test]
    fn test_parse_full_headers() {
        let text = "Metadata-Version: 2.1\r\n\
                    Name: Requests\r\n\
                    Version: 2.31.0\r\n\
                    Summary:   Python HTTP for Humans.  \r\n\
                    Home-page: https://requests.readthedocs.io\r\n\
                    Requires-Python: >=3.7\r\n";
        let fields = MetadataFields::parse(text);

        assert_eq!(fields.name.as_deref(), Some("Requests"));
        assert_eq!(fields.summary.as_deref(), Some("Python HTTP for Humans."));
        assert_eq!(fields.home_page.as_deref(), Some("https://requests.readthedocs.io"));
        assert_eq!(fields.requires_python.as_deref(), Some(">=3.7"));
    }

    #[test]
    fn test_last_header_wins() {
        let fields = MetadataFields::parse("Name: first\nVersion: 1\nName: second\n");
        assert_eq!(fields.name.as_deref(), Some("second"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let fields = MetadataFields::parse("name: lower\nVersion: 1\n  Name: indented\n");
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_project_url_homepage_fallback() {
        let text = "Name: x\nVersion: 1\nProject-URL: Source, https://src.example\nProject-URL: homepage, https://home.example\n";
        let record = MetadataFields::parse(text).into_record("x.whl", None).unwrap();
        assert_eq!(record.homepage, "https://home.example");

        let text = "Name: x\nVersion: 1\nHome-page: https://explicit.example\nProject-URL: Homepage, https://home.example\n";
        let record = MetadataFields::parse(text).into_record("x.whl", None).unwrap();
        assert_eq!(record.homepage, "https://explicit.example");
    }
}
