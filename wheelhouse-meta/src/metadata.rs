//! Package records extracted from mirror artifacts

use serde::{Deserialize, Serialize};

/// Where a record's fields came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    /// Read from the wheel's embedded `METADATA` file
    Embedded,
    /// Inferred from an sdist filename
    Filename,
}

impl RecordOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordOrigin::Embedded => "embedded",
            RecordOrigin::Filename => "filename",
        }
    }
}

impl std::fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized metadata for one artifact in the mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Distribution name as written by the artifact
    pub name: String,

    pub version: String,

    /// Version constraint on the interpreter, e.g. `>=3.8`
    #[serde(default)]
    pub requires_python: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub homepage: String,

    /// Content hash from the integrity baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Artifact base filename
    pub filename: String,

    pub origin: RecordOrigin,
}

impl PackageRecord {
    /// Record inferred from an sdist filename; only name and version are known.
    pub fn from_filename(
        name: impl Into<String>,
        version: impl Into<String>,
        filename: impl Into<String>,
        hash: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            requires_python: String::new(),
            summary: String::new(),
            homepage: String::new(),
            hash,
            filename: filename.into(),
            origin: RecordOrigin::Filename,
        }
    }
}
