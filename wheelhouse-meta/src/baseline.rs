//! Integrity baseline parsing and generation
//!
//! A baseline document records a content hash for every file in the mirror:
//!
//! ```json
//! { "Mirror": { "Files": [ { "RelativePath": "a-1.0.tar.gz", "Hash": "..." } ] } }
//! ```
//!
//! Documents written by other tooling do not always match the typed shape
//! (key casing differs, a one-file list is collapsed to a bare object), so
//! parsing falls back to a dynamic view of the JSON.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::checksum::sha256sum;
use crate::scan::list_files_recursive;
use crate::{Error, Result};

/// One file descriptor in a baseline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BaselineFile {
    /// Path relative to the mirror root
    #[serde(rename = "RelativePath")]
    pub relative_path: String,

    /// Content hash (hex)
    #[serde(rename = "Hash")]
    pub hash: String,
}

/// The `Mirror` section of a baseline
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MirrorSection {
    #[serde(rename = "Path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(rename = "GeneratedAt", default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    #[serde(rename = "Files", default)]
    pub files: Vec<BaselineFile>,
}

/// Typed baseline document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BaselineDocument {
    #[serde(rename = "Mirror")]
    pub mirror: MirrorSection,
}

impl BaselineDocument {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A parsed baseline, either matching the typed shape or held dynamically.
#[derive(Debug, Clone)]
pub enum BaselineShape {
    Strict(BaselineDocument),
    Loose(Value),
}

impl BaselineShape {
    /// Parse baseline JSON. Fails only if the text is not JSON at all.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;

        match BaselineDocument::deserialize(&value) {
            Ok(doc) => Ok(BaselineShape::Strict(doc)),
            Err(e) => {
                debug!("Baseline does not match typed shape ({}), reading dynamically", e);
                Ok(BaselineShape::Loose(value))
            }
        }
    }

    /// `(relative_path, hash)` pairs in document order
    pub fn entries(&self) -> Vec<(String, String)> {
        match self {
            BaselineShape::Strict(doc) => doc
                .mirror
                .files
                .iter()
                .map(|f| (f.relative_path.clone(), f.hash.clone()))
                .collect(),
            BaselineShape::Loose(value) => loose_entries(value),
        }
    }
}

/// Look up a field on a JSON object, exact key first, then ignoring case.
pub fn get_field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    map.get(name).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

fn loose_entries(root: &Value) -> Vec<(String, String)> {
    let Some(files) = get_field(root, "Mirror").and_then(|m| get_field(m, "Files")) else {
        return Vec::new();
    };

    let descriptors: Vec<&Value> = match files {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![files],
        _ => Vec::new(),
    };

    descriptors
        .into_iter()
        .filter_map(|file| {
            let path = get_field(file, "RelativePath")?.as_str()?;
            let hash = get_field(file, "Hash")?.as_str()?;
            Some((path.to_string(), hash.to_string()))
        })
        .collect()
}

/// Base filename of a baseline relative path (either separator)
pub fn base_filename(relative_path: &str) -> &str {
    relative_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(relative_path)
        .trim()
}

/// Filename → hash mapping; the first entry for a filename wins
#[derive(Debug, Clone, Default)]
pub struct HashLookup {
    hashes: HashMap<String, String>,
}

impl HashLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(relative_path, hash)` pairs
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut lookup = Self::new();
        for (path, hash) in entries {
            let filename = base_filename(&path);
            if filename.is_empty() || lookup.hashes.contains_key(filename) {
                continue;
            }
            lookup.hashes.insert(filename.to_string(), hash);
        }
        lookup
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.hashes.get(filename).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Load the hash lookup from a baseline document.
///
/// A missing document is silently empty; an unreadable or unparsable one is
/// logged and treated as empty.
pub fn load_hash_lookup(path: &Path) -> HashLookup {
    if !path.exists() {
        debug!("Baseline {:?} not present", path);
        return HashLookup::new();
    }

    let shape = std::fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|text| BaselineShape::parse(&text));

    match shape {
        Ok(shape) => {
            let lookup = HashLookup::from_entries(shape.entries());
            info!("Loaded {} baseline hashes from {:?}", lookup.len(), path);
            lookup
        }
        Err(e) => {
            warn!("Failed to parse baseline {:?}: {}", path, e);
            HashLookup::new()
        }
    }
}

/// Hash every file under `mirror` into a new baseline document.
pub fn generate_baseline(mirror: &Path) -> Result<BaselineDocument> {
    if !mirror.is_dir() {
        return Err(Error::MirrorNotFound(mirror.to_path_buf()));
    }

    let mut files = Vec::new();
    for path in list_files_recursive(mirror)? {
        let relative = path
            .strip_prefix(mirror)
            .map_err(|_| Error::Other(format!("{:?} is outside {:?}", path, mirror)))?;
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        debug!("Hashing {}", relative_path);
        files.push(BaselineFile {
            relative_path,
            hash: sha256sum(&path)?,
        });
    }

    info!("Hashed {} files under {:?}", files.len(), mirror);

    Ok(BaselineDocument {
        mirror: MirrorSection {
            path: Some(mirror.to_string_lossy().to_string()),
            generated_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            files,
        },
    })
}
