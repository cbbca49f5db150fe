//! Inventory rows
//!
//! Joins extracted package records with baseline hashes and first-use
//! dates into the flat rows of the inventory report.

use serde::Serialize;
use wheelhouse_history::FirstUseIndex;

use crate::baseline::HashLookup;
use crate::identity::normalize;
use crate::metadata::{PackageRecord, RecordOrigin};

/// Placeholder columns filled in by hand during review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLabels {
    pub source: String,
    pub reviewer: String,
    pub installer: String,
}

impl Default for RowLabels {
    fn default() -> Self {
        Self {
            source: "PyPi".to_string(),
            reviewer: "Reviewer".to_string(),
            installer: "Installer".to_string(),
        }
    }
}

/// One row of the inventory report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryRow {
    pub name: String,
    pub version: String,
    pub date_first_used: String,
    pub requires_python: String,
    pub source: String,
    pub reviewer: String,
    pub installer: String,
    pub summary: String,
    pub homepage: String,
    pub location: String,
    pub hash: String,
    pub origin: RecordOrigin,
}

impl InventoryRow {
    /// Column names, in report order
    pub const COLUMNS: [&'static str; 11] = [
        "Name",
        "Version",
        "DateFirstUsed",
        "RequiresPython",
        "Source",
        "Reviewer",
        "Installer",
        "Summary",
        "Homepage",
        "Location",
        "Hash",
    ];

    /// Field values in [`InventoryRow::COLUMNS`] order
    pub fn fields(&self) -> [&str; 11] {
        [
            &self.name,
            &self.version,
            &self.date_first_used,
            &self.requires_python,
            &self.source,
            &self.reviewer,
            &self.installer,
            &self.summary,
            &self.homepage,
            &self.location,
            &self.hash,
        ]
    }
}

/// Join records into rows, preserving input order.
///
/// `None` records (artifacts an extractor declined) are skipped. The hash is
/// the record's own, falling back to a baseline lookup by filename.
pub fn join<I>(
    records: I,
    hashes: &HashLookup,
    first_use: &FirstUseIndex,
    labels: &RowLabels,
    location: &str,
) -> Vec<InventoryRow>
where
    I: IntoIterator<Item = Option<PackageRecord>>,
{
    records
        .into_iter()
        .flatten()
        .map(|record| {
            let key = normalize(&record.name);
            let date_first_used = first_use.date_string(&key).unwrap_or_default();
            let hash = record
                .hash
                .or_else(|| hashes.get(&record.filename).map(str::to_string))
                .unwrap_or_default();

            InventoryRow {
                name: record.name,
                version: record.version,
                date_first_used,
                requires_python: record.requires_python,
                source: labels.source.clone(),
                reviewer: labels.reviewer.clone(),
                installer: labels.installer.clone(),
                summary: record.summary,
                homepage: record.homepage,
                location: location.to_string(),
                hash,
                origin: record.origin,
            }
        })
        .collect()
}
