//! wheelhouse-meta: Inventory generator for a local Python package mirror
//!
//! This crate provides tools for:
//! - Extracting package metadata from wheels and sdist filenames
//! - Normalizing package identity across data sources
//! - Reading (and generating) integrity baseline documents
//! - Joining mirror contents with first-use dates into report rows

pub mod artifact;
pub mod baseline;
pub mod checksum;
pub mod error;
pub mod identity;
pub mod inventory;
pub mod metadata;
pub mod pipeline;
pub mod report;
pub mod requirements;
pub mod scan;
pub mod sdist;
pub mod wheel;

#[cfg(test)]
pub(crate) mod fixtures;

pub use baseline::{load_hash_lookup, BaselineDocument, HashLookup};
pub use error::{Error, Result};
pub use identity::normalize;
pub use inventory::{InventoryRow, RowLabels};
pub use metadata::{PackageRecord, RecordOrigin};
pub use pipeline::{build_inventory, InventoryOptions};
