//! wheelhouse-history: First-use dates for approved packages
//!
//! This crate provides:
//! - Revision listing and content retrieval through the git CLI
//! - First-use index mining over a tracked manifest's history
//! - A [`RevisionSource`] seam for alternative history backends

pub mod error;
pub mod git;
pub mod miner;
pub mod models;

pub use error::{Error, Result};
pub use git::{GitCli, RevisionSource};
pub use miner::{mine_first_use, mine_repository};
pub use models::{FirstUseIndex, Revision, DATE_FORMAT};
