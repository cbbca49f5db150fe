use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Mirror directory not found: {0}")]
    MirrorNotFound(PathBuf),

    #[error("Unsupported artifact: {0}")]
    UnsupportedArtifact(PathBuf),

    #[error("Metadata is not valid UTF-8 in {0}")]
    MetadataEncoding(PathBuf),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
