use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git executable not found: {0}")]
    GitNotFound(#[from] which::Error),

    #[error("`git {command}` failed: {stderr}")]
    GitFailed { command: String, stderr: String },

    #[error("Malformed log line: {0}")]
    MalformedLog(String),

    #[error("Invalid revision date {value:?}: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Content of {0} is not valid UTF-8")]
    NotUtf8(String),
}

pub type Result<T> = std::result::Result<T, Error>;
