use std::path::PathBuf;
use thiserror::Error;

use crate::subprocess::ProcessError;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Malformed pid file {}: {content:?} is not a process id", path.display())]
    MalformedPid { path: PathBuf, content: String },

    #[error("Registry auth dir {} does not match the expected name pattern", path.display())]
    AuthDirName { path: PathBuf },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid registry auth dir pattern: {0}")]
    AuthPattern(#[from] regex::Error),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Options error: {0}")]
    Options(String),
}

impl CleanupError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanupError>;
