use std::path::PathBuf;
use thiserror::Error;

use crate::exitcode;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Directory not found: {0}")]
    DirNotFound(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Missing configuration marker: {0}")]
    MissingMarker(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: malformed category description (expected 'category: text')")]
    MalformedDescription { path: PathBuf, line: usize },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    /// Exit code for this error (BSD sysexits).
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::DirNotFound(_) | ReportError::FileNotFound(_) => exitcode::NOINPUT,
            ReportError::MissingMarker(_) => exitcode::CONFIG,
            ReportError::MalformedDescription { .. } => exitcode::DATAERR,
            ReportError::Create { .. } => exitcode::CANTCREAT,
            ReportError::Read { .. } | ReportError::Write { .. } | ReportError::Walk(_) => {
                exitcode::IOERR
            }
        }
    }

    /// Configuration errors get a usage hint on stderr before exiting.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ReportError::DirNotFound(_)
                | ReportError::FileNotFound(_)
                | ReportError::MissingMarker(_)
        )
    }
}
