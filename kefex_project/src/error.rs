#![allow(missing_docs)]

use std::{error::Error, fmt, io, path::PathBuf, sync::Arc};

use kefex_variables::VariableError;

#[derive(Debug, Clone)]
pub enum ProjectError {
    CannotOpen {
        path: PathBuf,
        error: Arc<io::Error>,
    },
    FormatInvalid {
        path: PathBuf,
        reason: String,
    },
    Inconsistent {
        reason: String,
    },
    ResourceExhausted {
        path: PathBuf,
        reason: String,
    },
    VariableError(VariableError),
}

impl ProjectError {
    pub(crate) fn format_invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FormatInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn cannot_open(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::CannotOpen {
            path: path.into(),
            error: Arc::new(error),
        }
    }
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::CannotOpen { path, error } => {
                write!(f, "cannot open {}: {}", path.display(), error)
            }
            ProjectError::FormatInvalid { path, reason } => {
                write!(f, "invalid format in {}: {}", path.display(), reason)
            }
            ProjectError::Inconsistent { reason } => {
                write!(f, "inconsistent project configuration: {}", reason)
            }
            ProjectError::ResourceExhausted { path, reason } => {
                write!(f, "out of resources reading {}: {}", path.display(), reason)
            }
            ProjectError::VariableError(error) => write!(f, "{}", error),
        }
    }
}

impl Error for ProjectError {}

impl From<VariableError> for ProjectError {
    fn from(v: VariableError) -> Self {
        Self::VariableError(v)
    }
}
