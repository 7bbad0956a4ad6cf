#![allow(missing_docs)]

use std::{error::Error, fmt};

use kefex_project::ProjectError;

use crate::DatapoolKind;

#[derive(Debug, Clone)]
pub enum ImportError {
    InvalidKind { kind: DatapoolKind },
    Project(ProjectError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::InvalidKind { kind } => {
                write!(f, "cannot import into a {:?} datapool", kind)
            }
            ImportError::Project(error) => write!(f, "{}", error),
        }
    }
}

impl Error for ImportError {}

impl From<ProjectError> for ImportError {
    fn from(v: ProjectError) -> Self {
        Self::Project(v)
    }
}
