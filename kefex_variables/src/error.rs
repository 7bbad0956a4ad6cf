#![allow(missing_docs)]

use std::{error::Error, fmt};

#[derive(Debug, Clone)]
pub enum VariableError {
    ElementOutOfRange {
        index: usize,
        element_size: usize,
        buffer_size: usize,
    },
    DefaultSetOutOfRange {
        index: usize,
        count: usize,
    },
}

impl fmt::Display for VariableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableError::ElementOutOfRange {
                index,
                element_size,
                buffer_size,
            } => write!(
                f,
                "element index {} with element size {} exceeds buffer of {} bytes",
                index, element_size, buffer_size
            ),
            VariableError::DefaultSetOutOfRange { index, count } => {
                write!(f, "default set index {} out of range (count {})", index, count)
            }
        }
    }
}

impl Error for VariableError {}
