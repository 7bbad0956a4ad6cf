//! The Datapool output shape populated by the importer.

use serde::{Deserialize, Serialize};

/// Kind of the destination datapool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatapoolKind {
    /// Diagnostic data in volatile RAM.
    Diagnostic,
    /// Non-volatile (EEPROM) parameters.
    NonVolatile,
    /// Communication signal pools; not a valid import destination.
    Communication,
}

/// Scalar type of a datapool element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ElementType {
    Uint8,
    Sint8,
    Uint16,
    Sint16,
    Uint32,
    Sint32,
    Uint64,
    Sint64,
    Float32,
    Float64,
}

/// One scalar value of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElementValue {
    /// Integer content.
    Int(i64),
    /// Float content.
    Float(f64),
}

/// Access mode of a datapool element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementAccess {
    /// Readable and writable.
    ReadWrite,
    /// Read-only.
    ReadOnly,
}

/// One element of a datapool list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatapoolElement {
    /// Element name.
    pub name: String,
    /// Element comment.
    pub comment: String,
    /// Scalar type of the element (or of one array entry).
    pub element_type: ElementType,
    /// True if the element is an array.
    pub is_array: bool,
    /// Number of array entries (1 for scalars).
    pub array_size: usize,
    /// Minimum value content, one entry per array entry.
    pub min: Vec<ElementValue>,
    /// Maximum value content, one entry per array entry.
    pub max: Vec<ElementValue>,
    /// Per-data-set value content, indexed `[data_set][array_entry]`.
    pub data_set_values: Vec<Vec<ElementValue>>,
    /// Scaling factor applied to raw values.
    pub factor: f64,
    /// Scaling offset applied to raw values.
    pub offset: f64,
    /// Physical unit text.
    pub unit: String,
    /// Access mode.
    pub access: ElementAccess,
    /// True if changes are transmitted event-driven rather than polled.
    pub event_flag: bool,
}

/// One list of a datapool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatapoolList {
    /// List name.
    pub name: String,
    /// List comment.
    pub comment: String,
    /// Display names of the data sets.
    pub data_set_names: Vec<String>,
    /// The elements of the list.
    pub elements: Vec<DatapoolElement>,
}

/// A datapool: the modern representation of a legacy variable project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datapool {
    /// Datapool name.
    pub name: String,
    /// Datapool comment.
    pub comment: String,
    /// Version triple.
    pub version: [u16; 3],
    /// Kind of the datapool.
    pub kind: DatapoolKind,
    /// The lists of the datapool.
    pub lists: Vec<DatapoolList>,
}

impl Datapool {
    /// Serialize the datapool as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
