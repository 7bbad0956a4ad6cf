//! The 22 KEFEX data types and their static descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of defined KEFEX type tags, including the "no variable" sentinel.
pub const NUM_TYPE_TAGS: u8 = 22;

/// A KEFEX data type, identified on disk by its raw tag byte.
///
/// Tag 0 marks an unconfigured variable and tag 8 is the checksum placeholder
/// used by on-target list layouts; neither is present in loaded variable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KefexType {
    /// No variable (unconfigured slot).
    NoVar,
    /// 8 bit unsigned int.
    Uint8,
    /// 8 bit signed int.
    Sint8,
    /// 16 bit unsigned int.
    Uint16,
    /// 16 bit signed int.
    Sint16,
    /// 32 bit unsigned int.
    Uint32,
    /// 32 bit signed int.
    Sint32,
    /// 64 bit float.
    Float64,
    /// Checksum placeholder within a list layout.
    Crc,
    /// Array of 8 bit unsigned ints.
    AUint8,
    /// Array of 8 bit signed ints (the legacy "string" type).
    ASint8,
    /// Array of 16 bit unsigned ints.
    AUint16,
    /// Array of 16 bit signed ints.
    ASint16,
    /// Array of 32 bit unsigned ints.
    AUint32,
    /// Array of 32 bit signed ints.
    ASint32,
    /// Array of 64 bit floats.
    AFloat64,
    /// 64 bit unsigned int.
    Uint64,
    /// 64 bit signed int.
    Sint64,
    /// 32 bit float.
    Float32,
    /// Array of 64 bit unsigned ints.
    AUint64,
    /// Array of 64 bit signed ints.
    ASint64,
    /// Array of 32 bit floats.
    AFloat32,
}

/// Static description of a KEFEX data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// The canonical type name as written in project files.
    pub name: &'static str,
    /// True if the type is an array of scalar elements.
    pub is_array: bool,
    /// True if the type's elements hold numeric content.
    pub is_numeric: bool,
    /// True if the type's elements are IEEE754 floats.
    pub is_float: bool,
    /// The scalar type of one element (self for scalar types).
    pub element_base_type: KefexType,
}

use KefexType::*;

const DESCRIPTORS: [TypeDescriptor; NUM_TYPE_TAGS as usize] = [
    descriptor("NOVAR", false, false, false, NoVar),
    descriptor("UINT8", false, true, false, Uint8),
    descriptor("SINT8", false, true, false, Sint8),
    descriptor("UINT16", false, true, false, Uint16),
    descriptor("SINT16", false, true, false, Sint16),
    descriptor("UINT32", false, true, false, Uint32),
    descriptor("SINT32", false, true, false, Sint32),
    descriptor("FLOAT64", false, true, true, Float64),
    descriptor("CRC", false, false, false, Crc),
    descriptor("AUINT8", true, true, false, Uint8),
    descriptor("ASINT8", true, true, false, Sint8),
    descriptor("AUINT16", true, true, false, Uint16),
    descriptor("ASINT16", true, true, false, Sint16),
    descriptor("AUINT32", true, true, false, Uint32),
    descriptor("ASINT32", true, true, false, Sint32),
    descriptor("AFLOAT64", true, true, true, Float64),
    descriptor("UINT64", false, true, false, Uint64),
    descriptor("SINT64", false, true, false, Sint64),
    descriptor("FLOAT32", false, true, true, Float32),
    descriptor("AUINT64", true, true, false, Uint64),
    descriptor("ASINT64", true, true, false, Sint64),
    descriptor("AFLOAT32", true, true, true, Float32),
];

const fn descriptor(
    name: &'static str,
    is_array: bool,
    is_numeric: bool,
    is_float: bool,
    element_base_type: KefexType,
) -> TypeDescriptor {
    TypeDescriptor {
        name,
        is_array,
        is_numeric,
        is_float,
        element_base_type,
    }
}

impl KefexType {
    /// Return the type for a raw tag byte.
    ///
    /// Out-of-range tags resolve to [KefexType::NoVar] rather than panicking.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Uint8,
            2 => Sint8,
            3 => Uint16,
            4 => Sint16,
            5 => Uint32,
            6 => Sint32,
            7 => Float64,
            8 => Crc,
            9 => AUint8,
            10 => ASint8,
            11 => AUint16,
            12 => ASint16,
            13 => AUint32,
            14 => ASint32,
            15 => AFloat64,
            16 => Uint64,
            17 => Sint64,
            18 => Float32,
            19 => AUint64,
            20 => ASint64,
            21 => AFloat32,
            _ => NoVar,
        }
    }

    /// The raw tag byte used in project files.
    pub fn tag(self) -> u8 {
        match self {
            NoVar => 0,
            Uint8 => 1,
            Sint8 => 2,
            Uint16 => 3,
            Sint16 => 4,
            Uint32 => 5,
            Sint32 => 6,
            Float64 => 7,
            Crc => 8,
            AUint8 => 9,
            ASint8 => 10,
            AUint16 => 11,
            ASint16 => 12,
            AUint32 => 13,
            ASint32 => 14,
            AFloat64 => 15,
            Uint64 => 16,
            Sint64 => 17,
            Float32 => 18,
            AUint64 => 19,
            ASint64 => 20,
            AFloat32 => 21,
        }
    }

    /// The static descriptor for the type.
    pub fn descriptor(self) -> &'static TypeDescriptor {
        &DESCRIPTORS[self.tag() as usize]
    }

    /// Return the type matching one of the legacy textual aliases used by
    /// `.ram` files that predate the numeric `TYPE_INDEX` key.
    pub fn from_legacy_alias(alias: &str) -> Option<Self> {
        let kefex_type = match alias.trim().to_ascii_uppercase().as_str() {
            "BYTE" => Uint8,
            "CHAR" => Sint8,
            "WORD" => Uint16,
            "INT" => Sint16,
            "DWORD" => Uint32,
            "LONG" => Sint32,
            "FLOAT" => Float64,
            "STRING" | "ARRAY" => ASint8,
            "AOBYTE" => AUint8,
            _ => return None,
        };
        Some(kefex_type)
    }

    /// True if the type is an array of scalar elements.
    pub fn is_array(self) -> bool {
        self.descriptor().is_array
    }

    /// True if the type's elements hold numeric content.
    pub fn is_numeric(self) -> bool {
        self.descriptor().is_numeric
    }

    /// True if the type's elements are IEEE754 floats.
    pub fn is_float(self) -> bool {
        self.descriptor().is_float
    }

    /// The scalar type of one element (self for scalar types).
    pub fn element_base_type(self) -> Self {
        self.descriptor().element_base_type
    }

    /// The size of one element in bytes (0 for the non-value tags).
    pub fn element_size(self) -> usize {
        match self.element_base_type() {
            Uint8 | Sint8 => 1,
            Uint16 | Sint16 => 2,
            Uint32 | Sint32 | Float32 => 4,
            Uint64 | Sint64 | Float64 => 8,
            NoVar | Crc => 0,
            // Array tags never appear as their own element base type.
            _ => 0,
        }
    }

    /// True if the type's elements are signed (signed ints or floats).
    pub fn is_signed(self) -> bool {
        matches!(
            self.element_base_type(),
            Sint8 | Sint16 | Sint32 | Sint64 | Float32 | Float64
        )
    }

    /// The byte size a legacy file without a `SIZE` key implies: one element.
    pub fn default_size(self) -> usize {
        self.element_size()
    }

    /// The smallest value an element of this type can hold, as an `i64`.
    ///
    /// For float types the result is the `f64` bit pattern of the range limit,
    /// matching how `.ram` files store float min/max values.
    pub fn range_min(self) -> i64 {
        match self.element_base_type() {
            Sint8 => i64::from(i8::MIN),
            Sint16 => i64::from(i16::MIN),
            Sint32 => i64::from(i32::MIN),
            Sint64 => i64::MIN,
            Float32 => i64::from_le_bytes(f64::from(f32::MIN).to_le_bytes()),
            Float64 => i64::from_le_bytes(f64::MIN.to_le_bytes()),
            _ => 0,
        }
    }

    /// The largest value an element of this type can hold, as an `i64`.
    ///
    /// See [KefexType::range_min] for the float encoding.
    pub fn range_max(self) -> i64 {
        match self.element_base_type() {
            Uint8 => i64::from(u8::MAX),
            Sint8 => i64::from(i8::MAX),
            Uint16 => i64::from(u16::MAX),
            Sint16 => i64::from(i16::MAX),
            Uint32 => i64::from(u32::MAX),
            Sint32 => i64::from(i32::MAX),
            Uint64 => u64::MAX as i64,
            Sint64 => i64::MAX,
            Float32 => i64::from_le_bytes(f64::from(f32::MAX).to_le_bytes()),
            Float64 => i64::from_le_bytes(f64::MAX.to_le_bytes()),
            _ => 0,
        }
    }
}

impl Default for KefexType {
    fn default() -> Self {
        NoVar
    }
}

impl fmt::Display for KefexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor().name)
    }
}
