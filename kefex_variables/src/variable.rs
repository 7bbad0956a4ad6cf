//! One named, typed, byte-buffer-backed variable with range, access and
//! default-set information.

use std::fmt;

use kefex_data_type::{bits, KefexType};

use crate::{Crc16, VariableError};

/// Number of caller access groups.
pub const NUM_ACCESS_GROUPS: usize = 10;

/// Maximum number of comment languages a project may carry.
pub const MAX_COMMENT_LANGUAGES: usize = 5;

/// Permission of one access group for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRight {
    /// Full read and write access.
    ReadWrite,
    /// Read access only.
    ReadOnly,
    /// Write access only.
    WriteOnly,
    /// The variable is not visible to the group.
    Invisible,
}

impl AccessRight {
    /// Parse the keyword used in `.ram` files.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_uppercase().as_str() {
            "RW" => Some(Self::ReadWrite),
            "RO" => Some(Self::ReadOnly),
            "WO" => Some(Self::WriteOnly),
            "INV" => Some(Self::Invisible),
            _ => None,
        }
    }

    /// The keyword written to `.ram` files.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::ReadWrite => "RW",
            Self::ReadOnly => "RO",
            Self::WriteOnly => "WO",
            Self::Invisible => "INV",
        }
    }

    // Permission ranking for effective-access resolution: RW > WO > RO.
    fn rank(self) -> u8 {
        match self {
            Self::ReadWrite => 3,
            Self::WriteOnly => 2,
            Self::ReadOnly => 1,
            Self::Invisible => 0,
        }
    }
}

impl Default for AccessRight {
    fn default() -> Self {
        Self::ReadWrite
    }
}

impl fmt::Display for AccessRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// The Matlab/Simulink class of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableClass {
    /// A measured signal.
    Signal,
    /// A tunable parameter.
    Parameter,
}

impl VariableClass {
    /// Parse the keyword used in `.ram` files.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_uppercase().as_str() {
            "SIGNAL" => Some(Self::Signal),
            "PARAMETER" => Some(Self::Parameter),
            _ => None,
        }
    }
}

impl Default for VariableClass {
    fn default() -> Self {
        Self::Signal
    }
}

/// Default cyclic transmission configuration of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransmissionDefaults {
    /// Raw transmission type tag (0 = no cyclic transmission).
    pub transmission_type: u8,
    /// Cyclic interval in milliseconds.
    pub interval_ms: u32,
    /// Lower hysteresis threshold.
    pub hysteresis_lower: i64,
    /// Upper hysteresis threshold.
    pub hysteresis_upper: i64,
}

/// One named, typed variable backed by little-endian byte buffers.
///
/// The value, min and max buffers and every default set always share the same
/// length; [TypedVariable::set_size] is the only way that length changes.
#[derive(Debug, Clone)]
pub struct TypedVariable {
    /// Variable name, unique within its list.
    pub name: String,
    /// Physical unit text.
    pub unit: String,
    /// Per-language comments, at most [MAX_COMMENT_LANGUAGES] entries.
    pub comments: Vec<String>,
    /// Matlab/Simulink class.
    pub class: VariableClass,
    /// Address of the variable on the target.
    pub address: u32,
    var_type: KefexType,
    value: Vec<u8>,
    min: Vec<u8>,
    max: Vec<u8>,
    defaults: Vec<Vec<u8>>,
    /// Per-group access rights.
    pub access: [AccessRight; NUM_ACCESS_GROUPS],
    /// True if the variable lives in RAM, false for function-call access.
    pub location_is_ram: bool,
    /// Default cyclic transmission configuration.
    pub transmission: TransmissionDefaults,
    /// Scaling factor in fixed-point percent (10000 = 100%).
    pub scaling_factor: i32,
    /// Number of digits shown after the decimal point.
    pub scaling_digits: u8,

    // Transient runtime state, not part of the persisted definition.
    /// True once the value buffer holds data read from a target.
    pub current_value_valid: bool,
    /// True if the value was changed since the last write-back.
    pub changed: bool,
    /// True if `timestamp` is valid.
    pub timestamped: bool,
    /// Target timestamp of the last value update.
    pub timestamp: u32,
    /// True while the variable is part of a cyclic transmission.
    pub cyclic_active: bool,
    /// Access right resolved by [TypedVariable::recalc_effective_access].
    pub effective_access: AccessRight,
}

impl TypedVariable {
    /// Create an empty variable: size 0, type "no variable".
    pub fn new() -> Self {
        Self {
            name: String::new(),
            unit: String::new(),
            comments: Vec::new(),
            class: VariableClass::default(),
            address: 0,
            var_type: KefexType::NoVar,
            value: Vec::new(),
            min: Vec::new(),
            max: Vec::new(),
            defaults: Vec::new(),
            access: [AccessRight::default(); NUM_ACCESS_GROUPS],
            location_is_ram: true,
            transmission: TransmissionDefaults::default(),
            scaling_factor: 10000,
            scaling_digits: 0,
            current_value_valid: false,
            changed: false,
            timestamped: false,
            timestamp: 0,
            cyclic_active: false,
            effective_access: AccessRight::ReadWrite,
        }
    }

    /// The variable's data type.
    pub fn var_type(&self) -> KefexType {
        self.var_type
    }

    /// Set the data type. Buffer sizes are not touched; loaders set the type
    /// before sizing the buffers with [TypedVariable::set_size].
    pub fn set_type(&mut self, var_type: KefexType) {
        self.var_type = var_type;
    }

    /// The size of the value buffer in bytes.
    pub fn size(&self) -> usize {
        self.value.len()
    }

    /// Resize the value, min and max buffers and every default set to `size`
    /// bytes and zero the value.
    ///
    /// A no-op if the size is unchanged. The old value content is never
    /// preserved across a size change.
    pub fn set_size(&mut self, size: usize) {
        if size == self.value.len() {
            return;
        }
        self.value = vec![0; size];
        self.min.resize(size, 0);
        self.max.resize(size, 0);
        for default in &mut self.defaults {
            default.resize(size, 0);
        }
    }

    /// Number of default value sets.
    pub fn default_count(&self) -> usize {
        self.defaults.len()
    }

    /// Resize the default-set vector.
    ///
    /// Normally driven by the owning list so that all member variables stay
    /// in lockstep.
    pub fn set_default_count(&mut self, count: usize) {
        let size = self.value.len();
        self.defaults.resize_with(count, || vec![0; size]);
    }

    /// Number of elements: the element count for arrays, 1 for scalars.
    pub fn num_elements(&self) -> usize {
        if self.var_type.is_array() {
            let element_size = self.var_type.element_size();
            if element_size == 0 {
                0
            } else {
                self.value.len() / element_size
            }
        } else {
            1
        }
    }

    /// The raw value buffer.
    pub fn value_bytes(&self) -> &[u8] {
        &self.value
    }

    /// The raw minimum buffer.
    pub fn min_bytes(&self) -> &[u8] {
        &self.min
    }

    /// The raw maximum buffer.
    pub fn max_bytes(&self) -> &[u8] {
        &self.max
    }

    /// The raw buffer of one default set.
    pub fn default_bytes(&self, set: usize) -> Result<&[u8], VariableError> {
        self.defaults
            .get(set)
            .map(Vec::as_slice)
            .ok_or(VariableError::DefaultSetOutOfRange {
                index: set,
                count: self.defaults.len(),
            })
    }

    /// Copy raw bytes into the value buffer.
    ///
    /// At most `self.size()` bytes are copied; the copied count is returned.
    pub fn copy_into_value(&mut self, bytes: &[u8]) -> usize {
        let count = bytes.len().min(self.value.len());
        self.value[..count].copy_from_slice(&bytes[..count]);
        count
    }

    /// Copy raw bytes into one default set, bounded by the buffer size.
    pub fn copy_into_default(&mut self, set: usize, bytes: &[u8]) -> Result<usize, VariableError> {
        let count = self.defaults.len();
        let default = self
            .defaults
            .get_mut(set)
            .ok_or(VariableError::DefaultSetOutOfRange { index: set, count })?;
        let copied = bytes.len().min(default.len());
        default[..copied].copy_from_slice(&bytes[..copied]);
        Ok(copied)
    }

    /// Zero-fill the value buffer and drop the valid flag.
    pub fn clear_value(&mut self) {
        self.value.fill(0);
        self.current_value_valid = false;
    }

    /// Zero-fill one default set.
    pub fn clear_default(&mut self, set: usize) -> Result<(), VariableError> {
        let count = self.defaults.len();
        let default = self
            .defaults
            .get_mut(set)
            .ok_or(VariableError::DefaultSetOutOfRange { index: set, count })?;
        default.fill(0);
        Ok(())
    }

    /// True if the type's elements hold numeric content.
    pub fn is_numeric(&self) -> bool {
        self.var_type.is_numeric()
    }

    /// True if the type is an array of scalar elements.
    pub fn is_array(&self) -> bool {
        self.var_type.is_array()
    }

    /// True if the type's elements are IEEE754 floats.
    pub fn is_float(&self) -> bool {
        self.var_type.is_float()
    }

    /// True for arrays of 8 bit unsigned ints (raw binary blobs).
    pub fn is_binary_array(&self) -> bool {
        self.var_type == KefexType::AUint8
    }

    /// True for arrays of 8 bit signed ints (the legacy "string" type).
    pub fn is_string_type(&self) -> bool {
        self.var_type == KefexType::ASint8
    }

    /// The whole value buffer read as a little-endian integer.
    ///
    /// Sizes 1, 2, 4 and 8 map to the matching integer width, sign-extended
    /// when the element base type is signed; any other size reads as 0.
    pub fn get_numeric(&self) -> i64 {
        read_le(&self.value, self.var_type.is_signed())
    }

    /// Write a little-endian integer across the whole value buffer.
    ///
    /// Sizes other than 1, 2, 4 and 8 silently perform no write.
    pub fn set_numeric(&mut self, value: i64) {
        write_le(&mut self.value, value);
        self.changed = true;
    }

    /// The whole value buffer reinterpreted as a float (size 4 or 8).
    pub fn get_float(&self) -> f64 {
        read_le_float(&self.value)
    }

    /// Write a float across the whole value buffer (size 4 or 8).
    pub fn set_float(&mut self, value: f64) {
        write_le_float(&mut self.value, value);
        self.changed = true;
    }

    /// One array element of the value buffer as an integer.
    pub fn get_numeric_element(&self, index: usize) -> Result<i64, VariableError> {
        let range = self.element_range(index)?;
        Ok(read_le(&self.value[range], self.var_type.is_signed()))
    }

    /// Write one array element of the value buffer as an integer.
    pub fn set_numeric_element(&mut self, index: usize, value: i64) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        write_le(&mut self.value[range], value);
        self.changed = true;
        Ok(())
    }

    /// One array element of the value buffer as a float.
    pub fn get_float_element(&self, index: usize) -> Result<f64, VariableError> {
        let range = self.element_range(index)?;
        Ok(read_le_float(&self.value[range]))
    }

    /// Write one array element of the value buffer as a float.
    pub fn set_float_element(&mut self, index: usize, value: f64) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        write_le_float(&mut self.value[range], value);
        self.changed = true;
        Ok(())
    }

    /// The value buffer decoded as text, up to the first NUL byte.
    pub fn get_string(&self) -> String {
        let end = self
            .value
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(self.value.len());
        String::from_utf8_lossy(&self.value[..end]).into_owned()
    }

    /// Encode text into the value buffer.
    ///
    /// If the text fits in `size - 1` bytes it is written with a NUL
    /// terminator and the remainder zeroed; otherwise exactly `size` raw
    /// bytes are copied with no terminator.
    pub fn set_string(&mut self, text: &str) {
        let size = self.value.len();
        if size == 0 {
            return;
        }
        let bytes = text.as_bytes();
        if bytes.len() < size {
            self.value[..bytes.len()].copy_from_slice(bytes);
            self.value[bytes.len()..].fill(0);
        } else {
            self.value.copy_from_slice(&bytes[..size]);
        }
        self.changed = true;
    }

    /// The whole minimum buffer as an integer (bit pattern for float types).
    pub fn get_min(&self) -> i64 {
        read_le(&self.min, self.var_type.is_signed())
    }

    /// Write the whole minimum buffer as an integer.
    pub fn set_min(&mut self, value: i64) {
        write_le(&mut self.min, value);
    }

    /// The whole maximum buffer as an integer (bit pattern for float types).
    pub fn get_max(&self) -> i64 {
        read_le(&self.max, self.var_type.is_signed())
    }

    /// Write the whole maximum buffer as an integer.
    pub fn set_max(&mut self, value: i64) {
        write_le(&mut self.max, value);
    }

    /// The whole minimum buffer reinterpreted as a float.
    pub fn get_min_float(&self) -> f64 {
        read_le_float(&self.min)
    }

    /// Write the whole minimum buffer as a float.
    pub fn set_min_float(&mut self, value: f64) {
        write_le_float(&mut self.min, value);
    }

    /// The whole maximum buffer reinterpreted as a float.
    pub fn get_max_float(&self) -> f64 {
        read_le_float(&self.max)
    }

    /// Write the whole maximum buffer as a float.
    pub fn set_max_float(&mut self, value: f64) {
        write_le_float(&mut self.max, value);
    }

    /// One element of the minimum buffer as an integer.
    pub fn get_min_element(&self, index: usize) -> Result<i64, VariableError> {
        let range = self.element_range(index)?;
        Ok(read_le(&self.min[range], self.var_type.is_signed()))
    }

    /// Write one element of the minimum buffer as an integer.
    pub fn set_min_element(&mut self, index: usize, value: i64) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        write_le(&mut self.min[range], value);
        Ok(())
    }

    /// One element of the maximum buffer as an integer.
    pub fn get_max_element(&self, index: usize) -> Result<i64, VariableError> {
        let range = self.element_range(index)?;
        Ok(read_le(&self.max[range], self.var_type.is_signed()))
    }

    /// Write one element of the maximum buffer as an integer.
    pub fn set_max_element(&mut self, index: usize, value: i64) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        write_le(&mut self.max[range], value);
        Ok(())
    }

    /// One element of the minimum buffer as a float.
    pub fn get_min_float_element(&self, index: usize) -> Result<f64, VariableError> {
        let range = self.element_range(index)?;
        Ok(read_le_float(&self.min[range]))
    }

    /// Write one element of the minimum buffer as a float.
    pub fn set_min_float_element(&mut self, index: usize, value: f64) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        write_le_float(&mut self.min[range], value);
        Ok(())
    }

    /// One element of the maximum buffer as a float.
    pub fn get_max_float_element(&self, index: usize) -> Result<f64, VariableError> {
        let range = self.element_range(index)?;
        Ok(read_le_float(&self.max[range]))
    }

    /// Write one element of the maximum buffer as a float.
    pub fn set_max_float_element(&mut self, index: usize, value: f64) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        write_le_float(&mut self.max[range], value);
        Ok(())
    }

    /// One default set read whole as an integer.
    pub fn get_default(&self, set: usize) -> Result<i64, VariableError> {
        let default = self.default_bytes(set)?;
        Ok(read_le(default, self.var_type.is_signed()))
    }

    /// Write one default set whole as an integer.
    pub fn set_default(&mut self, set: usize, value: i64) -> Result<(), VariableError> {
        let count = self.defaults.len();
        let default = self
            .defaults
            .get_mut(set)
            .ok_or(VariableError::DefaultSetOutOfRange { index: set, count })?;
        write_le(default, value);
        Ok(())
    }

    /// One default set read whole as a float.
    pub fn get_default_float(&self, set: usize) -> Result<f64, VariableError> {
        let default = self.default_bytes(set)?;
        Ok(read_le_float(default))
    }

    /// Write one default set whole as a float.
    pub fn set_default_float(&mut self, set: usize, value: f64) -> Result<(), VariableError> {
        let count = self.defaults.len();
        let default = self
            .defaults
            .get_mut(set)
            .ok_or(VariableError::DefaultSetOutOfRange { index: set, count })?;
        write_le_float(default, value);
        Ok(())
    }

    /// One element of a default set as an integer.
    pub fn get_default_element(&self, set: usize, index: usize) -> Result<i64, VariableError> {
        let range = self.element_range(index)?;
        let default = self.default_bytes(set)?;
        Ok(read_le(&default[range], self.var_type.is_signed()))
    }

    /// Write one element of a default set as an integer.
    pub fn set_default_element(
        &mut self,
        set: usize,
        index: usize,
        value: i64,
    ) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        let count = self.defaults.len();
        let default = self
            .defaults
            .get_mut(set)
            .ok_or(VariableError::DefaultSetOutOfRange { index: set, count })?;
        write_le(&mut default[range], value);
        Ok(())
    }

    /// One element of a default set as a float.
    pub fn get_default_float_element(
        &self,
        set: usize,
        index: usize,
    ) -> Result<f64, VariableError> {
        let range = self.element_range(index)?;
        let default = self.default_bytes(set)?;
        Ok(read_le_float(&default[range]))
    }

    /// Write one element of a default set as a float.
    pub fn set_default_float_element(
        &mut self,
        set: usize,
        index: usize,
        value: f64,
    ) -> Result<(), VariableError> {
        let range = self.element_range(index)?;
        let count = self.defaults.len();
        let default = self
            .defaults
            .get_mut(set)
            .ok_or(VariableError::DefaultSetOutOfRange { index: set, count })?;
        write_le_float(&mut default[range], value);
        Ok(())
    }

    /// Check the current value against the min/max range.
    ///
    /// Arrays are checked per element and fail on the first out-of-range
    /// element. NaN and infinite float values are always out of range.
    pub fn check_min_max(&self) -> bool {
        if !self.is_numeric() || self.value.is_empty() {
            return true;
        }
        if self.is_array() {
            let element_size = self.var_type.element_size();
            if element_size == 0 {
                return true;
            }
            for index in 0..self.value.len() / element_size {
                let range = index * element_size..(index + 1) * element_size;
                if !self.check_range(range) {
                    return false;
                }
            }
            true
        } else {
            self.check_range(0..self.value.len())
        }
    }

    fn check_range(&self, range: std::ops::Range<usize>) -> bool {
        if self.is_float() {
            let value = read_le_float(&self.value[range.clone()]);
            if !value.is_finite() {
                return false;
            }
            let min = read_le_float(&self.min[range.clone()]);
            let max = read_le_float(&self.max[range]);
            min <= value && value <= max
        } else {
            let signed = self.var_type.is_signed();
            let value = read_le(&self.value[range.clone()], signed);
            let min = read_le(&self.min[range.clone()], signed);
            let max = read_le(&self.max[range], signed);
            min <= value && value <= max
        }
    }

    /// Resolve the caller's effective access from its group memberships.
    ///
    /// The best-ranked permission across matching groups wins (RW > WO > RO,
    /// INVISIBLE ignored); membership in no group yields INVISIBLE. The
    /// result is also stored in `effective_access`.
    pub fn recalc_effective_access(
        &mut self,
        memberships: &[bool; NUM_ACCESS_GROUPS],
    ) -> AccessRight {
        let mut best = AccessRight::Invisible;
        for (group, &member) in memberships.iter().enumerate() {
            if !member {
                continue;
            }
            let right = self.access[group];
            if right == AccessRight::Invisible {
                continue;
            }
            if right.rank() > best.rank() {
                best = right;
            }
            if best == AccessRight::ReadWrite {
                break;
            }
        }
        self.effective_access = best;
        best
    }

    /// Feed the variable's definition into a running CRC.
    ///
    /// With `skip_value` the current runtime value is excluded so the CRC
    /// tracks definition identity only.
    pub fn calc_crc_over_entry(&self, crc: &mut Crc16, skip_value: bool) {
        crc.update_str(&self.name);
        crc.update_u32(self.address);
        crc.update_u32(self.value.len() as u32);
        crc.update_byte(self.var_type.tag());
        crc.update(&self.min);
        crc.update(&self.max);
        for right in &self.access {
            crc.update_byte(right.rank());
        }
        for default in &self.defaults {
            crc.update(default);
        }
        if !skip_value {
            crc.update(&self.value);
        }
        crc.update_u32(self.scaling_factor as u32);
        crc.update_byte(self.scaling_digits);
        crc.update_str(&self.unit);
        for comment in &self.comments {
            crc.update_str(comment);
        }
        crc.update_byte(match self.class {
            VariableClass::Signal => 0,
            VariableClass::Parameter => 1,
        });
        crc.update_byte(u8::from(self.location_is_ram));
        crc.update_byte(self.transmission.transmission_type);
        crc.update_u32(self.transmission.interval_ms);
        crc.update_u64(self.transmission.hysteresis_lower as u64);
        crc.update_u64(self.transmission.hysteresis_upper as u64);
    }

    /// Format the current value for display.
    pub fn format_value(&self) -> String {
        if self.is_string_type() {
            return self.get_string();
        }
        if self.is_array() {
            let parts: Vec<String> = (0..self.num_elements())
                .map(|index| {
                    if self.is_float() {
                        let value = self.get_float_element(index).unwrap_or(0.0);
                        format!("{:.*}", usize::from(self.scaling_digits), value)
                    } else {
                        self.get_numeric_element(index).unwrap_or(0).to_string()
                    }
                })
                .collect();
            parts.join(";")
        } else if self.is_float() {
            format!("{:.*}", usize::from(self.scaling_digits), self.get_float())
        } else {
            self.get_numeric().to_string()
        }
    }

    fn element_range(&self, index: usize) -> Result<std::ops::Range<usize>, VariableError> {
        let element_size = self.var_type.element_size();
        let start = index.checked_mul(element_size).unwrap_or(usize::MAX);
        let end = start.checked_add(element_size).unwrap_or(usize::MAX);
        if element_size == 0 || end > self.value.len() {
            return Err(VariableError::ElementOutOfRange {
                index,
                element_size,
                buffer_size: self.value.len(),
            });
        }
        Ok(start..end)
    }
}

impl Default for TypedVariable {
    fn default() -> Self {
        Self::new()
    }
}

// Little-endian size-driven packing shared by all buffers. Sizes other than
// 1, 2, 4 and 8 read as zero and ignore writes.

fn read_le(buf: &[u8], signed: bool) -> i64 {
    match buf.len() {
        1 => {
            if signed {
                i64::from(buf[0] as i8)
            } else {
                i64::from(buf[0])
            }
        }
        2 => {
            let raw = u16::from_le_bytes([buf[0], buf[1]]);
            if signed {
                i64::from(raw as i16)
            } else {
                i64::from(raw)
            }
        }
        4 => {
            let raw = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
            if signed {
                i64::from(raw as i32)
            } else {
                i64::from(raw)
            }
        }
        8 => i64::from_le_bytes([
            buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
        ]),
        _ => 0,
    }
}

fn write_le(buf: &mut [u8], value: i64) {
    match buf.len() {
        1 => buf.copy_from_slice(&(value as u8).to_le_bytes()),
        2 => buf.copy_from_slice(&(value as u16).to_le_bytes()),
        4 => buf.copy_from_slice(&(value as u32).to_le_bytes()),
        8 => buf.copy_from_slice(&value.to_le_bytes()),
        _ => {}
    }
}

fn read_le_float(buf: &[u8]) -> f64 {
    match buf.len() {
        4 => {
            let raw = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
            f64::from(bits::f32_from_bits(raw))
        }
        8 => {
            let raw = u64::from_le_bytes([
                buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
            ]);
            bits::f64_from_bits(raw)
        }
        _ => 0.0,
    }
}

fn write_le_float(buf: &mut [u8], value: f64) {
    match buf.len() {
        4 => buf.copy_from_slice(&bits::f32_to_bits(value as f32).to_le_bytes()),
        8 => buf.copy_from_slice(&bits::f64_to_bits(value).to_le_bytes()),
        _ => {}
    }
}
