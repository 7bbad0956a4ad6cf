//! Loader for compressed binary `.dat` default-value files.

use std::{fs, path::Path};

use kefex_variables::VariableListCollection;

use crate::{codec, ProjectError};

/// Mandatory first block: one value payload per variable.
const BLOCK_VALUES: u16 = 0x0100;

/// Optional trailing block: multiple named default sets per variable.
const BLOCK_NAMED_DEFAULTS: u16 = 0x0101;

/// Upper bound on the decompressed payload size a header may declare.
///
/// Guards buffer allocation against corrupt length headers; real project
/// files stay far below this.
const MAX_UNCOMPRESSED_LEN: usize = 256 * 1024 * 1024;

/// Outcome of a `.dat` load.
///
/// Unmatched names are not fatal: values for lists or variables that are not
/// part of the in-memory collection are skipped and counted here.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatLoadOutcome {
    /// Lists named in the file but absent from the collection.
    pub unmatched_lists: usize,
    /// Variables named in the file but absent from their list.
    pub unmatched_variables: usize,
}

impl DatLoadOutcome {
    /// True if any name in the file had no in-memory counterpart.
    pub fn is_partial(&self) -> bool {
        self.unmatched_lists > 0 || self.unmatched_variables > 0
    }
}

/// Load a `.dat` file and merge its values into the collection's default
/// sets.
///
/// The targeted defaults are cleared before parsing so a partial second load
/// cannot leave mixed old/new state. Matching is by case-insensitive name.
pub fn load_dat(
    path: &Path,
    expected_device: &str,
    collection: &mut VariableListCollection,
) -> Result<DatLoadOutcome, ProjectError> {
    let raw = fs::read(path).map_err(|e| ProjectError::cannot_open(path, e))?;
    if raw.len() < 4 {
        return Err(ProjectError::format_invalid(
            path,
            "file too short for length header",
        ));
    }
    let uncompressed_len = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
    if uncompressed_len > MAX_UNCOMPRESSED_LEN {
        return Err(ProjectError::ResourceExhausted {
            path: path.to_path_buf(),
            reason: format!("header declares {} uncompressed bytes", uncompressed_len),
        });
    }
    let payload = codec::decompress(&raw[4..], uncompressed_len, path)?;
    let mut reader = Reader::new(&payload, path);

    let tag = reader.read_u16()?;
    if tag != BLOCK_VALUES {
        return Err(ProjectError::format_invalid(
            path,
            format!("unexpected block id 0x{:04X}, expected 0x{:04X}", tag, BLOCK_VALUES),
        ));
    }
    let device = reader.read_string()?;
    if !device.eq_ignore_ascii_case(expected_device) {
        log::error!(
            "{} is for device \"{}\", expected \"{}\"",
            path.display(),
            device,
            expected_device
        );
        return Err(ProjectError::format_invalid(
            path,
            format!("device \"{}\" does not match \"{}\"", device, expected_device),
        ));
    }

    collection.clear_defaults();
    if collection.default_set_names.is_empty() {
        collection.default_set_names.push("DEFAULT_0".to_string());
    }
    collection.set_default_count(collection.default_set_names.len() as u16);

    let mut outcome = DatLoadOutcome::default();
    let list_count = reader.read_u16()?;
    // Per-list variable counts in file order, checked against the trailing
    // block if one is present.
    let mut variable_counts = Vec::with_capacity(usize::from(list_count));

    for _ in 0..list_count {
        let list_name = reader.read_string()?;
        let variable_count = reader.read_u16()?;
        variable_counts.push(variable_count);
        let list_found = collection.list_by_name_ignore_case(&list_name).is_some();
        if !list_found {
            outcome.unmatched_lists += 1;
        }
        for _ in 0..variable_count {
            let variable_name = reader.read_string()?;
            let declared_size = reader.read_u32()? as usize;
            let bytes = reader.read_bytes(declared_size)?.to_vec();
            if !list_found {
                continue;
            }
            let list = match collection.list_by_name_ignore_case(&list_name) {
                Some(list) => list,
                None => continue,
            };
            match list.variable_by_name_ignore_case(&variable_name) {
                Some(variable) => {
                    variable.copy_into_default(0, &bytes)?;
                }
                None => outcome.unmatched_variables += 1,
            }
        }
    }

    // Trailing blocks are sized and self-describing; unknown ids are skipped
    // for forward compatibility.
    while reader.remaining() > 0 {
        let block_id = reader.read_u16()?;
        let block_len = reader.read_u32()? as usize;
        if block_id != BLOCK_NAMED_DEFAULTS {
            reader.read_bytes(block_len)?;
            continue;
        }
        parse_named_defaults(&mut reader, collection, &variable_counts, &mut outcome, path)?;
    }

    if outcome.is_partial() {
        log::warn!(
            "{}: {} list name(s) and {} variable name(s) not found in project",
            path.display(),
            outcome.unmatched_lists,
            outcome.unmatched_variables
        );
    }
    Ok(outcome)
}

/// Parse block 0x0101: named default sets, with list/variable counts that
/// must match the first block.
fn parse_named_defaults(
    reader: &mut Reader<'_>,
    collection: &mut VariableListCollection,
    variable_counts: &[u16],
    outcome: &mut DatLoadOutcome,
    path: &Path,
) -> Result<(), ProjectError> {
    let set_count = reader.read_u16()?;
    let mut set_names = Vec::with_capacity(usize::from(set_count));
    for _ in 0..set_count {
        set_names.push(reader.read_string()?);
    }

    let list_count = reader.read_u16()? as usize;
    if list_count != variable_counts.len() {
        return Err(ProjectError::Inconsistent {
            reason: format!(
                "{}: default-set block names {} lists, value block has {}",
                path.display(),
                list_count,
                variable_counts.len()
            ),
        });
    }

    collection.default_set_names = set_names;
    collection.set_default_count(set_count);

    for list_position in 0..list_count {
        let list_name = reader.read_string()?;
        let variable_count = reader.read_u16()?;
        if variable_count != variable_counts[list_position] {
            return Err(ProjectError::Inconsistent {
                reason: format!(
                    "{}: default-set block names {} variables in list \"{}\", value block has {}",
                    path.display(),
                    variable_count,
                    list_name,
                    variable_counts[list_position]
                ),
            });
        }
        let list_found = collection.list_by_name_ignore_case(&list_name).is_some();
        for _ in 0..variable_count {
            let variable_name = reader.read_string()?;
            let declared_size = reader.read_u32()? as usize;
            for set in 0..usize::from(set_count) {
                let bytes = reader.read_bytes(declared_size)?.to_vec();
                if !list_found {
                    continue;
                }
                let list = match collection.list_by_name_ignore_case(&list_name) {
                    Some(list) => list,
                    None => continue,
                };
                if let Some(variable) = list.variable_by_name_ignore_case(&variable_name) {
                    variable.copy_into_default(set, &bytes)?;
                } else if set == 0 {
                    outcome.unmatched_variables += 1;
                }
            }
        }
    }
    Ok(())
}

/// Bounds-checked little-endian cursor over the decompressed payload.
#[derive(Debug)]
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8], path: &'a Path) -> Self {
        Self { data, pos: 0, path }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], ProjectError> {
        if count > self.remaining() {
            return Err(ProjectError::format_invalid(
                self.path,
                format!(
                    "unexpected end of data at offset {} (need {} more bytes)",
                    self.pos, count
                ),
            ));
        }
        let data: &'a [u8] = self.data;
        let bytes = &data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    fn read_u16(&mut self) -> Result<u16, ProjectError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, ProjectError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_string(&mut self) -> Result<String, ProjectError> {
        let length = usize::from(self.read_u16()?);
        let bytes = self.read_bytes(length)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
