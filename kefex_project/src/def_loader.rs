//! Loader for `.def`-rooted projects and their per-list `.ram` files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use kefex_data_type::{bits, KefexType};
use kefex_variables::{
    AccessRight, ListKind, TypedVariable, VariableClass, VariableList, VariableListCollection,
    NUM_ACCESS_GROUPS,
};

use crate::{ChecksummedTextStore, ProjectError};

/// Project-level options read from the `.def` file.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    /// Device name all list files must declare.
    pub device: String,
    /// Project display name.
    pub project_name: String,
    /// Free-text project comment.
    pub comment: String,
    /// Project version triple.
    pub version: [u16; 3],
}

/// A fully loaded legacy project: options plus all variable lists.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Options from the `.def` file.
    pub options: ProjectOptions,
    /// The variable lists, ordered by list index.
    pub lists: VariableListCollection,
}

/// Load a `.def` project and every matching `.ram` list file next to it.
///
/// Recoverable conditions (checksum mismatch of a candidate file) are pushed
/// to `report` as warnings; structural problems in the set of matching files
/// are fatal.
pub fn load_project(
    def_path: &Path,
    report: &mut Vec<String>,
) -> Result<LoadedProject, ProjectError> {
    let store = ChecksummedTextStore::load(def_path)?;
    if !store.check_checksum() {
        log::error!("checksum mismatch in {}", def_path.display());
        return Err(ProjectError::format_invalid(
            def_path,
            "project file checksum mismatch",
        ));
    }

    let device = match store.value("PROJECT", "DEVICE") {
        Some(device) => device.to_string(),
        None => {
            return Err(ProjectError::format_invalid(
                def_path,
                "missing PROJECT.DEVICE",
            ))
        }
    };
    let default_name = def_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let options = ProjectOptions {
        project_name: store.string("PROJECT", "NAME", &default_name),
        comment: store.string("PROJECT", "COMMENT", ""),
        version: parse_version(&store.string("PROJECT", "VERSION", "0.0.0")),
        device,
    };

    let default_set_names = parse_default_set_names(&store);

    let directory = match def_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let candidates = scan_ram_files(directory, &options.device, report)?;
    let ordered = order_by_list_index(candidates)?;

    let mut collection = VariableListCollection::new();
    for (_, path, store) in &ordered {
        collection.lists.push(parse_list(store, path)?);
    }
    collection.set_default_count(default_set_names.len() as u16);
    collection.default_set_names = default_set_names;

    Ok(LoadedProject {
        options,
        lists: collection,
    })
}

fn parse_version(text: &str) -> [u16; 3] {
    let mut version = [0u16; 3];
    for (slot, part) in version.iter_mut().zip(text.split('.')) {
        *slot = part.trim().parse().unwrap_or(0);
    }
    version
}

fn parse_default_set_names(store: &ChecksummedTextStore) -> Vec<String> {
    let count = store.integer("DEFAULT_SETS", "NUMOFDEFAULTS", 0).max(0) as usize;
    (0..count)
        .map(|index| {
            store
                .value("DEFAULT_SETS", &format!("DEFAULT{}", index + 1))
                .map(str::to_string)
                .unwrap_or_else(|| format!("DEFAULT_{}", index))
        })
        .collect()
}

/// Scan a directory for `.ram` files declaring the expected device.
///
/// The declared `DEVICE` key is read before the checksum is verified: the
/// cheap filter first, then the expensive check only for files that belong
/// to this device. Checksum mismatches are warnings, not fatal.
fn scan_ram_files(
    directory: &Path,
    device: &str,
    report: &mut Vec<String>,
) -> Result<Vec<(i64, PathBuf, ChecksummedTextStore)>, ProjectError> {
    let entries = fs::read_dir(directory).map_err(|e| ProjectError::cannot_open(directory, e))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ProjectError::cannot_open(directory, e))?;
        let path = entry.path();
        let is_ram = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("ram"))
            .unwrap_or(false);
        if !is_ram {
            continue;
        }
        let store = match ChecksummedTextStore::load(&path) {
            Ok(store) => store,
            Err(error) => {
                log::warn!("skipping unreadable list file {}: {}", path.display(), error);
                report.push(format!("Skipped unreadable list file {}", path.display()));
                continue;
            }
        };
        let declared = store.string("LIST", "DEVICE", "");
        if !declared.eq_ignore_ascii_case(device) {
            continue;
        }
        if !store.check_checksum() {
            log::warn!("checksum mismatch in {}", path.display());
            report.push(format!(
                "Skipped list file {} (checksum mismatch)",
                path.display()
            ));
            continue;
        }
        let list_index = store.integer("LIST", "LISTINDEX", -1);
        if list_index < 0 {
            return Err(ProjectError::format_invalid(
                &path,
                "missing or invalid LIST.LISTINDEX",
            ));
        }
        found.push((list_index, path, store));
    }
    Ok(found)
}

/// Sort found files by list index and validate contiguity from zero.
fn order_by_list_index(
    mut found: Vec<(i64, PathBuf, ChecksummedTextStore)>,
) -> Result<Vec<(i64, PathBuf, ChecksummedTextStore)>, ProjectError> {
    found.sort_by_key(|(index, _, _)| *index);
    for (position, (index, path, _)) in found.iter().enumerate() {
        let expected = position as i64;
        if *index > expected {
            return Err(ProjectError::Inconsistent {
                reason: format!(
                    "list index {} is missing; found index {} in {}",
                    expected,
                    index,
                    path.display()
                ),
            });
        }
        if *index < expected {
            let previous = &found[position - 1];
            return Err(ProjectError::Inconsistent {
                reason: format!(
                    "duplicate list index {} in {} and {}",
                    index,
                    previous.1.display(),
                    path.display()
                ),
            });
        }
    }
    Ok(found)
}

fn parse_list(store: &ChecksummedTextStore, path: &Path) -> Result<VariableList, ProjectError> {
    let name = match store.value("LIST", "NAME") {
        Some(name) => name.to_string(),
        None => return Err(ProjectError::format_invalid(path, "missing LIST.NAME")),
    };
    let kind = ListKind::from_keyword(&store.string("LIST", "LOCATION", "RAM"))
        .unwrap_or(ListKind::Ram);
    let mut list = VariableList::new(name, kind);
    list.checksummed = store.boolean("LIST", "CHECKSUM_ACTIVE", false);
    list.checksum_address = store.integer("LIST", "CHECKSUM_ADDRESS", 0).max(0) as u32;

    let variable_count = store.integer("LIST", "NUMOFVARS", 0).max(0);
    for number in 1..=variable_count {
        let section = format!("VARIABLE{}", number);
        if !store.has_section(&section) {
            return Err(ProjectError::format_invalid(
                path,
                format!("missing section [{}]", section),
            ));
        }
        list.add_variable(parse_variable(store, &section, path)?);
    }
    Ok(list)
}

fn parse_variable(
    store: &ChecksummedTextStore,
    section: &str,
    path: &Path,
) -> Result<TypedVariable, ProjectError> {
    let mut variable = TypedVariable::new();

    variable.name = match store.value(section, "NAME") {
        Some(name) => name.to_string(),
        None => {
            return Err(ProjectError::format_invalid(
                path,
                format!("missing {}.NAME", section),
            ))
        }
    };
    variable.address = store.integer(section, "ADDRESS", 0).max(0) as u32;

    let var_type = parse_type(store, section, path, &variable.name)?;
    variable.set_type(var_type);
    let size = store.integer(section, "SIZE", var_type.default_size() as i64).max(0) as usize;
    variable.set_size(size);

    variable.location_is_ram = !store
        .string(section, "LOCATION", "RAM")
        .eq_ignore_ascii_case("FUNCTION");

    parse_bound(store, section, &mut variable, Bound::Min);
    parse_bound(store, section, &mut variable, Bound::Max);

    for group in 0..NUM_ACCESS_GROUPS {
        let key = format!("ACCESS_GROUP{}", group + 1);
        if let Some(keyword) = store.value(section, &key) {
            variable.access[group] = AccessRight::from_keyword(keyword).ok_or_else(|| {
                ProjectError::format_invalid(
                    path,
                    format!("invalid access right \"{}\" in {}.{}", keyword, section, key),
                )
            })?;
        }
    }

    variable.unit = store.string(section, "UNIT", "");
    variable.scaling_factor = store.integer(section, "FACTOR", 10000) as i32;
    variable.scaling_digits = store.integer(section, "DIGITS", 0).clamp(0, 255) as u8;

    // Transmission fields are independently defaulted: a bad value in one
    // never aborts the record.
    variable.transmission.transmission_type =
        store.integer(section, "TRANSMISSION_TYPE", 0).clamp(0, 255) as u8;
    variable.transmission.interval_ms = store.integer(section, "INTERVAL", 0).max(0) as u32;
    variable.transmission.hysteresis_lower = store.integer(section, "HYST_LOWER", 0);
    variable.transmission.hysteresis_upper = store.integer(section, "HYST_UPPER", 0);

    variable.class = store
        .value(section, "CLASS")
        .and_then(VariableClass::from_keyword)
        .unwrap_or_default();

    Ok(variable)
}

fn parse_type(
    store: &ChecksummedTextStore,
    section: &str,
    path: &Path,
    name: &str,
) -> Result<KefexType, ProjectError> {
    if let Some(index) = store.value(section, "TYPE_INDEX") {
        let tag: u8 = index.trim().parse().map_err(|_| {
            ProjectError::format_invalid(
                path,
                format!("invalid TYPE_INDEX \"{}\" for variable {}", index, name),
            )
        })?;
        return Ok(KefexType::from_tag(tag));
    }
    if let Some(alias) = store.value(section, "TYPE") {
        return KefexType::from_legacy_alias(alias).ok_or_else(|| {
            ProjectError::format_invalid(
                path,
                format!("unknown type \"{}\" for variable {}", alias, name),
            )
        });
    }
    Err(ProjectError::format_invalid(
        path,
        format!("variable {} has neither TYPE_INDEX nor TYPE", name),
    ))
}

#[derive(Clone, Copy)]
enum Bound {
    Min,
    Max,
}

/// Fill the min or max buffer from the file.
///
/// Values are stored as raw `i64` bit patterns and reinterpreted as floats
/// for float types. Array types take a semicolon-tokenized per-element
/// override; elements without an override get the full type-range default.
fn parse_bound(store: &ChecksummedTextStore, section: &str, variable: &mut TypedVariable, bound: Bound) {
    let var_type = variable.var_type();
    let key = match bound {
        Bound::Min => "MIN",
        Bound::Max => "MAX",
    };
    let range_default = match bound {
        Bound::Min => var_type.range_min(),
        Bound::Max => var_type.range_max(),
    };

    if variable.is_array() {
        let tokens: Vec<i64> = store
            .value(section, key)
            .map(|text| {
                text.split(';')
                    .map(|token| token.trim().parse().unwrap_or(range_default))
                    .collect()
            })
            .unwrap_or_default();
        for index in 0..variable.num_elements() {
            let raw = tokens.get(index).copied().unwrap_or(range_default);
            // Element writes stay in range by construction of num_elements.
            if var_type.is_float() {
                let value = bits::f64_from_bits(raw as u64);
                let _ = match bound {
                    Bound::Min => variable.set_min_float_element(index, value),
                    Bound::Max => variable.set_max_float_element(index, value),
                };
            } else {
                let _ = match bound {
                    Bound::Min => variable.set_min_element(index, raw),
                    Bound::Max => variable.set_max_element(index, raw),
                };
            }
        }
    } else {
        let raw = store.integer(section, key, range_default);
        if var_type.is_float() {
            let value = bits::f64_from_bits(raw as u64);
            match bound {
                Bound::Min => variable.set_min_float(value),
                Bound::Max => variable.set_max_float(value),
            }
        } else {
            match bound {
                Bound::Min => variable.set_min(raw),
                Bound::Max => variable.set_max(raw),
            }
        }
    }
}
