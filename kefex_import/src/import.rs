//! Translation of a loaded legacy project into a Datapool.

use std::{fmt, path::Path};

use kefex_data_type::KefexType;
use kefex_project::{load_dat, load_project, merge_comments, ProjectError};
use kefex_variables::{ListKind, TypedVariable, VariableList};
use serde::Serialize;

use crate::{
    Datapool, DatapoolElement, DatapoolKind, DatapoolList, ElementAccess, ElementType,
    ElementValue, ImportError,
};

/// Maximum length of a sanitized datapool name.
const MAX_NAME_LENGTH: usize = 31;

/// Ordered list of human-readable compatibility notes.
///
/// One line per compromise the importer had to make: renames, type
/// downgrades, array collapses, string terminator patches, missing optional
/// files. Always returned, even on success.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    lines: Vec<String>,
}

impl ImportReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one note.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// All notes, in the order they were made.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True if no compromises were necessary.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Result of a successful import: the populated datapool plus the report.
#[derive(Debug, Clone)]
pub struct RamViewImport {
    /// The translated datapool.
    pub datapool: Datapool,
    /// Compatibility notes collected during the import.
    pub report: ImportReport,
}

/// Import a legacy RAMView project into a datapool of the requested kind.
///
/// Loads the `.def` project and its `.ram` list files (fatal on checksum or
/// structural errors), then the sibling `.dat` default values and `.rec`
/// comments (each degrades to a report note when absent), and translates
/// every list whose memory kind matches the destination kind.
pub fn import_ramview_project(
    def_path: &Path,
    kind: DatapoolKind,
) -> Result<RamViewImport, ImportError> {
    let wanted_list_kind = match kind {
        DatapoolKind::Diagnostic => ListKind::Ram,
        DatapoolKind::NonVolatile => ListKind::Eeprom,
        DatapoolKind::Communication => return Err(ImportError::InvalidKind { kind }),
    };

    let mut report = ImportReport::new();
    let mut warnings = Vec::new();
    let loaded = load_project(def_path, &mut warnings)?;
    for warning in warnings {
        report.push(warning);
    }
    let options = loaded.options;
    let mut lists = loaded.lists;

    let dat_path = def_path.with_extension("dat");
    match load_dat(&dat_path, &options.device, &mut lists) {
        Ok(outcome) if outcome.is_partial() => {
            report.push(format!(
                "Default values in {} only partially match the project: {} unknown list name(s), {} unknown variable name(s)",
                dat_path.display(),
                outcome.unmatched_lists,
                outcome.unmatched_variables
            ));
        }
        Ok(_) => {}
        Err(ProjectError::CannotOpen { .. }) => {
            log::warn!("no default value file at {}", dat_path.display());
            report.push(format!(
                "No default values imported: {} not found",
                dat_path.display()
            ));
        }
        Err(error) => return Err(error.into()),
    }

    let rec_path = def_path.with_extension("rec");
    match merge_comments(&rec_path, &options.device, &mut lists) {
        Ok(()) => {}
        Err(ProjectError::CannotOpen { .. }) => {
            log::warn!("no comment file at {}", rec_path.display());
            report.push(format!(
                "No comments imported: {} not found",
                rec_path.display()
            ));
        }
        Err(error) => return Err(error.into()),
    }

    let mut comment = options.comment.clone();
    let name = sanitize_and_report(
        &options.project_name,
        "project",
        &mut comment,
        &mut report,
    );

    let data_set_names: Vec<String> = lists
        .default_set_names
        .iter()
        .map(|set_name| {
            let mut unused = String::new();
            sanitize_and_report(set_name, "data set", &mut unused, &mut report)
        })
        .collect();

    let mut datapool = Datapool {
        name,
        comment,
        version: options.version,
        kind,
        lists: Vec::new(),
    };
    for list in &lists.lists {
        if list.kind != wanted_list_kind {
            continue;
        }
        datapool
            .lists
            .push(translate_list(list, &data_set_names, kind, &mut report));
    }

    Ok(RamViewImport { datapool, report })
}

fn translate_list(
    list: &VariableList,
    data_set_names: &[String],
    kind: DatapoolKind,
    report: &mut ImportReport,
) -> DatapoolList {
    let mut comment = String::new();
    let name = sanitize_and_report(&list.name, "list", &mut comment, report);
    let elements = list
        .variables
        .iter()
        .map(|variable| translate_variable(&list.name, variable, data_set_names, kind, report))
        .collect();
    DatapoolList {
        name,
        comment,
        data_set_names: data_set_names.to_vec(),
        elements,
    }
}

fn translate_variable(
    list_name: &str,
    variable: &TypedVariable,
    data_set_names: &[String],
    kind: DatapoolKind,
    report: &mut ImportReport,
) -> DatapoolElement {
    let data_set_count = data_set_names.len();
    let mut comment = variable.comments.first().cloned().unwrap_or_default();
    let name = sanitize_and_report(&variable.name, "variable", &mut comment, report);

    let access = ElementAccess::ReadWrite;
    let event_flag = match kind {
        // Function-call variables cannot signal changes and stay polled.
        DatapoolKind::Diagnostic => variable.location_is_ram,
        _ => false,
    };
    let factor = f64::from(variable.scaling_factor) / 10000.0;

    let element_type = match map_element_type(variable.var_type()) {
        Some(element_type) => element_type,
        None => {
            report.push(format!(
                "Variable \"{}.{}\": type {} is not supported; imported as an 8 bit unsigned value",
                list_name,
                variable.name,
                variable.var_type()
            ));
            return DatapoolElement {
                name,
                comment,
                element_type: ElementType::Uint8,
                is_array: false,
                array_size: 1,
                min: vec![ElementValue::Int(0)],
                max: vec![ElementValue::Int(255)],
                data_set_values: vec![vec![ElementValue::Int(0)]; data_set_count],
                factor,
                offset: 0.0,
                unit: variable.unit.clone(),
                access,
                event_flag,
            };
        }
    };

    let mut is_array = variable.is_array();
    let array_size = variable.num_elements().max(1);
    if is_array && array_size == 1 {
        is_array = false;
        report.push(format!(
            "Variable \"{}.{}\": array of one element imported as a plain value",
            list_name, variable.name
        ));
    }

    let min = buffer_content(variable, Source::Min);
    let max = buffer_content(variable, Source::Max);
    let mut data_set_values: Vec<Vec<ElementValue>> = (0..data_set_count)
        .map(|set| buffer_content(variable, Source::Default(set)))
        .collect();

    if variable.is_string_type() {
        for (set, values) in data_set_values.iter_mut().enumerate() {
            let bytes = match variable.default_bytes(set) {
                Ok(bytes) => bytes,
                Err(_) => continue,
            };
            if !bytes.is_empty() && !bytes.contains(&0) {
                if let Some(last) = values.last_mut() {
                    *last = ElementValue::Int(0);
                }
                let set_name = data_set_names
                    .get(set)
                    .map(String::as_str)
                    .unwrap_or("");
                report.push(format!(
                    "Data set \"{}\" of variable \"{}.{}\": string value had no terminator; last character replaced by zero",
                    set_name, list_name, variable.name
                ));
            }
        }
    }

    DatapoolElement {
        name,
        comment,
        element_type,
        is_array,
        array_size,
        min,
        max,
        data_set_values,
        factor,
        offset: 0.0,
        unit: variable.unit.clone(),
        access,
        event_flag,
    }
}

fn map_element_type(var_type: KefexType) -> Option<ElementType> {
    let element_type = match var_type.element_base_type() {
        KefexType::Uint8 => ElementType::Uint8,
        KefexType::Sint8 => ElementType::Sint8,
        KefexType::Uint16 => ElementType::Uint16,
        KefexType::Sint16 => ElementType::Sint16,
        KefexType::Uint32 => ElementType::Uint32,
        KefexType::Sint32 => ElementType::Sint32,
        KefexType::Uint64 => ElementType::Uint64,
        KefexType::Sint64 => ElementType::Sint64,
        KefexType::Float32 => ElementType::Float32,
        KefexType::Float64 => ElementType::Float64,
        _ => return None,
    };
    Some(element_type)
}

#[derive(Clone, Copy)]
enum Source {
    Min,
    Max,
    Default(usize),
}

/// Read one buffer of a variable as per-entry element values.
///
/// Arrays read per element; scalars read the whole buffer, honoring the
/// size-driven packing of odd-sized legacy variables.
fn buffer_content(variable: &TypedVariable, source: Source) -> Vec<ElementValue> {
    if variable.is_array() {
        (0..variable.num_elements())
            .map(|index| {
                if variable.is_float() {
                    let value = match source {
                        Source::Min => variable.get_min_float_element(index),
                        Source::Max => variable.get_max_float_element(index),
                        Source::Default(set) => variable.get_default_float_element(set, index),
                    };
                    ElementValue::Float(value.unwrap_or(0.0))
                } else {
                    let value = match source {
                        Source::Min => variable.get_min_element(index),
                        Source::Max => variable.get_max_element(index),
                        Source::Default(set) => variable.get_default_element(set, index),
                    };
                    ElementValue::Int(value.unwrap_or(0))
                }
            })
            .collect()
    } else if variable.is_float() {
        let value = match source {
            Source::Min => variable.get_min_float(),
            Source::Max => variable.get_max_float(),
            Source::Default(set) => variable.get_default_float(set).unwrap_or(0.0),
        };
        vec![ElementValue::Float(value)]
    } else {
        let value = match source {
            Source::Min => variable.get_min(),
            Source::Max => variable.get_max(),
            Source::Default(set) => variable.get_default(set).unwrap_or(0),
        };
        vec![ElementValue::Int(value)]
    }
}

/// Sanitize a name for the destination model: spaces stripped, a leading
/// digit prefixed with `_`, and the result truncated to 31 characters.
///
/// Any change appends an original-name note to `comment` and to the report.
fn sanitize_and_report(
    name: &str,
    what: &str,
    comment: &mut String,
    report: &mut ImportReport,
) -> String {
    let (sanitized, changed) = sanitize_name(name);
    if changed {
        if !comment.is_empty() {
            comment.push('\n');
        }
        comment.push_str(&format!("Original name: \"{}\"", name));
        report.push(format!(
            "Renamed {} \"{}\" to \"{}\"",
            what, name, sanitized
        ));
    }
    sanitized
}

fn sanitize_name(name: &str) -> (String, bool) {
    let mut sanitized: String = name.chars().filter(|c| *c != ' ').collect();
    if sanitized.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    if sanitized.chars().count() > MAX_NAME_LENGTH {
        sanitized = sanitized.chars().take(MAX_NAME_LENGTH).collect();
    }
    let changed = sanitized != name;
    (sanitized, changed)
}
