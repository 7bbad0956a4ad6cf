//! End-to-end import scenarios over real project files.

use std::fs;
use std::path::{Path, PathBuf};

use kefex_import::{
    import_ramview_project, DatapoolKind, ElementType, ElementValue, ImportError,
};
use kefex_project::{codec, ChecksummedTextStore};
use tempfile::tempdir;

fn write_def(dir: &Path, device: &str, project_name: &str) -> PathBuf {
    let mut store = ChecksummedTextStore::new();
    store.set_value("PROJECT", "DEVICE", device);
    store.set_value("PROJECT", "NAME", project_name);
    store.set_value("PROJECT", "COMMENT", "Imported test project");
    store.set_value("PROJECT", "VERSION", "2.1.0");
    store.set_value("DEFAULT_SETS", "NUMOFDEFAULTS", "1");
    store.set_value("DEFAULT_SETS", "DEFAULT1", "Factory");
    store.update_checksum();
    let path = dir.join("project.def");
    store.save(&path).unwrap();
    path
}

struct VariableSpec {
    name: &'static str,
    type_index: u8,
    size: usize,
    min: &'static str,
    max: &'static str,
}

fn write_ram(
    dir: &Path,
    filename: &str,
    device: &str,
    index: u16,
    list_name: &str,
    location: &str,
    variables: &[VariableSpec],
) {
    let mut store = ChecksummedTextStore::new();
    store.set_value("LIST", "DEVICE", device);
    store.set_value("LIST", "LISTINDEX", index.to_string());
    store.set_value("LIST", "NAME", list_name);
    store.set_value("LIST", "LOCATION", location);
    store.set_value("LIST", "NUMOFVARS", variables.len().to_string());
    for (number, spec) in variables.iter().enumerate() {
        let section = format!("VARIABLE{}", number + 1);
        store.set_value(&section, "NAME", spec.name);
        store.set_value(&section, "TYPE_INDEX", spec.type_index.to_string());
        store.set_value(&section, "SIZE", spec.size.to_string());
        if !spec.min.is_empty() {
            store.set_value(&section, "MIN", spec.min);
        }
        if !spec.max.is_empty() {
            store.set_value(&section, "MAX", spec.max);
        }
    }
    store.update_checksum();
    store.save(&dir.join(filename)).unwrap();
}

fn push_string(payload: &mut Vec<u8>, text: &str) {
    payload.extend_from_slice(&(text.len() as u16).to_le_bytes());
    payload.extend_from_slice(text.as_bytes());
}

fn write_dat(dir: &Path, device: &str, entries: &[(&str, &[(&str, &[u8])])]) {
    let mut payload = Vec::new();
    payload.extend_from_slice(&0x0100u16.to_le_bytes());
    push_string(&mut payload, device);
    payload.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (list_name, variables) in entries {
        push_string(&mut payload, list_name);
        payload.extend_from_slice(&(variables.len() as u16).to_le_bytes());
        for (variable_name, bytes) in *variables {
            push_string(&mut payload, variable_name);
            payload.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            payload.extend_from_slice(bytes);
        }
    }
    let mut file = (payload.len() as u32).to_le_bytes().to_vec();
    file.extend_from_slice(&codec::compress(&payload));
    fs::write(dir.join("project.dat"), file).unwrap();
}

#[test]
fn communication_kind_is_rejected() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    assert!(matches!(
        import_ramview_project(&def, DatapoolKind::Communication),
        Err(ImportError::InvalidKind { .. })
    ));
}

#[test]
fn single_element_array_collapses_to_scalar() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    write_ram(
        dir.path(),
        "list0.ram",
        "ECU_A",
        0,
        "Measurements",
        "RAM",
        &[VariableSpec {
            name: "Gain",
            type_index: 11, // array of 16 bit unsigned ints
            size: 2,
            min: "5",
            max: "500",
        }],
    );
    write_dat(
        dir.path(),
        "ECU_A",
        &[("Measurements", &[("Gain", &[100, 0][..])])],
    );

    let imported = import_ramview_project(&def, DatapoolKind::Diagnostic).unwrap();
    assert_eq!(imported.datapool.name, "Project");
    assert_eq!(imported.datapool.version, [2, 1, 0]);
    assert_eq!(imported.datapool.lists.len(), 1);

    let element = &imported.datapool.lists[0].elements[0];
    assert_eq!(element.element_type, ElementType::Uint16);
    assert!(!element.is_array);
    assert_eq!(element.array_size, 1);
    assert_eq!(element.min, vec![ElementValue::Int(5)]);
    assert_eq!(element.max, vec![ElementValue::Int(500)]);
    assert_eq!(element.data_set_values, vec![vec![ElementValue::Int(100)]]);
    assert!(imported
        .report
        .lines()
        .iter()
        .any(|line| line.contains("array of one element")));
}

#[test]
fn unterminated_string_default_is_patched() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    write_ram(
        dir.path(),
        "list0.ram",
        "ECU_A",
        0,
        "Texts",
        "RAM",
        &[VariableSpec {
            name: "Label",
            type_index: 10, // array of 8 bit signed ints ("string")
            size: 4,
            min: "",
            max: "",
        }],
    );
    write_dat(dir.path(), "ECU_A", &[("Texts", &[("Label", &b"ABCD"[..])])]);

    let imported = import_ramview_project(&def, DatapoolKind::Diagnostic).unwrap();
    let element = &imported.datapool.lists[0].elements[0];
    let values = &element.data_set_values[0];
    assert_eq!(values[0], ElementValue::Int(i64::from(b'A')));
    assert_eq!(values[3], ElementValue::Int(0));
    assert!(imported.report.lines().iter().any(|line| {
        line.contains("Factory") && line.contains("Texts.Label") && line.contains("terminator")
    }));
}

#[test]
fn names_are_sanitized_with_original_recorded() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    write_ram(
        dir.path(),
        "list0.ram",
        "ECU_A",
        0,
        "Measurements",
        "RAM",
        &[VariableSpec {
            name: "7Value With Spaces And A Long Tail",
            type_index: 3,
            size: 2,
            min: "0",
            max: "100",
        }],
    );

    let imported = import_ramview_project(&def, DatapoolKind::Diagnostic).unwrap();
    let element = &imported.datapool.lists[0].elements[0];
    assert!(element.name.starts_with("_7"));
    assert!(!element.name.contains(' '));
    assert!(element.name.chars().count() <= 31);
    assert!(element.comment.contains("Original name"));
    assert!(imported
        .report
        .lines()
        .iter()
        .any(|line| line.contains("Renamed variable")));
}

#[test]
fn kind_filter_selects_matching_lists_only() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    write_ram(
        dir.path(),
        "ram_list.ram",
        "ECU_A",
        0,
        "Measurements",
        "RAM",
        &[VariableSpec {
            name: "Speed",
            type_index: 3,
            size: 2,
            min: "0",
            max: "500",
        }],
    );
    write_ram(
        dir.path(),
        "eeprom_list.ram",
        "ECU_A",
        1,
        "Calibration",
        "EEPROM",
        &[VariableSpec {
            name: "Offset",
            type_index: 4,
            size: 2,
            min: "-100",
            max: "100",
        }],
    );

    let diagnostic = import_ramview_project(&def, DatapoolKind::Diagnostic).unwrap();
    assert_eq!(diagnostic.datapool.lists.len(), 1);
    assert_eq!(diagnostic.datapool.lists[0].name, "Measurements");

    let non_volatile = import_ramview_project(&def, DatapoolKind::NonVolatile).unwrap();
    assert_eq!(non_volatile.datapool.lists.len(), 1);
    assert_eq!(non_volatile.datapool.lists[0].name, "Calibration");
    assert!(!non_volatile.datapool.lists[0].elements[0].event_flag);
}

#[test]
fn missing_dat_and_rec_degrade_to_report_notes() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    write_ram(
        dir.path(),
        "list0.ram",
        "ECU_A",
        0,
        "Measurements",
        "RAM",
        &[VariableSpec {
            name: "Speed",
            type_index: 3,
            size: 2,
            min: "0",
            max: "500",
        }],
    );

    let imported = import_ramview_project(&def, DatapoolKind::Diagnostic).unwrap();
    assert!(imported
        .report
        .lines()
        .iter()
        .any(|line| line.contains("No default values imported")));
    assert!(imported
        .report
        .lines()
        .iter()
        .any(|line| line.contains("No comments imported")));
    // Defaults stay zero without a .dat file.
    let element = &imported.datapool.lists[0].elements[0];
    assert_eq!(element.data_set_values, vec![vec![ElementValue::Int(0)]]);
}

#[test]
fn unsupported_type_downgrades_to_uint8() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    write_ram(
        dir.path(),
        "list0.ram",
        "ECU_A",
        0,
        "Measurements",
        "RAM",
        &[VariableSpec {
            name: "Padding",
            type_index: 8, // checksum placeholder, not a value type
            size: 2,
            min: "",
            max: "",
        }],
    );

    let imported = import_ramview_project(&def, DatapoolKind::Diagnostic).unwrap();
    let element = &imported.datapool.lists[0].elements[0];
    assert_eq!(element.element_type, ElementType::Uint8);
    assert!(!element.is_array);
    assert_eq!(element.min, vec![ElementValue::Int(0)]);
    assert_eq!(element.max, vec![ElementValue::Int(255)]);
    assert!(imported
        .report
        .lines()
        .iter()
        .any(|line| line.contains("not supported")));
}

#[test]
fn scaling_factor_becomes_float_multiplier() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A", "Project");
    let mut store = ChecksummedTextStore::new();
    store.set_value("LIST", "DEVICE", "ECU_A");
    store.set_value("LIST", "LISTINDEX", "0");
    store.set_value("LIST", "NAME", "Measurements");
    store.set_value("LIST", "LOCATION", "RAM");
    store.set_value("LIST", "NUMOFVARS", "1");
    store.set_value("VARIABLE1", "NAME", "Current");
    store.set_value("VARIABLE1", "TYPE_INDEX", "3");
    store.set_value("VARIABLE1", "SIZE", "2");
    store.set_value("VARIABLE1", "FACTOR", "2500");
    store.set_value("VARIABLE1", "UNIT", "A");
    store.update_checksum();
    store.save(&dir.path().join("list0.ram")).unwrap();

    let imported = import_ramview_project(&def, DatapoolKind::Diagnostic).unwrap();
    let element = &imported.datapool.lists[0].elements[0];
    assert_eq!(element.factor, 0.25);
    assert_eq!(element.offset, 0.0);
    assert_eq!(element.unit, "A");
    assert!(element.event_flag);
}
