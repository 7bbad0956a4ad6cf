//! File-level tests for the `.def`/`.ram` project loader.

use std::fs;
use std::path::{Path, PathBuf};

use kefex_project::{load_project, ChecksummedTextStore, ProjectError};
use kefex_variables::ListKind;
use tempfile::tempdir;

fn write_def(dir: &Path, device: &str) -> PathBuf {
    let mut store = ChecksummedTextStore::new();
    store.set_value("PROJECT", "DEVICE", device);
    store.set_value("PROJECT", "NAME", "TestProject");
    store.set_value("PROJECT", "VERSION", "1.0.2");
    store.set_value("DEFAULT_SETS", "NUMOFDEFAULTS", "1");
    store.set_value("DEFAULT_SETS", "DEFAULT1", "Factory");
    store.update_checksum();
    let path = dir.join("project.def");
    store.save(&path).unwrap();
    path
}

fn ram_store(device: &str, index: u16, name: &str) -> ChecksummedTextStore {
    let mut store = ChecksummedTextStore::new();
    store.set_value("LIST", "DEVICE", device);
    store.set_value("LIST", "LISTINDEX", index.to_string());
    store.set_value("LIST", "NAME", name);
    store.set_value("LIST", "LOCATION", "RAM");
    store.set_value("LIST", "NUMOFVARS", "1");
    store.set_value("VARIABLE1", "NAME", "Speed");
    store.set_value("VARIABLE1", "TYPE_INDEX", "3");
    store.set_value("VARIABLE1", "SIZE", "2");
    store.set_value("VARIABLE1", "MIN", "0");
    store.set_value("VARIABLE1", "MAX", "500");
    store
}

fn write_ram(dir: &Path, filename: &str, device: &str, index: u16, name: &str) {
    let mut store = ram_store(device, index, name);
    store.update_checksum();
    store.save(&dir.join(filename)).unwrap();
}

#[test]
fn loads_lists_ordered_by_index() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A");
    // Written out of order on purpose; the loader sorts by LISTINDEX.
    write_ram(dir.path(), "second.ram", "ECU_A", 1, "Parameters");
    write_ram(dir.path(), "first.ram", "ECU_A", 0, "Measurements");

    let mut report = Vec::new();
    let loaded = load_project(&def, &mut report).unwrap();
    assert_eq!(loaded.options.device, "ECU_A");
    assert_eq!(loaded.options.version, [1, 0, 2]);
    assert_eq!(loaded.lists.lists.len(), 2);
    assert_eq!(loaded.lists.lists[0].name, "Measurements");
    assert_eq!(loaded.lists.lists[1].name, "Parameters");
    assert_eq!(loaded.lists.default_set_names, vec!["Factory"]);
    assert_eq!(loaded.lists.lists[0].default_set_count(), 1);
    assert_eq!(loaded.lists.lists[0].kind, ListKind::Ram);
    assert!(report.is_empty());
}

#[test]
fn other_devices_files_are_ignored() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A");
    write_ram(dir.path(), "mine.ram", "ECU_A", 0, "Measurements");
    write_ram(dir.path(), "other.ram", "ECU_B", 0, "Foreign");

    let mut report = Vec::new();
    let loaded = load_project(&def, &mut report).unwrap();
    assert_eq!(loaded.lists.lists.len(), 1);
    assert_eq!(loaded.lists.lists[0].name, "Measurements");
}

#[test]
fn tampered_list_file_is_skipped_with_warning() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A");
    write_ram(dir.path(), "good.ram", "ECU_A", 0, "Measurements");

    let mut bad = ram_store("ECU_A", 1, "Parameters");
    bad.update_checksum();
    let path = dir.path().join("bad.ram");
    bad.save(&path).unwrap();
    let tampered = fs::read_to_string(&path).unwrap().replace("Speed", "Creep");
    fs::write(&path, tampered).unwrap();

    // The tampered file is excluded with a warning; since it carried index 1
    // its absence does not break contiguity of the remaining set.
    let mut report = Vec::new();
    let loaded = load_project(&def, &mut report).unwrap();
    assert_eq!(loaded.lists.lists.len(), 1);
    assert!(report.iter().any(|line| line.contains("checksum mismatch")));
}

#[test]
fn list_index_gap_is_fatal() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A");
    write_ram(dir.path(), "a.ram", "ECU_A", 0, "Measurements");
    write_ram(dir.path(), "c.ram", "ECU_A", 2, "Calibration");

    let mut report = Vec::new();
    assert!(matches!(
        load_project(&def, &mut report),
        Err(ProjectError::Inconsistent { .. })
    ));
}

#[test]
fn duplicate_list_index_is_fatal() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A");
    write_ram(dir.path(), "a.ram", "ECU_A", 0, "Measurements");
    write_ram(dir.path(), "b.ram", "ECU_A", 0, "Duplicate");

    let mut report = Vec::new();
    assert!(matches!(
        load_project(&def, &mut report),
        Err(ProjectError::Inconsistent { .. })
    ));
}

#[test]
fn tampered_project_file_is_fatal() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A");
    let tampered = fs::read_to_string(&def)
        .unwrap()
        .replace("TestProject", "TamperedIt");
    fs::write(&def, tampered).unwrap();

    let mut report = Vec::new();
    assert!(matches!(
        load_project(&def, &mut report),
        Err(ProjectError::FormatInvalid { .. })
    ));
}

#[test]
fn parsed_variables_carry_their_fields() {
    let dir = tempdir().unwrap();
    let def = write_def(dir.path(), "ECU_A");
    let mut store = ram_store("ECU_A", 0, "Measurements");
    store.set_value("VARIABLE1", "UNIT", "km/h");
    store.set_value("VARIABLE1", "FACTOR", "100");
    store.set_value("VARIABLE1", "DIGITS", "2");
    store.set_value("VARIABLE1", "ACCESS_GROUP1", "RO");
    store.set_value("VARIABLE1", "LOCATION", "FUNCTION");
    store.set_value("VARIABLE1", "CLASS", "PARAMETER");
    store.update_checksum();
    store.save(&dir.path().join("list0.ram")).unwrap();

    let mut report = Vec::new();
    let loaded = load_project(&def, &mut report).unwrap();
    let variable = &loaded.lists.lists[0].variables[0];
    assert_eq!(variable.name, "Speed");
    assert_eq!(variable.unit, "km/h");
    assert_eq!(variable.scaling_factor, 100);
    assert_eq!(variable.scaling_digits, 2);
    assert!(!variable.location_is_ram);
    assert_eq!(variable.get_min(), 0);
    assert_eq!(variable.get_max(), 500);
    assert_eq!(variable.default_count(), 1);
}
