//! Key/section text store with a dual-generation tamper-evident checksum.
//!
//! The store guards `.def` and `.ram` files against accidental manual edits.
//! Two checksum generations exist: the legacy "V1" re-hashes all preceding
//! sections for every section and is therefore quadratic on large files; "V2"
//! hashes each section once. Both are stamped on every save so files stay
//! readable by older and newer generations of the tooling. Only directive
//! values are hashed; section and key names are not, and the `[INISAFE]`
//! bookkeeping section is excluded entirely.

use std::{fmt, fs, path::Path};

use kefex_variables::Crc16;

use crate::ProjectError;

/// Name of the bookkeeping section holding version and checksums.
pub const INISAFE_SECTION: &str = "INISAFE";

/// Current checksum format version.
pub const CHECKSUM_VERSION: u32 = 2;

/// One named section of ordered key/value directives.
#[derive(Debug, Clone, Default)]
pub struct TextSection {
    /// Section name without brackets.
    pub name: String,
    /// Directives in file order.
    pub directives: Vec<(String, String)>,
}

impl TextSection {
    fn value(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    // Checksum input: every directive value byte, rotated left by 3 bits.
    fn feed(&self, crc: &mut Crc16) {
        for (_, value) in &self.directives {
            for byte in value.bytes() {
                crc.update_byte(byte.rotate_left(3));
            }
        }
    }
}

/// Checksummed key/section text store.
#[derive(Debug, Clone, Default)]
pub struct ChecksummedTextStore {
    sections: Vec<TextSection>,
    version: u32,
    checksum_v1: Option<u16>,
    checksum_v2: Option<u16>,
}

impl ChecksummedTextStore {
    /// Create an empty store stamped with the current checksum version.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            version: CHECKSUM_VERSION,
            checksum_v1: None,
            checksum_v2: None,
        }
    }

    /// Parse a store from a file.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = fs::read_to_string(path).map_err(|e| ProjectError::cannot_open(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Parse a store from text.
    pub fn parse(text: &str) -> Self {
        let mut store = Self {
            sections: Vec::new(),
            version: 1,
            checksum_v1: None,
            checksum_v2: None,
        };
        let mut current: Option<TextSection> = None;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                if let Some(section) = current.take() {
                    store.push_section(section);
                }
                current = Some(TextSection {
                    name: name.to_string(),
                    directives: Vec::new(),
                });
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                if let Some(section) = &mut current {
                    section
                        .directives
                        .push((key.trim().to_string(), value.trim().to_string()));
                }
            }
        }
        if let Some(section) = current.take() {
            store.push_section(section);
        }
        store
    }

    fn push_section(&mut self, section: TextSection) {
        if section.name.eq_ignore_ascii_case(INISAFE_SECTION) {
            if let Some(version) = section.value("VERSION").and_then(|v| v.parse().ok()) {
                self.version = version;
            }
            self.checksum_v1 = section.value("CHECKSUM").and_then(|v| v.parse().ok());
            self.checksum_v2 = section.value("CHECKSUM_V2").and_then(|v| v.parse().ok());
        } else {
            self.sections.push(section);
        }
    }

    /// Write the store to a file, with the `[INISAFE]` section last.
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        fs::write(path, self.to_string()).map_err(|e| ProjectError::cannot_open(path, e))
    }

    /// The checksum format version the file was stamped with.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// All content sections, in file order.
    pub fn sections(&self) -> &[TextSection] {
        &self.sections
    }

    /// True if a section with the given name exists.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections
            .iter()
            .any(|section| section.name.eq_ignore_ascii_case(name))
    }

    /// Look up a directive value.
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(section))
            .and_then(|s| s.value(key))
    }

    /// Look up a string value, falling back to a default.
    pub fn string(&self, section: &str, key: &str, default: &str) -> String {
        self.value(section, key).unwrap_or(default).to_string()
    }

    /// Look up an integer value, falling back to a default on absence or
    /// parse failure.
    pub fn integer(&self, section: &str, key: &str, default: i64) -> i64 {
        self.value(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Look up a boolean value (0 = false, anything else = true).
    pub fn boolean(&self, section: &str, key: &str, default: bool) -> bool {
        self.value(section, key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|v| v != 0)
            .unwrap_or(default)
    }

    /// Set a directive value, appending the section and/or key as needed.
    pub fn set_value(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        let index = match self
            .sections
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(section))
        {
            Some(index) => index,
            None => {
                self.sections.push(TextSection {
                    name: section.to_string(),
                    directives: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        let section = &mut self.sections[index];
        match section
            .directives
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some((_, v)) => *v = value,
            None => section.directives.push((key.to_string(), value)),
        }
    }

    // V2: every section hashed exactly once.
    fn compute_checksum_v2(&self) -> u16 {
        let mut crc = Crc16::new();
        for section in &self.sections {
            section.feed(&mut crc);
        }
        crc.value()
    }

    // V1: for section index i, all sections 0..=i are re-fed, making the
    // legacy algorithm quadratic in the number of sections.
    fn compute_checksum_v1(&self) -> u16 {
        let mut crc = Crc16::new();
        for end in 0..self.sections.len() {
            for section in &self.sections[..=end] {
                section.feed(&mut crc);
            }
        }
        crc.value()
    }

    /// Recompute and stamp both checksum generations.
    pub fn update_checksum(&mut self) {
        self.version = CHECKSUM_VERSION;
        self.checksum_v1 = Some(self.compute_checksum_v1());
        self.checksum_v2 = Some(self.compute_checksum_v2());
    }

    /// Verify the stored checksum against the content.
    ///
    /// V2 is tried first; V1 is the fallback for files stamped version 1 and
    /// for legacy files whose V2 does not match (files saved by older
    /// generations of the writer).
    pub fn check_checksum(&self) -> bool {
        if self.version >= 2 {
            if let Some(stored) = self.checksum_v2 {
                if stored == self.compute_checksum_v2() {
                    return true;
                }
            }
        }
        match self.checksum_v1 {
            Some(stored) => stored == self.compute_checksum_v1(),
            None => false,
        }
    }
}

impl fmt::Display for ChecksummedTextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.directives {
                writeln!(f, "{}={}", key, value)?;
            }
        }
        writeln!(f, "[{}]", INISAFE_SECTION)?;
        writeln!(f, "VERSION={}", self.version)?;
        if let Some(checksum) = self.checksum_v1 {
            writeln!(f, "CHECKSUM={}", checksum)?;
        }
        if let Some(checksum) = self.checksum_v2 {
            writeln!(f, "CHECKSUM_V2={}", checksum)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> ChecksummedTextStore {
        let mut store = ChecksummedTextStore::new();
        store.set_value("LIST", "DEVICE", "ECU_A");
        store.set_value("LIST", "NAME", "Measurements");
        store.set_value("VARIABLE1", "NAME", "Speed");
        store.set_value("VARIABLE1", "ADDRESS", "4096");
        store
    }

    #[test]
    fn checksum_round_trip() {
        let mut store = sample_store();
        store.update_checksum();
        assert!(store.check_checksum());

        let reparsed = ChecksummedTextStore::parse(&store.to_string());
        assert!(reparsed.check_checksum());
    }

    #[test]
    fn single_character_flip_is_detected() {
        let mut store = sample_store();
        store.update_checksum();
        let text = store.to_string();
        let tampered = text.replace("Speed", "Spued");
        assert!(!ChecksummedTextStore::parse(&tampered).check_checksum());
    }

    #[test]
    fn v1_fallback_for_legacy_files() {
        let mut store = sample_store();
        store.update_checksum();
        let mut text = store.to_string();
        // A legacy writer stamps version 1 and no V2 value.
        text = text.replace("VERSION=2", "VERSION=1");
        let v2_line = text
            .lines()
            .find(|line| line.starts_with("CHECKSUM_V2="))
            .unwrap()
            .to_string();
        text = text.replace(&format!("{}\n", v2_line), "");
        let legacy = ChecksummedTextStore::parse(&text);
        assert_eq!(legacy.version(), 1);
        assert!(legacy.check_checksum());
    }

    #[test]
    fn missing_checksums_fail() {
        let store = sample_store();
        assert!(!store.check_checksum());
    }

    #[test]
    fn inisafe_section_is_not_hashed() {
        let mut a = sample_store();
        a.update_checksum();
        let before = a.to_string();
        // Re-stamping must not change the checksums themselves.
        let mut b = ChecksummedTextStore::parse(&before);
        b.update_checksum();
        assert_eq!(before, b.to_string());
    }

    #[test]
    fn typed_lookups_default_on_absence() {
        let store = sample_store();
        assert_eq!(store.integer("VARIABLE1", "ADDRESS", 0), 4096);
        assert_eq!(store.integer("VARIABLE1", "SIZE", 2), 2);
        assert_eq!(store.string("LIST", "DEVICE", ""), "ECU_A");
        assert!(store.boolean("LIST", "MISSING", true));
    }
}
