//! Merge of `.rec` multi-language comment files into loaded variable lists.

use std::path::Path;

use kefex_variables::{VariableListCollection, MAX_COMMENT_LANGUAGES};

use crate::{ChecksummedTextStore, ProjectError};

/// Merge a `.rec` comment file into an already-loaded collection.
///
/// Each language section holds `ListName.VariableName=Comment` lines,
/// matched case-insensitively. Entries naming lists or variables outside the
/// current project are expected (shared comment files) and silently ignored.
/// A missing file is recoverable: callers should treat [ProjectError::CannotOpen]
/// as a warning and continue without comments.
pub fn merge_comments(
    rec_path: &Path,
    device: &str,
    collection: &mut VariableListCollection,
) -> Result<(), ProjectError> {
    let store = ChecksummedTextStore::load(rec_path)?;

    let declared = store.string("CONFIG", "DEVICE", "");
    if !declared.eq_ignore_ascii_case(device) {
        return Err(ProjectError::format_invalid(
            rec_path,
            format!("comment file is for device \"{}\", expected \"{}\"", declared, device),
        ));
    }

    let language_count = store.integer("CONFIG", "NUMOFLANG", 0).max(0) as usize;
    if language_count > MAX_COMMENT_LANGUAGES {
        return Err(ProjectError::format_invalid(
            rec_path,
            format!(
                "too many languages: {} (at most {})",
                language_count, MAX_COMMENT_LANGUAGES
            ),
        ));
    }

    for language in 0..language_count {
        let section_name = match store.value("CONFIG", &format!("LANGNAME{}", language + 1)) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let entries: Vec<(String, String)> = store
            .sections()
            .iter()
            .find(|section| section.name.eq_ignore_ascii_case(&section_name))
            .map(|section| section.directives.clone())
            .unwrap_or_default();

        for (key, comment) in entries {
            let (list_name, variable_name) = match key.split_once('.') {
                Some(split) => split,
                None => continue,
            };
            let list = match collection.list_by_name_ignore_case(list_name) {
                Some(list) => list,
                None => continue,
            };
            let variable = match list.variable_by_name_ignore_case(variable_name) {
                Some(variable) => variable,
                None => continue,
            };
            if variable.comments.len() <= language {
                variable.comments.resize(language + 1, String::new());
            }
            variable.comments[language] = comment;
        }
    }
    Ok(())
}
