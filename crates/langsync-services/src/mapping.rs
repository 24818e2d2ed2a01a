use crate::util::is_locale_folder;
use langsync_core::{LangSyncError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Path of the reference file a translated file corresponds to.
pub fn to_reference_path(
    translated: &Path,
    translated_root: &Path,
    reference_root: &Path,
    reference_locale: &str,
) -> Result<PathBuf> {
    map_between_trees(translated, translated_root, reference_root, reference_locale)
}

/// Path of the translated file a reference file corresponds to.
pub fn to_translated_path(
    reference: &Path,
    reference_root: &Path,
    translated_root: &Path,
    target_locale: &str,
) -> Result<PathBuf> {
    map_between_trees(reference, reference_root, translated_root, target_locale)
}

/// Re-root `path` from `from_root` onto `to_root`. When the file sits directly
/// in a locale folder, that folder is renamed to `locale`; any other file keeps
/// its relative directory.
fn map_between_trees(path: &Path, from_root: &Path, to_root: &Path, locale: &str) -> Result<PathBuf> {
    let rel = path
        .strip_prefix(from_root)
        .map_err(|_| LangSyncError::OutsideRoot {
            path: path.to_path_buf(),
            root: from_root.to_path_buf(),
        })?;

    let Some(file_name) = rel.file_name() else {
        return Ok(to_root.join(rel));
    };

    match rel.parent() {
        Some(dir) if dir.file_name().and_then(OsStr::to_str).is_some_and(is_locale_folder) => {
            let base = dir.parent().unwrap_or_else(|| Path::new(""));
            Ok(to_root.join(base).join(locale).join(file_name))
        }
        _ => Ok(to_root.join(rel)),
    }
}
