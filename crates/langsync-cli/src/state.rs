use color_eyre::eyre::{Result, WrapErr};
use langsync_core::LangSyncError;
use std::path::Path;

/// Pick the version to test against: the explicit argument if given, else
/// the one remembered in `state_file`. `Ok(None)` means neither exists.
pub fn resolve_version(explicit: Option<&str>, state_file: &Path) -> Result<Option<String>> {
    if let Some(tag) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(tag.to_string()));
    }
    if !state_file.exists() {
        return Ok(None);
    }

    let remembered = std::fs::read_to_string(state_file)
        .wrap_err_with(|| format!("reading {}", state_file.display()))?;
    let remembered = remembered.trim();
    if remembered.is_empty() {
        return Err(LangSyncError::Config(format!(
            "{} is empty; put a release tag in it or pass one as an argument",
            state_file.display()
        ))
        .into());
    }
    Ok(Some(remembered.to_string()))
}

pub fn remember_version(state_file: &Path, version: &str) -> Result<()> {
    std::fs::write(state_file, format!("{version}\n"))
        .wrap_err_with(|| format!("writing {}", state_file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_version_wins() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join(".test-against");
        std::fs::write(&state, "4.4.0").unwrap();
        assert_eq!(
            resolve_version(Some("5.1.0"), &state).unwrap().as_deref(),
            Some("5.1.0")
        );
    }

    #[test]
    fn falls_back_to_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join(".test-against");
        assert_eq!(resolve_version(None, &state).unwrap(), None);
        assert_eq!(resolve_version(Some("  "), &state).unwrap(), None);

        remember_version(&state, "5.1.2").unwrap();
        assert_eq!(
            resolve_version(None, &state).unwrap().as_deref(),
            Some("5.1.2")
        );
    }

    #[test]
    fn empty_state_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join(".test-against");
        std::fs::write(&state, "\n").unwrap();
        let err = resolve_version(None, &state).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LangSyncError>(),
            Some(LangSyncError::Config(_))
        ));
    }
}
