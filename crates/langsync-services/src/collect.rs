use langsync_core::{LangSyncError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect regular files whose extension is exactly `extension`
/// under every root.
///
/// Every root must exist. A missing root or any error while walking one
/// aborts the scan: a partial file list would hide missing translations.
pub fn collect_phrase_files<P: AsRef<Path>>(roots: &[P], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(LangSyncError::Walk {
                path: root.to_path_buf(),
                reason: "localization root does not exist".into(),
            }
            .into());
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| LangSyncError::Walk {
                path: e.path().unwrap_or(root).to_path_buf(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension() == Some(OsStr::new(extension)) {
                files.push(entry.into_path());
            }
        }
    }

    tracing::debug!(event = "collected", count = files.len(), extension = extension);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(base: &Path, rel: &str) {
        let p = base.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "A=\"1\"\n").unwrap();
    }

    #[test]
    fn filters_by_exact_extension() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "language/pl-PL/com_a.ini");
        touch(base, "language/pl-PL/com_a.sys.ini");
        touch(base, "language/pl-PL/upper.INI");
        touch(base, "language/pl-PL/notes.txt");
        touch(base, "language/pl-PL/deep/nested/x.ini");
        fs::create_dir_all(base.join("language/dir.ini")).unwrap();

        let files = collect_phrase_files(&[base.join("language")], "ini").unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            rel,
            vec![
                "language/pl-PL/com_a.ini",
                "language/pl-PL/com_a.sys.ini",
                "language/pl-PL/deep/nested/x.ini",
            ]
        );
    }

    fn roots(base: &Path) -> Vec<PathBuf> {
        ["administrator", "language", "api", "installation"]
            .iter()
            .map(|r| base.join(r))
            .collect()
    }

    #[test]
    fn walks_every_root_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "administrator/language/pl-PL/a.ini");
        touch(base, "api/language/pl-PL/b.ini");
        fs::create_dir_all(base.join("language")).unwrap();
        fs::create_dir_all(base.join("installation")).unwrap();

        let files = collect_phrase_files(&roots(base), "ini").unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("administrator/language/pl-PL/a.ini"));
        assert!(files[1].ends_with("api/language/pl-PL/b.ini"));
    }

    #[test]
    fn absent_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "administrator/language/pl-PL/a.ini");
        touch(base, "language/pl-PL/b.ini");

        let err = collect_phrase_files(&roots(base), "ini").unwrap_err();
        match err.downcast_ref::<LangSyncError>() {
            Some(LangSyncError::Walk { path, .. }) => assert_eq!(path, &base.join("api")),
            other => panic!("expected walk error, got {other:?}"),
        }
    }

    #[test]
    fn root_that_is_a_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("language"), "not a dir").unwrap();
        let err = collect_phrase_files(&[dir.path().join("language")], "ini").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LangSyncError>(),
            Some(LangSyncError::Walk { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subtree_aborts_the_walk() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch(base, "language/pl-PL/a.ini");
        touch(base, "language/locked/b.ini");
        let locked = base.join("language/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // permissions are not enforced for this user (root)
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = collect_phrase_files(&[base.join("language")], "ini");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LangSyncError>(),
            Some(LangSyncError::Walk { .. })
        ));
    }
}
