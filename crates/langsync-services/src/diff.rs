use langsync_core::{DiffResult, PhraseFile, Result};
use langsync_parsers_ini::parse_phrase_file;
use std::path::Path;

/// Compare the key sets of a translated file and its reference file.
/// Values are never compared.
pub fn diff_phrases(translated: &PhraseFile, reference: &PhraseFile) -> DiffResult {
    let obsolete = translated
        .keys()
        .filter(|k| !reference.contains_key(k))
        .map(str::to_string)
        .collect();
    let missing = reference
        .phrases
        .iter()
        .filter(|(k, _)| !translated.contains_key(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    DiffResult {
        obsolete,
        missing,
        translated_phrases: translated.len(),
    }
}

/// Parse both files and diff them. Either file failing to parse fails the call.
pub fn diff_phrase_files(translated: &Path, reference: &Path) -> Result<DiffResult> {
    let translated = parse_phrase_file(translated)?;
    let reference = parse_phrase_file(reference)?;
    Ok(diff_phrases(&translated, &reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use langsync_core::LangSyncError;

    fn file(pairs: &[(&str, &str)]) -> PhraseFile {
        let mut f = PhraseFile::new("x.ini");
        for (k, v) in pairs {
            f.insert(*k, *v);
        }
        f
    }

    #[test]
    fn classifies_obsolete_and_missing() {
        let translated = file(&[("GREETING", "Hi"), ("OLD", "x")]);
        let reference = file(&[("GREETING", "Hi"), ("NEWKEY", "y")]);

        let diff = diff_phrases(&translated, &reference);
        assert_eq!(diff.obsolete.iter().collect::<Vec<_>>(), vec!["OLD"]);
        assert_eq!(
            diff.missing.iter().collect::<Vec<_>>(),
            vec![(&"NEWKEY".to_string(), &"y".to_string())]
        );
        assert!(diff.is_changed());
        assert_eq!(diff.translated_phrases, 2);
    }

    #[test]
    fn differing_values_do_not_count() {
        let diff = diff_phrases(&file(&[("A", "Cześć")]), &file(&[("A", "Hello")]));
        assert!(!diff.is_changed());
        assert_eq!(diff.translated_phrases, 1);
    }

    #[test]
    fn obsolete_and_missing_never_overlap() {
        let translated = file(&[("A", ""), ("B", ""), ("C", ""), ("c", "")]);
        let reference = file(&[("B", ""), ("C", ""), ("D", ""), ("a", "")]);
        let diff = diff_phrases(&translated, &reference);
        for key in &diff.obsolete {
            assert!(!diff.missing.contains_key(key));
        }
        assert_eq!(diff.obsolete.len(), 2);
        assert_eq!(diff.missing.len(), 2);
    }

    #[test]
    fn unparsable_file_fails_the_diff() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.ini");
        let bad = dir.path().join("bad.ini");
        std::fs::write(&good, "A=\"1\"\n").unwrap();
        std::fs::write(&bad, "A=\"1\"\nthis line is broken\n").unwrap();

        let err = diff_phrase_files(&good, &bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LangSyncError>(),
            Some(LangSyncError::Parse { .. })
        ));
        assert!(diff_phrase_files(&bad, &good).is_err());
        assert!(!diff_phrase_files(&good, &good).unwrap().is_changed());
    }
}
