use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Failure kinds surfaced by a verification run. None of them is retried.
#[derive(Debug, Error)]
pub enum LangSyncError {
    /// No version identifier could be resolved from arguments or state.
    #[error("{0}")]
    Config(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error(
        "unable to parse {}{}: {reason}",
        path.display(),
        line.map(|l| format!(":{l}")).unwrap_or_default()
    )]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },
    #[error("cannot read directory tree at {}: {reason}", path.display())]
    Walk { path: PathBuf, reason: String },
    #[error("{} is not under {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// One parsed phrase file: a flat key -> raw value table.
///
/// Keys are case-sensitive. Inserting an existing key replaces its value, so
/// when a file repeats a key the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseFile {
    pub path: PathBuf,
    pub phrases: BTreeMap<String, String>,
}

impl PhraseFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            phrases: BTreeMap::new(),
        }
    }

    /// Returns the replaced value when `key` was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.phrases.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.phrases.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.phrases.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.phrases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Key-level differences between a translated file and its reference file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Keys only present in the translated file.
    pub obsolete: BTreeSet<String>,
    /// Keys only present in the reference file, with the reference text.
    pub missing: BTreeMap<String, String>,
    /// Number of keys in the translated file.
    pub translated_phrases: usize,
}

impl DiffResult {
    pub fn is_changed(&self) -> bool {
        !self.obsolete.is_empty() || !self.missing.is_empty()
    }
}

/// A translated file whose keys differ from its reference counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub translated: PathBuf,
    pub reference: PathBuf,
    pub obsolete: BTreeSet<String>,
    pub missing: BTreeMap<String, String>,
}

/// A file present on one side only, with the path it was expected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpairedFile {
    pub found: PathBuf,
    pub expected: PathBuf,
}

/// A key that disappeared from one file and is missing in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovedPhrase<'a> {
    pub key: &'a str,
    pub removed_from: &'a Path,
    pub moved_to: &'a Path,
}

/// Plain counters of a run, comparable across runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub total_phrases: usize,
    pub changed_files: usize,
    pub missing_phrases: usize,
    pub missing_files: usize,
    pub obsolete_phrases: usize,
    pub obsolete_files: usize,
}

/// One outcome of the translated-tree pass, indexing into
/// [`RunSummary::changes`] or [`RunSummary::obsolete_files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatedEvent {
    Changed(usize),
    Orphaned(usize),
}

/// Accumulator owned by a single reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub counters: Counters,
    /// Obsolete key -> translated file it was last seen in.
    pub obsolete_keys: BTreeMap<String, PathBuf>,
    /// Missing key -> translated file it should live in.
    pub missing_keys: BTreeMap<String, PathBuf>,
    pub changes: Vec<FileChange>,
    /// Translated files with no reference counterpart.
    pub obsolete_files: Vec<UnpairedFile>,
    /// Reference files that were never translated.
    pub missing_files: Vec<UnpairedFile>,
    /// Changed and orphaned translated files in walk order.
    pub translated_events: Vec<TranslatedEvent>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the diff of one file pair into the totals.
    pub fn record_diff(&mut self, translated: &Path, reference: &Path, diff: DiffResult) {
        self.counters.total_phrases += diff.translated_phrases;

        for key in &diff.obsolete {
            self.obsolete_keys
                .insert(key.clone(), translated.to_path_buf());
            self.counters.obsolete_phrases += 1;
        }
        for key in diff.missing.keys() {
            self.missing_keys.insert(key.clone(), translated.to_path_buf());
            self.counters.missing_phrases += 1;
        }

        if diff.is_changed() {
            self.counters.changed_files += 1;
            self.translated_events
                .push(TranslatedEvent::Changed(self.changes.len()));
            self.changes.push(FileChange {
                translated: translated.to_path_buf(),
                reference: reference.to_path_buf(),
                obsolete: diff.obsolete,
                missing: diff.missing,
            });
        }
    }

    pub fn record_obsolete_file(&mut self, translated: PathBuf, expected_reference: PathBuf) {
        self.counters.obsolete_files += 1;
        self.translated_events
            .push(TranslatedEvent::Orphaned(self.obsolete_files.len()));
        self.obsolete_files.push(UnpairedFile {
            found: translated,
            expected: expected_reference,
        });
    }

    pub fn record_missing_file(&mut self, reference: PathBuf, expected_translated: PathBuf) {
        self.counters.missing_files += 1;
        self.missing_files.push(UnpairedFile {
            found: reference,
            expected: expected_translated,
        });
    }

    /// Keys that are obsolete in one place and missing in another.
    pub fn moved_phrases(&self) -> Vec<MovedPhrase<'_>> {
        self.obsolete_keys
            .iter()
            .filter_map(|(key, removed_from)| {
                self.missing_keys.get(key).map(|moved_to| MovedPhrase {
                    key: key.as_str(),
                    removed_from: removed_from.as_path(),
                    moved_to: moved_to.as_path(),
                })
            })
            .collect()
    }

    /// Only missing phrases fail a run; obsolete ones never do.
    pub fn passed(&self) -> bool {
        self.counters.missing_phrases == 0
    }
}
