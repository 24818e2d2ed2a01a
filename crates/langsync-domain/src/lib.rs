use langsync_core::{Counters, RunSummary, UnpairedFile};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingPhrase {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    pub reference: String,
    pub obsolete: Vec<String>,
    pub missing: Vec<MissingPhrase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpairedPath {
    pub path: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedKey {
    pub key: String,
    pub from: String,
    pub to: String,
}

/// Machine-readable form of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportJson {
    pub schema_version: u32,
    pub version: Option<String>,
    pub passed: bool,
    pub ignore_obsolete: bool,
    pub counters: Counters,
    pub changed_files: Vec<FileDiff>,
    pub obsolete_files: Vec<UnpairedPath>,
    pub missing_files: Vec<UnpairedPath>,
    pub moved: Vec<MovedKey>,
}

fn unpaired(files: &[UnpairedFile]) -> Vec<UnpairedPath> {
    files
        .iter()
        .map(|f| UnpairedPath {
            path: f.found.display().to_string(),
            expected: f.expected.display().to_string(),
        })
        .collect()
}

impl ReportJson {
    /// With `ignore_obsolete` the per-file obsolete key lists are left out;
    /// counters are reported unchanged.
    pub fn from_summary(summary: &RunSummary, version: Option<&str>, ignore_obsolete: bool) -> Self {
        let changed_files = summary
            .changes
            .iter()
            .map(|c| FileDiff {
                path: c.translated.display().to_string(),
                reference: c.reference.display().to_string(),
                obsolete: if ignore_obsolete {
                    Vec::new()
                } else {
                    c.obsolete.iter().cloned().collect()
                },
                missing: c
                    .missing
                    .iter()
                    .map(|(key, value)| MissingPhrase {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect(),
            })
            .collect();

        let moved = summary
            .moved_phrases()
            .into_iter()
            .map(|m| MovedKey {
                key: m.key.to_string(),
                from: m.removed_from.display().to_string(),
                to: m.moved_to.display().to_string(),
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            version: version.map(str::to_string),
            passed: summary.passed(),
            ignore_obsolete,
            counters: summary.counters,
            changed_files,
            obsolete_files: unpaired(&summary.obsolete_files),
            missing_files: unpaired(&summary.missing_files),
            moved,
        }
    }
}
