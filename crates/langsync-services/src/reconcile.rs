use crate::{
    collect::collect_phrase_files,
    diff::diff_phrase_files,
    mapping::{to_reference_path, to_translated_path},
    Result,
};
use langsync_core::RunSummary;
use std::path::PathBuf;

/// Layout of the two trees being compared.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub translated_root: PathBuf,
    pub reference_root: PathBuf,
    /// Localization roots, relative to both trees.
    pub roots: Vec<String>,
    pub extension: String,
    pub reference_locale: String,
    pub target_locale: String,
}

impl ReconcileOptions {
    fn translated_roots(&self) -> Vec<PathBuf> {
        self.roots.iter().map(|r| self.translated_root.join(r)).collect()
    }

    fn reference_roots(&self) -> Vec<PathBuf> {
        self.roots.iter().map(|r| self.reference_root.join(r)).collect()
    }
}

/// Run both passes over the trees and return the accumulated summary.
///
/// The first pass walks the translated tree and diffs every file that has a
/// reference counterpart. The second pass walks the reference tree only to
/// find files that were never translated. Moved phrases are derived from the
/// finished summary and do not alter its counters.
pub fn reconcile(opts: &ReconcileOptions) -> Result<RunSummary> {
    let mut run = Reconciler {
        opts,
        summary: RunSummary::new(),
    };
    run.translated_pass()?;
    run.reference_pass()?;
    Ok(run.finish())
}

struct Reconciler<'a> {
    opts: &'a ReconcileOptions,
    summary: RunSummary,
}

impl Reconciler<'_> {
    fn translated_pass(&mut self) -> Result<()> {
        let opts = self.opts;
        let files = collect_phrase_files(&opts.translated_roots(), &opts.extension)?;
        tracing::info!(event = "translated_pass", files = files.len());

        for translated in files {
            let reference = to_reference_path(
                &translated,
                &opts.translated_root,
                &opts.reference_root,
                &opts.reference_locale,
            )?;
            if !reference.is_file() {
                tracing::debug!(event = "obsolete_file", path = %translated.display(), expected = %reference.display());
                self.summary.record_obsolete_file(translated, reference);
                continue;
            }

            let diff = diff_phrase_files(&translated, &reference)?;
            if diff.is_changed() {
                tracing::debug!(
                    event = "file_changed",
                    path = %translated.display(),
                    obsolete = diff.obsolete.len(),
                    missing = diff.missing.len()
                );
            }
            self.summary.record_diff(&translated, &reference, diff);
        }
        Ok(())
    }

    fn reference_pass(&mut self) -> Result<()> {
        let opts = self.opts;
        let files = collect_phrase_files(&opts.reference_roots(), &opts.extension)?;
        tracing::info!(event = "reference_pass", files = files.len());

        for reference in files {
            let translated = to_translated_path(
                &reference,
                &opts.reference_root,
                &opts.translated_root,
                &opts.target_locale,
            )?;
            if !translated.is_file() {
                tracing::debug!(event = "missing_file", path = %translated.display(), reference = %reference.display());
                self.summary.record_missing_file(reference, translated);
            }
        }
        Ok(())
    }

    fn finish(self) -> RunSummary {
        let c = &self.summary.counters;
        tracing::info!(
            event = "reconciled",
            total = c.total_phrases,
            changed_files = c.changed_files,
            missing = c.missing_phrases,
            missing_files = c.missing_files,
            obsolete = c.obsolete_phrases,
            obsolete_files = c.obsolete_files,
            moved = self.summary.moved_phrases().len()
        );
        self.summary
    }
}
