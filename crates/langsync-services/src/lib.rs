//! Orchestration layer over the parser and data model crates.
//! Exposes the entry points the CLI uses: file collection, tree mapping,
//! key diffing, reconciliation and reference snapshot providers.

pub use langsync_core::{DiffResult, LangSyncError, Result, RunSummary};

pub mod collect;
pub mod diff;
pub mod mapping;
pub mod reconcile;
pub mod source;
pub mod util;

pub use collect::collect_phrase_files;
pub use diff::{diff_phrase_files, diff_phrases};
pub use mapping::{to_reference_path, to_translated_path};
pub use reconcile::{reconcile, ReconcileOptions};
pub use source::{
    download_file, http_client, release_tags, ArchiveSnapshot, ArchiveSource, ExistingCheckout,
    SourceProvider,
};
pub use util::is_locale_folder;
