use crate::report::{Console, Level, TextReport};
use crate::state;
use color_eyre::eyre::Result;
use langsync_config::LangSyncConfig;
use langsync_core::LangSyncError;
use langsync_domain::ReportJson;
use langsync_services::{
    http_client, reconcile, release_tags, ArchiveSnapshot, ArchiveSource, ExistingCheckout,
    ReconcileOptions, SourceProvider,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub const EXIT_OK: i32 = 0;
pub const EXIT_MISSING_PHRASES: i32 = 1;
pub const EXIT_NO_VERSION: i32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct VerifyArgs {
    pub tag: Option<String>,
    pub ignore_obsolete: bool,
    pub root: PathBuf,
    pub reference_root: Option<PathBuf>,
    pub archive: Option<PathBuf>,
    pub target_locale: Option<String>,
    pub reference_locale: Option<String>,
    pub format: Format,
}

/// Print the upstream release tags, or a warning when they cannot be listed.
pub fn print_release_tags<W: Write>(console: &mut Console<W>, cfg: &LangSyncConfig) -> Result<()> {
    let tags = http_client(Duration::from_secs(cfg.http_timeout_secs()))
        .and_then(|client| release_tags(&client, cfg.github_api(), cfg.repo()));
    match tags {
        Ok(tags) => {
            console.line(Level::Info, "Available tags:")?;
            console.line(Level::Info, &tags.join(", "))?;
        }
        Err(e) => {
            tracing::warn!(event = "release_tags_failed", repo = cfg.repo(), error = %e);
            console.line(
                Level::Warn,
                &format!("Could not list release tags of {}: {e}", cfg.repo()),
            )?;
        }
    }
    Ok(())
}

fn no_version<W: Write>(console: &mut Console<W>, cfg: &LangSyncConfig, reason: &str) -> Result<i32> {
    console.blank()?;
    console.line(Level::Error, reason)?;
    console.line(
        Level::Info,
        &format!(
            "Pass a release tag of https://github.com/{} as an argument, e.g. `langsync 5.1.0`, \
             or write one into the state file.",
            cfg.repo()
        ),
    )?;
    console.blank()?;
    print_release_tags(console, cfg)?;
    Ok(EXIT_NO_VERSION)
}

/// Run one verification and return the process exit code.
pub fn run_verify<W: Write>(
    args: VerifyArgs,
    cfg: &LangSyncConfig,
    console: &mut Console<W>,
) -> Result<i32> {
    tracing::debug!(event = "verify_args", args = ?args);
    let root = args.root.clone();
    let ignore_obsolete = args.ignore_obsolete || cfg.ignore_obsolete();
    let state_file = cfg.state_file(&root);

    let version = match state::resolve_version(args.tag.as_deref(), &state_file) {
        Ok(Some(v)) => Some(v),
        Ok(None) if args.reference_root.is_some() => None,
        Ok(None) => return no_version(console, cfg, "Provide a tag name to test against."),
        Err(e) => {
            if let Some(LangSyncError::Config(msg)) = e.downcast_ref::<LangSyncError>() {
                return no_version(console, cfg, msg);
            }
            return Err(e);
        }
    };

    let explicit = args.tag.as_deref().is_some_and(|t| !t.trim().is_empty());
    if let Some(v) = version.as_deref().filter(|_| explicit) {
        if let Err(e) = state::remember_version(&state_file, v) {
            tracing::warn!(event = "state_write_failed", path = %state_file.display(), error = %e);
        }
    }

    let provider: Box<dyn SourceProvider> = match (&args.reference_root, &args.archive) {
        (Some(dir), _) => Box::new(ExistingCheckout::new(dir)),
        (None, Some(zip)) => Box::new(ArchiveSnapshot::new(
            cfg.snapshot_dir(&root),
            ArchiveSource::File(zip.clone()),
        )),
        (None, None) => Box::new(ArchiveSnapshot::new(
            cfg.snapshot_dir(&root),
            ArchiveSource::GitHub {
                repo: cfg.repo().to_string(),
                timeout: Duration::from_secs(cfg.http_timeout_secs()),
            },
        )),
    };
    let reference_root = provider.ensure_snapshot(version.as_deref().unwrap_or("local"))?;
    tracing::info!(event = "reference_ready", version = ?version, path = %reference_root.display());

    let opts = ReconcileOptions {
        translated_root: root.clone(),
        reference_root,
        roots: cfg.roots(),
        extension: cfg.extension().to_string(),
        reference_locale: args
            .reference_locale
            .unwrap_or_else(|| cfg.reference_locale().to_string()),
        target_locale: args
            .target_locale
            .unwrap_or_else(|| cfg.target_locale().to_string()),
    };
    let summary = reconcile(&opts)?;

    match args.format {
        Format::Text => TextReport {
            summary: &summary,
            translated_root: &root,
            ignore_obsolete,
        }
        .render(console)?,
        Format::Json => {
            let report = ReportJson::from_summary(&summary, version.as_deref(), ignore_obsolete);
            console.line(Level::Info, &serde_json::to_string_pretty(&report)?)?;
        }
    }

    Ok(if summary.passed() {
        EXIT_OK
    } else {
        EXIT_MISSING_PHRASES
    })
}
