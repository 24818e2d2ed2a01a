use crate::Result;
use langsync_core::LangSyncError;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fmt::Display;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File written inside a snapshot recording which version it holds.
pub const VERSION_MARKER: &str = ".langsync-version";

/// Supplies the reference tree a translation is checked against.
pub trait SourceProvider {
    /// Make sure a local snapshot of `version` exists and return its root.
    ///
    /// Calling this again with the same version must not fetch anything.
    fn ensure_snapshot(&self, version: &str) -> Result<PathBuf>;
}

fn fetch_err(context: impl Display, e: impl Display) -> LangSyncError {
    LangSyncError::Fetch(format!("{context}: {e}"))
}

pub fn http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("langsync/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_err("http client", e))?;
    Ok(client)
}

/// A reference checkout that already exists on disk. Never fetches.
#[derive(Debug, Clone)]
pub struct ExistingCheckout {
    root: PathBuf,
}

impl ExistingCheckout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceProvider for ExistingCheckout {
    fn ensure_snapshot(&self, _version: &str) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(LangSyncError::Fetch(format!(
                "reference checkout {} does not exist",
                self.root.display()
            ))
            .into());
        }
        Ok(self.root.clone())
    }
}

#[derive(Debug, Clone)]
pub enum ArchiveSource {
    /// Tag archive of a GitHub repository (`owner/name`).
    GitHub { repo: String, timeout: Duration },
    /// A zip archive already on disk.
    File(PathBuf),
}

/// Snapshot materialized by extracting a release archive into `dir`.
#[derive(Debug, Clone)]
pub struct ArchiveSnapshot {
    dir: PathBuf,
    source: ArchiveSource,
}

impl ArchiveSnapshot {
    pub fn new(dir: impl Into<PathBuf>, source: ArchiveSource) -> Self {
        Self {
            dir: dir.into(),
            source,
        }
    }

    /// Version recorded in the snapshot's marker file, if any.
    pub fn snapshot_version(&self) -> Option<String> {
        fs::read_to_string(self.dir.join(VERSION_MARKER))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn obtain_archive(&self, version: &str, staging: &Path) -> Result<(PathBuf, bool)> {
        match &self.source {
            ArchiveSource::File(path) => Ok((path.clone(), false)),
            ArchiveSource::GitHub { repo, timeout } => {
                let url = format!("https://codeload.github.com/{repo}/zip/refs/tags/{version}");
                let name = repo.rsplit('/').next().unwrap_or("reference");
                let target = staging.join(format!("{name}-{version}.zip"));
                tracing::info!(event = "download_archive", url = %url, path = %target.display());
                let client = http_client(*timeout)?;
                download_file(&client, &url, &target)?;
                Ok((target, true))
            }
        }
    }
}

impl SourceProvider for ArchiveSnapshot {
    fn ensure_snapshot(&self, version: &str) -> Result<PathBuf> {
        if self.dir.exists() {
            match self.snapshot_version() {
                Some(found) if found == version => {
                    tracing::info!(event = "snapshot_current", version = version, path = %self.dir.display());
                    return Ok(self.dir.clone());
                }
                found => {
                    tracing::info!(event = "snapshot_stale", found = ?found, wanted = version);
                    fs::remove_dir_all(&self.dir)
                        .map_err(|e| fetch_err(format!("removing {}", self.dir.display()), e))?;
                }
            }
        }

        let staging = self
            .dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&staging)
            .map_err(|e| fetch_err(format!("creating {}", staging.display()), e))?;

        let (archive, downloaded) = self.obtain_archive(version, &staging)?;
        let extracted = extract_archive(&archive, &self.dir);
        if downloaded {
            if let Err(e) = fs::remove_file(&archive) {
                tracing::warn!(event = "archive_cleanup_failed", path = %archive.display(), error = %e);
            }
        }
        let files = extracted?;

        fs::write(self.dir.join(VERSION_MARKER), version)
            .map_err(|e| fetch_err(format!("writing {VERSION_MARKER}"), e))?;
        tracing::info!(event = "snapshot_ready", version = version, files = files, path = %self.dir.display());
        Ok(self.dir.clone())
    }
}

/// Download `url` into `path`, failing when no file exists afterwards.
pub fn download_file(client: &Client, url: &str, path: &Path) -> Result<()> {
    let mut resp = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_err(url, e))?;
    let mut file =
        fs::File::create(path).map_err(|e| fetch_err(format!("creating {}", path.display()), e))?;
    resp.copy_to(&mut file).map_err(|e| fetch_err(url, e))?;
    drop(file);
    ensure_downloaded(url, path)
}

fn ensure_downloaded(url: &str, path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(LangSyncError::Fetch(format!(
            "unable to download {url} to {}",
            path.display()
        ))
        .into());
    }
    Ok(())
}

/// Extract a zip archive into `dest`, dropping the single top-level directory
/// that tag archives wrap their content in. Returns the number of files written.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize> {
    let file = fs::File::open(archive).map_err(|e| fetch_err(archive.display(), e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| fetch_err(archive.display(), e))?;
    let top = common_top_level(&zip);

    fs::create_dir_all(dest).map_err(|e| fetch_err(dest.display(), e))?;
    let mut written = 0usize;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| fetch_err(archive.display(), e))?;
        let Some(name) = entry.enclosed_name().map(Path::to_path_buf) else {
            return Err(LangSyncError::Fetch(format!(
                "{}: entry {} escapes the archive root",
                archive.display(),
                entry.name()
            ))
            .into());
        };
        let rel = match &top {
            Some(prefix) => name.strip_prefix(prefix).unwrap_or(&name).to_path_buf(),
            None => name,
        };
        if rel.as_os_str().is_empty() {
            continue;
        }

        let out = dest.join(&rel);
        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(|e| fetch_err(out.display(), e))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| fetch_err(parent.display(), e))?;
        }
        let mut f = fs::File::create(&out).map_err(|e| fetch_err(out.display(), e))?;
        std::io::copy(&mut entry, &mut f).map_err(|e| fetch_err(out.display(), e))?;
        written += 1;
    }
    Ok(written)
}

fn common_top_level<R: Read + Seek>(zip: &zip::ZipArchive<R>) -> Option<PathBuf> {
    let mut top: Option<&str> = None;
    for name in zip.file_names() {
        let (first, _) = name.split_once('/')?;
        match top {
            None => top = Some(first),
            Some(t) if t == first => {}
            Some(_) => return None,
        }
    }
    top.map(PathBuf::from)
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Release tags of `repo`, newest first as the API returns them.
pub fn release_tags(client: &Client, api: &str, repo: &str) -> Result<Vec<String>> {
    let url = format!("{}/repos/{repo}/releases", api.trim_end_matches('/'));
    let body = client
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(|e| fetch_err(&url, e))?;
    parse_release_tags(&body).map_err(|e| fetch_err(&url, e).into())
}

fn parse_release_tags(body: &str) -> std::result::Result<Vec<String>, serde_json::Error> {
    let releases: Vec<Release> = serde_json::from_str(body)?;
    Ok(releases.into_iter().map(|r| r.tag_name).collect())
}
