use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "langsync.toml";
pub const DEFAULT_REPO: &str = "joomla/joomla-cms";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_TARGET_LOCALE: &str = "pl-PL";
pub const DEFAULT_REFERENCE_LOCALE: &str = "en-GB";
pub const DEFAULT_ROOTS: &[&str] = &["administrator", "language", "api", "installation"];
pub const DEFAULT_EXTENSION: &str = "ini";
pub const DEFAULT_STATE_FILE: &str = ".test-against";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LangSyncConfig {
    /// GitHub `owner/name` of the reference project.
    pub repo: Option<String>,
    pub github_api: Option<String>,
    pub target_locale: Option<String>,
    pub reference_locale: Option<String>,
    /// Localization roots, relative to each tree.
    pub roots: Option<Vec<String>>,
    pub extension: Option<String>,
    pub snapshot_dir: Option<String>,
    pub state_file: Option<String>,
    pub ignore_obsolete: Option<bool>,
    pub http_timeout_secs: Option<u64>,
    pub log_dir: Option<String>,
}

impl LangSyncConfig {
    pub fn repo(&self) -> &str {
        self.repo.as_deref().unwrap_or(DEFAULT_REPO)
    }

    pub fn github_api(&self) -> &str {
        self.github_api.as_deref().unwrap_or(DEFAULT_GITHUB_API)
    }

    pub fn target_locale(&self) -> &str {
        self.target_locale.as_deref().unwrap_or(DEFAULT_TARGET_LOCALE)
    }

    pub fn reference_locale(&self) -> &str {
        self.reference_locale
            .as_deref()
            .unwrap_or(DEFAULT_REFERENCE_LOCALE)
    }

    pub fn roots(&self) -> Vec<String> {
        match &self.roots {
            Some(roots) => roots.clone(),
            None => DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    pub fn ignore_obsolete(&self) -> bool {
        self.ignore_obsolete.unwrap_or(false)
    }

    pub fn http_timeout_secs(&self) -> u64 {
        self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Where the reference snapshot lives; relative paths resolve against `root`.
    pub fn snapshot_dir(&self, root: &Path) -> PathBuf {
        match self.snapshot_dir.as_deref() {
            Some(dir) => resolve(root, dir),
            None => {
                let name = self.repo().rsplit('/').next().unwrap_or("reference");
                root.join("tmp").join(name)
            }
        }
    }

    pub fn state_file(&self, root: &Path) -> PathBuf {
        resolve(root, self.state_file.as_deref().unwrap_or(DEFAULT_STATE_FILE))
    }
}

fn resolve(root: &Path, p: &str) -> PathBuf {
    let path = Path::new(p);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Search order: CWD/langsync.toml, $CONFIG_DIR/langsync/langsync.toml.
/// Earlier files win field by field; environment overrides win over both.
pub fn load_config() -> Result<LangSyncConfig, ConfigError> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(CONFIG_FILE_NAME));
    }
    if let Some(base) = dirs::config_dir() {
        candidates.push(base.join("langsync").join(CONFIG_FILE_NAME));
    }
    let cfg = load_config_from(&candidates)?;
    Ok(apply_env_overrides(cfg, |name| std::env::var(name).ok()))
}

/// Merge the config files that exist among `paths`, first one winning.
pub fn load_config_from(paths: &[PathBuf]) -> Result<LangSyncConfig, ConfigError> {
    let mut merged = LangSyncConfig::default();
    for path in paths {
        if !path.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let cfg = toml::from_str::<LangSyncConfig>(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        merged = merge(merged, cfg);
    }
    Ok(merged)
}

pub fn apply_env_overrides(
    mut cfg: LangSyncConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> LangSyncConfig {
    if let Some(repo) = lookup("LANGSYNC_REPO").filter(|s| !s.is_empty()) {
        cfg.repo = Some(repo);
    }
    if let Some(api) = lookup("LANGSYNC_GITHUB_API").filter(|s| !s.is_empty()) {
        cfg.github_api = Some(api);
    }
    cfg
}

fn merge(mut a: LangSyncConfig, b: LangSyncConfig) -> LangSyncConfig {
    if a.repo.is_none() {
        a.repo = b.repo;
    }
    if a.github_api.is_none() {
        a.github_api = b.github_api;
    }
    if a.target_locale.is_none() {
        a.target_locale = b.target_locale;
    }
    if a.reference_locale.is_none() {
        a.reference_locale = b.reference_locale;
    }
    if a.roots.is_none() {
        a.roots = b.roots;
    }
    if a.extension.is_none() {
        a.extension = b.extension;
    }
    if a.snapshot_dir.is_none() {
        a.snapshot_dir = b.snapshot_dir;
    }
    if a.state_file.is_none() {
        a.state_file = b.state_file;
    }
    if a.ignore_obsolete.is_none() {
        a.ignore_obsolete = b.ignore_obsolete;
    }
    if a.http_timeout_secs.is_none() {
        a.http_timeout_secs = b.http_timeout_secs;
    }
    if a.log_dir.is_none() {
        a.log_dir = b.log_dir;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = LangSyncConfig::default();
        assert_eq!(cfg.repo(), "joomla/joomla-cms");
        assert_eq!(cfg.target_locale(), "pl-PL");
        assert_eq!(cfg.reference_locale(), "en-GB");
        assert_eq!(cfg.roots(), vec!["administrator", "language", "api", "installation"]);
        assert_eq!(cfg.extension(), "ini");
        assert!(!cfg.ignore_obsolete());
        assert_eq!(
            cfg.snapshot_dir(Path::new("/work")),
            PathBuf::from("/work/tmp/joomla-cms")
        );
        assert_eq!(
            cfg.state_file(Path::new("/work")),
            PathBuf::from("/work/.test-against")
        );
    }

    #[test]
    fn first_file_wins_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.toml");
        let global = dir.path().join("global.toml");
        std::fs::write(&local, "target_locale = \"de-DE\"\n").unwrap();
        std::fs::write(
            &global,
            "target_locale = \"fr-FR\"\nrepo = \"acme/cms\"\nroots = [\"language\"]\n",
        )
        .unwrap();

        let cfg = load_config_from(&[local, dir.path().join("absent.toml"), global]).unwrap();
        assert_eq!(cfg.target_locale(), "de-DE");
        assert_eq!(cfg.repo(), "acme/cms");
        assert_eq!(cfg.roots(), vec!["language"]);
        assert_eq!(
            cfg.snapshot_dir(Path::new("/work")),
            PathBuf::from("/work/tmp/cms")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("langsync.toml");
        std::fs::write(&path, "roots = \"not a list\"\n").unwrap();
        assert!(matches!(
            load_config_from(&[path]),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn env_overrides_win() {
        let cfg = LangSyncConfig {
            repo: Some("from/file".into()),
            ..Default::default()
        };
        let cfg = apply_env_overrides(cfg, |name| match name {
            "LANGSYNC_REPO" => Some("from/env".into()),
            "LANGSYNC_GITHUB_API" => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.repo(), "from/env");
        assert_eq!(cfg.github_api(), DEFAULT_GITHUB_API);
    }
}
