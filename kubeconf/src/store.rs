use std::env;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};
use tracing::debug;

use crate::error::ConfigError;
use crate::keyed::KeyedConfig;
use crate::model::KubeConfig;

/// The live kubeconfig on disk, plus its backup path and the scratch root
/// for per-invocation working files. All reads and writes of the active
/// configuration go through here.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
    backup_path: PathBuf,
    scratch_root: PathBuf,
}

impl ConfigStore {
    pub fn new(config_path: PathBuf, scratch_root: PathBuf) -> Self {
        let mut backup = config_path.clone().into_os_string();
        backup.push(".bak");

        Self {
            backup_path: backup.into(),
            config_path,
            scratch_root,
        }
    }

    /// First `KUBECONFIG` entry if set, else `<home>/.kube/config`. Scratch
    /// files live under `<home>/.kube/cache/import`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let kube_dir = crate::kube_dir()?;
        let config_path = env::var_os("KUBECONFIG")
            .and_then(|paths| {
                env::split_paths(&paths).find(|p| !p.as_os_str().is_empty())
            })
            .unwrap_or_else(|| kube_dir.join("config"));

        Ok(Self::new(
            config_path,
            kube_dir.join("cache").join("import"),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Missing file reads as an empty configuration, so a first-ever import
    /// starts from nothing instead of failing.
    pub fn load(&self) -> Result<KubeConfig, ConfigError> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no active configuration yet");
            return Ok(KubeConfig::default());
        }
        KubeConfig::read_from(&self.config_path)
    }

    pub fn load_keyed(&self) -> Result<KeyedConfig, ConfigError> {
        self.load().map(KeyedConfig::from)
    }

    /// Byte-for-byte copy of the live file to `<config>.bak`, overwriting any
    /// prior backup. A no-op when there is nothing to back up.
    pub fn backup(&self) -> Result<(), ConfigError> {
        if !self.config_path.exists() {
            return Ok(());
        }

        fs::copy(&self.config_path, &self.backup_path)
            .map_err(|source| ConfigError::io("backing up", &self.config_path, source))?;
        debug!(backup = %self.backup_path.display(), "backed up active configuration");
        Ok(())
    }

    /// Atomically replace the live file: write to a temp file in the same
    /// directory, then rename over it. The rename is the only mutation the
    /// live path ever sees.
    pub fn replace(&self, contents: &str) -> Result<(), ConfigError> {
        let dir = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| ConfigError::io("creating", dir, source))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|source| ConfigError::io("creating temp file in", dir, source))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|source| ConfigError::io("writing", tmp.path().to_path_buf(), source))?;
        tmp.persist(&self.config_path)
            .map_err(|e| ConfigError::io("replacing", &self.config_path, e.error))?;

        debug!(path = %self.config_path.display(), "replaced active configuration");
        Ok(())
    }

    pub fn save(&self, config: &KubeConfig) -> Result<(), ConfigError> {
        self.replace(&config.to_yaml()?)
    }

    /// Per-invocation scratch directory under the cache root. Removed on
    /// drop, on every exit path.
    pub fn scratch_dir(&self) -> Result<TempDir, ConfigError> {
        fs::create_dir_all(&self.scratch_root)
            .map_err(|source| ConfigError::io("creating", &self.scratch_root, source))?;
        tempfile::Builder::new()
            .prefix("import-")
            .tempdir_in(&self.scratch_root)
            .map_err(|source| ConfigError::io("creating scratch dir in", &self.scratch_root, source))
    }
}
