use crate::{APP_AUTHOR, APP_NAME, APP_QUALIFIER};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides every directory with one profile root, the way a media-center
/// host hands each add-on its own profile folder.
pub const HOME_ENV: &str = "WIMP_HOME";

const CONFIG_FILE: &str = "config.toml";
const SETTINGS_FILE: &str = "settings.toml";

/// Where the plugin keeps its config, persisted settings and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl AppDirs {
    /// `$WIMP_HOME` when set and non-empty, the platform project dirs otherwise.
    pub fn discover() -> Result<Self, DirsError> {
        match std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            Some(home) => Ok(Self::profile(Path::new(&home))),
            None => {
                let dirs = ProjectDirs::from(APP_QUALIFIER, APP_AUTHOR, APP_NAME)
                    .ok_or(DirsError::MissingProjectDirs)?;
                Ok(Self::from_roots(dirs.config_dir(), dirs.data_dir()))
            }
        }
    }

    /// Everything under a single profile directory.
    pub fn profile(home: &Path) -> Self {
        Self::from_roots(home, home)
    }

    pub fn from_roots(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            log_dir: data_dir.join("logs"),
        }
    }

    pub fn ensure_exists(&self) -> Result<(), DirsError> {
        for dir in [&self.config_dir, &self.data_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| DirsError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Default location of the persisted session settings.
    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

#[derive(Debug, Error)]
pub enum DirsError {
    #[error("no home directory to put wimp's config and settings in")]
    MissingProjectDirs,
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}
