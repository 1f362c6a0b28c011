//! Persistent credential store.
//!
//! The only thing persisted is the Tinify API key. Commands never touch the
//! file directly: they receive a [`ConfigRepository`] and go through
//! `load`/`save`.

use crate::constants::{CONFIG_APP_DIR, CONFIG_DIR_ENV, CONFIG_FILE_NAME, CONFIG_PARENT_DIR};
use crate::error::{NcliError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TinifyConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tinify: TinifyConfig,
}

impl Config {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            tinify: TinifyConfig {
                api_key: api_key.into(),
            },
        }
    }

    /// The stored key, if one has been cached.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.tinify.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

pub trait ConfigRepository {
    fn load(&self) -> Result<Config>;
    fn save(&self, config: &Config) -> Result<()>;
}

/// TOML file under the user's home directory, created on first access.
#[derive(Debug, Clone)]
pub struct FileConfigRepository {
    path: PathBuf,
}

impl FileConfigRepository {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            path: directory.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// `$NCLI_CONFIG_DIR` when set, otherwise `~/.nobu/cli-tools`.
    pub fn from_env() -> Result<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        Ok(Self::new(default_config_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !self.path.exists() {
            self.write(&Config::default())?;
        }
        Ok(())
    }

    fn write(&self, config: &Config) -> Result<()> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl ConfigRepository for FileConfigRepository {
    fn load(&self) -> Result<Config> {
        self.ensure_exists()?;
        let contents = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.write(config)
    }
}

pub fn default_config_dir() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or(NcliError::HomeDirNotFound)?;
    Ok(dirs
        .home_dir()
        .join(CONFIG_PARENT_DIR)
        .join(CONFIG_APP_DIR))
}

/// Keeps the configuration in memory; nothing touches the disk.
#[derive(Debug, Default)]
pub struct MemoryConfigRepository {
    config: Mutex<Config>,
}

impl MemoryConfigRepository {
    pub fn new(config: Config) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }

    pub fn snapshot(&self) -> Config {
        match self.config.lock() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ConfigRepository for MemoryConfigRepository {
    fn load(&self) -> Result<Config> {
        Ok(self.snapshot())
    }

    fn save(&self, config: &Config) -> Result<()> {
        let mut guard = match self.config.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = config.clone();
        Ok(())
    }
}
