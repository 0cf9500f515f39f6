//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and selects where exports are
//! written and how long storage operations may wait on the database.

use crate::db::Db;
use crate::error::{ExportFault, StorageFault};
use crate::export::{Destination, DestinationPolicy};
use crate::{utils, Error, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const STORAGE_TIMEOUT_SECS: u64 = 5;
const CONFIG_JSON: &str = "config.json";
const EXPENSES_SQLITE: &str = "expenses.sqlite";
const EXPORTS: &str = "exports";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json`. It owns the
/// opened expense store for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
}

impl Config {
    /// Creates the data directory, writes an initial `config.json` and initializes a new,
    /// empty expense database.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    /// - Returns an error if a database already exists in `dir`.
    pub async fn create(dir: impl Into<PathBuf>, destination: DestinationPolicy) -> Result<Self> {
        let maybe_relative = dir.into();
        let root = async {
            utils::make_dir(&maybe_relative)
                .await
                .context("Unable to create the expenses home directory")?;
            utils::canonicalize(&maybe_relative).await
        }
        .await
        .map_err(Error::Config)?;

        // Refuse before touching config.json so an existing home is left exactly as it was.
        let db_path = root.join(EXPENSES_SQLITE);
        if db_path.exists() {
            return Err(StorageFault::AlreadyExists(db_path).into());
        }

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            destination,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await.map_err(Error::Config)?;

        let db = Db::init(db_path, config_file.storage_timeout()).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
        })
    }

    /// This will
    /// - validate that `expenses_home` exists and that the config file exists
    /// - load the config file
    /// - open the expense database, migrating it if needed
    pub async fn load(expenses_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = expenses_home.into();
        let (root, config_path, config_file) = async {
            let root = utils::canonicalize(&maybe_relative)
                .await
                .context("The expenses home directory is missing")?;
            let config_path = root.join(CONFIG_JSON);
            if !config_path.is_file() {
                bail!("The config file is missing '{}'", config_path.display())
            }
            let config_file = ConfigFile::load(&config_path).await?;
            anyhow::Ok((root, config_path, config_file))
        }
        .await
        .map_err(Error::Config)?;

        let db = Db::load(root.join(EXPENSES_SQLITE), config_file.storage_timeout()).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The expense store.
    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn destination_policy(&self) -> DestinationPolicy {
        self.config_file.destination
    }

    /// The app-private export directory, `$EXPENSES_HOME/exports`.
    pub fn exports_dir(&self) -> PathBuf {
        self.root.join(EXPORTS)
    }

    /// Resolves the configured destination policy to a directory.
    ///
    /// For `downloads`, `downloads_dir` from the config file wins over the platform default.
    pub fn destination(&self) -> std::result::Result<Destination, ExportFault> {
        let policy = self.destination_policy();
        let dir = match policy {
            DestinationPolicy::Private => self.exports_dir(),
            DestinationPolicy::Downloads => self
                .config_file
                .downloads_dir
                .clone()
                .map(|p| self.resolve(p))
                .or_else(dirs::download_dir)
                .ok_or(ExportFault::NoDestination)?,
        };
        Ok(Destination::new(dir, policy.intent()))
    }

    /// Checks if `p` is relative, and if so, resolves it against the home directory.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "destination": "downloads",
///   "downloads_dir": "/home/me/Downloads",
///   "storage_timeout_secs": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Where exports are written
    #[serde(default)]
    destination: DestinationPolicy,

    /// Overrides the platform downloads directory (relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    downloads_dir: Option<PathBuf>,

    /// Upper bound on how long a database operation waits for a lock or a connection
    #[serde(default = "default_storage_timeout_secs")]
    storage_timeout_secs: u64,
}

fn default_storage_timeout_secs() -> u64 {
    STORAGE_TIMEOUT_SECS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            destination: DestinationPolicy::default(),
            downloads_dir: None,
            storage_timeout_secs: STORAGE_TIMEOUT_SECS,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }
}
