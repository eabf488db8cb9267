//! Data directory resolution
//!
//! All tools operate on one data directory holding the spreadsheet, the JSON
//! item store, and the backups. Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CMA_DATA_DIR` environment variable
//! 3. `data_dir` key in the platform config file (`<config dir>/cma/config.toml`)
//! 4. `./data` relative to the working directory (fallback)

use crate::{Error, Result};
use std::path::{Path, PathBuf};

const ENV_VAR: &str = "CMA_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

/// Resolve the data directory from CLI argument, environment, config file,
/// or the compiled default, in that order.
pub fn resolve_data_dir(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = config_file_path() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml_content.parse::<toml::Table>() {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(data_dir);
                }
            }
        }
    }

    // Priority 4: Compiled default
    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Platform config file location (`~/.config/cma/config.toml` on Linux).
fn config_file_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("cma").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// Well-known file locations inside a resolved data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve from CLI argument / environment / config file.
    pub fn resolve(cli_arg: Option<&Path>) -> Self {
        Self::new(resolve_data_dir(cli_arg))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The canonical JSON item store (`data/items.json`).
    pub fn items_file(&self) -> PathBuf {
        self.root.join("items.json")
    }

    /// Backup directory; backups are never auto-deleted.
    pub fn backups_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    /// Default workbook location when none is given on the command line.
    pub fn workbook_file(&self) -> PathBuf {
        self.root.join("activities.xlsx")
    }

    /// Create the data and backup directories if missing.
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.backups_dir())?;
        Ok(())
    }
}
