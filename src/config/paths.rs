//! Path management for Hearth Budget
//!
//! Provides XDG-compliant path resolution for configuration and data files.
//!
//! ## Path Resolution Order
//!
//! 1. `HEARTH_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/hearth-budget` or `~/.config/hearth-budget`
//! 3. Windows: `%APPDATA%\hearth-budget`

use std::path::PathBuf;

use crate::error::BudgetError;

/// Manages all paths used by Hearth Budget
#[derive(Debug, Clone)]
pub struct HearthPaths {
    /// Base directory for all data
    base_dir: PathBuf,
}

impl HearthPaths {
    /// Create a new HearthPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = if let Ok(custom) = std::env::var("HEARTH_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create HearthPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to ledger.json (weekly rollover entries)
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("ledger.json")
    }

    pub fn rules_file(&self) -> PathBuf {
        self.data_dir().join("rules.json")
    }

    pub fn imports_file(&self) -> PathBuf {
        self.data_dir().join("imports.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Hearth Budget has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| BudgetError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("hearth-budget"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BudgetError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("hearth-budget"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.ledger_file(),
            temp_dir.path().join("data").join("ledger.json")
        );
    }
}
