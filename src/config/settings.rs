//! User settings for Hearth Budget
//!
//! Manages household preferences: which household the data directory belongs
//! to, the first day of the week for dashboards, the default dashboard period,
//! and display/logging options.

use serde::{Deserialize, Serialize};

use super::paths::HearthPaths;
use crate::error::BudgetError;
use crate::models::{HouseholdId, PeriodType, WeekStart};

/// User settings for Hearth Budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Household this data directory belongs to (set by `hearth init`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<HouseholdId>,

    /// First day of the week for WEEK/FORTNIGHT dashboards
    #[serde(default)]
    pub week_starts_on: WeekStart,

    /// Default dashboard period ("week", "fortnight", "month", "year")
    ///
    /// Kept as text so a hand-edited value never fails the whole settings
    /// file; see [`Settings::default_period_type`].
    #[serde(default = "default_period")]
    pub default_period: String,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Log level for this crate when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Replay the whole ledger history after each CSV import
    #[serde(default = "default_true")]
    pub recompute_history_on_import: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_period() -> String {
    "week".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            household_id: None,
            week_starts_on: WeekStart::default(),
            default_period: default_period(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
            recompute_history_on_import: default_true(),
        }
    }
}

impl Settings {
    /// The configured default dashboard period, falling back to WEEK when the
    /// stored text is not a known period type
    pub fn default_period_type(&self) -> PeriodType {
        PeriodType::parse_or_week(&self.default_period)
    }

    /// The configured household, or a configuration error if `init` never ran
    pub fn require_household(&self) -> Result<HouseholdId, BudgetError> {
        self.household_id.ok_or_else(|| {
            BudgetError::Config("No household configured. Run 'hearth init' first.".into())
        })
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &HearthPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &HearthPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.week_starts_on, WeekStart::Monday);
        assert_eq!(settings.default_period_type(), PeriodType::Week);
        assert!(settings.household_id.is_none());
        assert!(settings.require_household().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.week_starts_on = WeekStart::Sunday;
        settings.default_period = "month".into();
        settings.household_id = Some(HouseholdId::new());

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.week_starts_on, WeekStart::Sunday);
        assert_eq!(loaded.default_period_type(), PeriodType::Month);
        assert_eq!(loaded.household_id, settings.household_id);
    }

    #[test]
    fn test_unknown_default_period_falls_back_to_week() {
        let settings: Settings =
            serde_json::from_str(r#"{"default_period": "quarter"}"#).unwrap();
        assert_eq!(settings.default_period_type(), PeriodType::Week);
        assert!(settings.recompute_history_on_import);
    }
}
