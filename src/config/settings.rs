//! User settings for the budget engine
//!
//! One settings document per data directory, holding the needs/wants/savings
//! targets used by percentage reconciliation and the last period the user
//! looked at.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::paths::BudgetPaths;
use crate::engine::{BucketTargets, PercentageReconciler};
use crate::error::{BudgetError, BudgetResult, ValidationError};
use crate::models::BudgetPeriodId;

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_needs")]
    pub needs_percentage: Decimal,

    #[serde(default = "default_wants")]
    pub wants_percentage: Decimal,

    #[serde(default = "default_savings")]
    pub savings_percentage: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed_budget_period_id: Option<BudgetPeriodId>,

    /// Band around each target still reported as on target (1 bp = 0.01 points)
    #[serde(default)]
    pub target_tolerance_basis_points: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_needs() -> Decimal {
    BucketTargets::default().needs
}

fn default_wants() -> Decimal {
    BucketTargets::default().wants
}

fn default_savings() -> Decimal {
    BucketTargets::default().savings
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            needs_percentage: default_needs(),
            wants_percentage: default_wants(),
            savings_percentage: default_savings(),
            last_viewed_budget_period_id: None,
            target_tolerance_basis_points: 0,
        }
    }
}

impl UserSettings {
    /// Load settings from disk; on first access write the defaults and
    /// return them
    pub fn load_or_create(paths: &BudgetPaths) -> BudgetResult<Self> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: UserSettings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.validate()?;
            Ok(settings)
        } else {
            let settings = UserSettings::default();
            settings.save(paths)?;
            info!(path = %settings_path.display(), "created default settings");
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> BudgetResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn targets(&self) -> BucketTargets {
        BucketTargets::new(
            self.needs_percentage,
            self.wants_percentage,
            self.savings_percentage,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        PercentageReconciler::validate_allocation(
            self.needs_percentage,
            self.wants_percentage,
            self.savings_percentage,
        )
    }

    /// Replace the bucket targets; leaves the settings untouched if they
    /// are invalid
    pub fn set_targets(&mut self, targets: BucketTargets) -> Result<(), ValidationError> {
        targets.validate()?;
        self.needs_percentage = targets.needs;
        self.wants_percentage = targets.wants;
        self.savings_percentage = targets.savings;
        Ok(())
    }

    pub fn set_last_viewed(&mut self, period_id: Option<BudgetPeriodId>) {
        self.last_viewed_budget_period_id = period_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn create_paths() -> (TempDir, BudgetPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    #[test]
    fn test_default_settings() {
        let settings = UserSettings::default();
        assert_eq!(settings.targets(), BucketTargets::new(dec!(50), dec!(30), dec!(20)));
        assert_eq!(settings.target_tolerance_basis_points, 0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_first_access_persists_defaults() {
        let (_temp_dir, paths) = create_paths();
        assert!(!paths.is_initialized());

        let settings = UserSettings::load_or_create(&paths).unwrap();
        assert!(paths.is_initialized());
        assert_eq!(settings, UserSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, paths) = create_paths();
        let mut settings = UserSettings::load_or_create(&paths).unwrap();

        settings
            .set_targets(BucketTargets::new(dec!(60), dec!(25), dec!(15)))
            .unwrap();
        let period_id = BudgetPeriodId::new();
        settings.set_last_viewed(Some(period_id));
        settings.save(&paths).unwrap();

        let loaded = UserSettings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.needs_percentage, dec!(60));
        assert_eq!(loaded.last_viewed_budget_period_id, Some(period_id));
    }

    #[test]
    fn test_invalid_targets_not_applied() {
        let mut settings = UserSettings::default();
        let err = settings
            .set_targets(BucketTargets::new(dec!(-10), dec!(80), dec!(30)))
            .unwrap_err();

        assert_eq!(err, ValidationError::PercentageNegative(crate::models::SpendingBucket::Needs));
        assert_eq!(settings.targets(), BucketTargets::default());
    }

    #[test]
    fn test_corrupt_settings_rejected() {
        let (_temp_dir, paths) = create_paths();
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        let err = UserSettings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, BudgetError::Config(_)));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: UserSettings = serde_json::from_str(r#"{"schema_version": 1}"#).unwrap();
        assert_eq!(settings, UserSettings::default());
    }
}
