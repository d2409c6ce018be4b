//! Budget period validation
//!
//! Structural checks on a single period and the pairwise non-overlap rule
//! that period assignment relies on.

use tracing::warn;

use super::validation::ValidationRules;
use crate::error::ValidationError;
use crate::models::BudgetPeriod;

/// Validates budget periods in isolation and against their neighbours
pub struct PeriodValidator;

impl PeriodValidator {
    /// Dates strictly ordered, at least one income, every income well-formed
    pub fn validate_structure(period: &BudgetPeriod) -> Result<(), ValidationError> {
        ValidationRules::validate_date_range(period.start_date, period.end_date)?;

        if period.income_sources.is_empty() {
            return Err(ValidationError::NoIncome);
        }

        for source in &period.income_sources {
            if source.source_name.trim().is_empty() {
                return Err(ValidationError::AmountInvalid(
                    "income source has no name".into(),
                ));
            }
            ValidationRules::require_positive(
                source.amount,
                &format!("income '{}'", source.source_name),
            )?;
        }

        Ok(())
    }

    /// Reject the period if it shares any day with an existing one
    ///
    /// An existing period with the same id is the period being edited and is
    /// skipped. The first conflict found is reported with its bounds.
    pub fn validate_no_overlap(
        period: &BudgetPeriod,
        existing: &[BudgetPeriod],
    ) -> Result<(), ValidationError> {
        let range = period.range();

        let conflict = existing
            .iter()
            .filter(|other| other.id != period.id)
            .find(|other| range.overlaps(&other.range()));

        match conflict {
            Some(other) => {
                warn!(
                    period = %range,
                    conflicts_with = %other.range(),
                    "rejecting overlapping budget period"
                );
                Err(ValidationError::PeriodOverlap {
                    start: other.start_date,
                    end: other.end_date,
                })
            }
            None => Ok(()),
        }
    }
}
