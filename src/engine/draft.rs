//! Multi-step period creation
//!
//! A [`PeriodDraft`] holds everything entered so far and is never persisted
//! on its own. Each setter returns a new draft; [`PeriodDraft::advance`]
//! validates the current step before moving on. Only a draft that has
//! reached [`CreationStep::Committing`] can be written, and it goes through
//! [`ValidationRules::validate_period`] like any other period.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::validation::ValidationRules;
use crate::error::{BudgetError, BudgetResult, ValidationError};
use crate::models::{
    AllocationId, BudgetPeriod, BudgetPeriodId, CategoryAllocation, CategoryId, DateRange, IncomeSource,
    Methodology, Money,
};
use crate::storage::Repository;

/// Where a draft is in the creation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CreationStep {
    SelectingMethodology,
    SettingDateRange,
    EnteringIncome,
    SettingAllocations,
    Committing,
}

impl CreationStep {
    pub fn next(self) -> Self {
        match self {
            Self::SelectingMethodology => Self::SettingDateRange,
            Self::SettingDateRange => Self::EnteringIncome,
            Self::EnteringIncome => Self::SettingAllocations,
            Self::SettingAllocations | Self::Committing => Self::Committing,
        }
    }
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelectingMethodology => "selecting methodology",
            Self::SettingDateRange => "setting date range",
            Self::EnteringIncome => "entering income",
            Self::SettingAllocations => "setting allocations",
            Self::Committing => "committing",
        };
        f.write_str(name)
    }
}

/// How a creation flow ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    Persisted(BudgetPeriod),
    Aborted,
}

/// A planned amount that has not been bound to a period yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationDraft {
    pub category_id: Option<CategoryId>,
    pub planned_amount: Money,
    pub carry_over_amount: Money,
}

impl AllocationDraft {
    pub fn new(category_id: CategoryId, planned_amount: Money) -> Self {
        Self {
            category_id: Some(category_id),
            planned_amount,
            carry_over_amount: Money::zero(),
        }
    }
}

/// In-memory period under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDraft {
    /// Set when editing an existing period in place
    pub period_id: Option<BudgetPeriodId>,
    pub step: CreationStep,
    pub methodology: Option<Methodology>,
    pub date_range: Option<DateRange>,
    pub income_sources: Vec<IncomeSource>,
    pub allocations: Vec<AllocationDraft>,
}

impl Default for PeriodDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodDraft {
    pub fn new() -> Self {
        Self {
            period_id: None,
            step: CreationStep::SelectingMethodology,
            methodology: None,
            date_range: None,
            income_sources: Vec::new(),
            allocations: Vec::new(),
        }
    }

    /// Start an edit of a stored period; the id is kept so the overlap check
    /// skips the period's own previous version
    pub fn from_period(period: &BudgetPeriod) -> Self {
        Self {
            period_id: Some(period.id),
            step: CreationStep::SelectingMethodology,
            methodology: Some(period.methodology),
            date_range: Some(period.range()),
            income_sources: period.income_sources.clone(),
            allocations: period
                .allocations
                .iter()
                .map(|a| AllocationDraft {
                    category_id: a.category_id,
                    planned_amount: a.planned_amount,
                    carry_over_amount: a.carry_over_amount,
                })
                .collect(),
        }
    }

    pub fn with_methodology(&self, methodology: Methodology) -> Self {
        Self {
            methodology: Some(methodology),
            ..self.clone()
        }
    }

    pub fn with_date_range(&self, range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..self.clone()
        }
    }

    pub fn with_income(&self, source_name: impl Into<String>, amount: Money) -> Self {
        let mut next = self.clone();
        next.income_sources.push(IncomeSource::new(source_name, amount));
        next
    }

    /// Set the planned amount for a category, replacing any earlier entry
    pub fn with_allocation(&self, category_id: CategoryId, planned_amount: Money) -> Self {
        let mut next = self.clone();
        match next
            .allocations
            .iter_mut()
            .find(|a| a.category_id == Some(category_id))
        {
            Some(existing) => existing.planned_amount = planned_amount,
            None => next
                .allocations
                .push(AllocationDraft::new(category_id, planned_amount)),
        }
        next
    }

    /// Check the fields owned by `step`
    pub fn validate_step(&self, step: CreationStep) -> Result<(), ValidationError> {
        match step {
            CreationStep::SelectingMethodology => self
                .methodology
                .map(|_| ())
                .ok_or(ValidationError::RequiredFieldMissing("methodology")),
            CreationStep::SettingDateRange => {
                let range = self
                    .date_range
                    .ok_or(ValidationError::RequiredFieldMissing("dateRange"))?;
                ValidationRules::validate_date_range(range.start, range.end)
            }
            CreationStep::EnteringIncome => {
                if self.income_sources.is_empty() {
                    return Err(ValidationError::NoIncome);
                }
                self.income_sources
                    .iter()
                    .try_for_each(ValidationRules::validate_income_source)
            }
            CreationStep::SettingAllocations => {
                let mut seen = HashSet::new();
                for allocation in &self.allocations {
                    let category_id = allocation
                        .category_id
                        .ok_or(ValidationError::AllocationCategoryRequired)?;
                    if !seen.insert(category_id) {
                        return Err(ValidationError::DuplicateAllocation(category_id));
                    }
                    ValidationRules::require_non_negative(allocation.planned_amount, "planned amount")?;
                    ValidationRules::require_non_negative(
                        allocation.carry_over_amount,
                        "carry-over amount",
                    )?;
                }
                Ok(())
            }
            CreationStep::Committing => Ok(()),
        }
    }

    /// Validate the current step and return the draft at the next one
    pub fn advance(&self) -> Result<Self, ValidationError> {
        self.validate_step(self.step)?;
        let next = Self {
            step: self.step.next(),
            ..self.clone()
        };
        debug!(from = %self.step, to = %next.step, "period draft advanced");
        Ok(next)
    }

    /// Advance through every remaining step, stopping at the first failure
    pub fn advance_to_commit(&self) -> Result<Self, ValidationError> {
        let mut draft = self.clone();
        while draft.step != CreationStep::Committing {
            draft = draft.advance()?;
        }
        Ok(draft)
    }

    /// Assemble the period this draft describes
    pub fn build(&self) -> Result<BudgetPeriod, ValidationError> {
        let methodology = self
            .methodology
            .ok_or(ValidationError::RequiredFieldMissing("methodology"))?;
        let range = self
            .date_range
            .ok_or(ValidationError::RequiredFieldMissing("dateRange"))?;

        let mut period = BudgetPeriod::new(methodology, range.start, range.end);
        if let Some(id) = self.period_id {
            period.id = id;
        }
        period.income_sources = self.income_sources.clone();
        period.allocations = self
            .allocations
            .iter()
            .map(|a| CategoryAllocation {
                id: AllocationId::new(),
                category_id: a.category_id,
                budget_period_id: Some(period.id),
                planned_amount: a.planned_amount,
                carry_over_amount: a.carry_over_amount,
            })
            .collect();
        Ok(period)
    }

    pub fn abort(self) -> CreationOutcome {
        debug!(step = %self.step, "period draft aborted");
        CreationOutcome::Aborted
    }

    /// Validate against stored periods and write the period in one commit
    pub fn commit<R: Repository + ?Sized>(&self, repo: &R) -> BudgetResult<CreationOutcome> {
        if self.step != CreationStep::Committing {
            return Err(BudgetError::DraftNotReady(self.step.to_string()));
        }

        let period = self.build()?;
        let existing = repo.list_periods()?;
        ValidationRules::validate_period(&period, &existing)?;

        repo.commit_period(period.clone())?;
        Ok(CreationOutcome::Persisted(period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january_range() -> DateRange {
        DateRange::new(date(2025, 1, 1), date(2025, 1, 31))
    }

    fn complete_draft(food: CategoryId) -> PeriodDraft {
        PeriodDraft::new()
            .with_methodology(Methodology::Envelope)
            .with_date_range(january_range())
            .with_income("Salary", Money::from_units(3000))
            .with_allocation(food, Money::from_units(400))
    }

    fn create_test_store() -> (TempDir, JsonStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(temp_dir.path().join("budget.json")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_setters_do_not_mutate_original() {
        let empty = PeriodDraft::new();
        let with_method = empty.with_methodology(Methodology::Percentage);
        assert!(empty.methodology.is_none());
        assert_eq!(with_method.methodology, Some(Methodology::Percentage));
    }

    #[test]
    fn test_each_step_gates_the_next() {
        let draft = PeriodDraft::new();
        assert_eq!(
            draft.advance(),
            Err(ValidationError::RequiredFieldMissing("methodology"))
        );

        let draft = draft.with_methodology(Methodology::ZeroBased).advance().unwrap();
        assert_eq!(draft.step, CreationStep::SettingDateRange);
        assert_eq!(
            draft.advance(),
            Err(ValidationError::RequiredFieldMissing("dateRange"))
        );

        let backwards = DateRange::new(date(2025, 1, 31), date(2025, 1, 1));
        assert!(matches!(
            draft.with_date_range(backwards).advance(),
            Err(ValidationError::InvalidDateRange(_))
        ));

        let draft = draft.with_date_range(january_range()).advance().unwrap();
        assert_eq!(draft.step, CreationStep::EnteringIncome);
        assert_eq!(draft.advance(), Err(ValidationError::NoIncome));

        let draft = draft
            .with_income("Salary", Money::from_units(100))
            .advance()
            .unwrap();
        assert_eq!(draft.step, CreationStep::SettingAllocations);

        let draft = draft.advance().unwrap();
        assert_eq!(draft.step, CreationStep::Committing);
    }

    #[test]
    fn test_allocation_step_checks() {
        let food = CategoryId::new();
        let mut draft = complete_draft(food);
        draft.step = CreationStep::SettingAllocations;

        let mut missing = draft.clone();
        missing.allocations.push(AllocationDraft {
            category_id: None,
            planned_amount: Money::zero(),
            carry_over_amount: Money::zero(),
        });
        assert_eq!(
            missing.advance(),
            Err(ValidationError::AllocationCategoryRequired)
        );

        let mut duplicate = draft.clone();
        duplicate.allocations.push(AllocationDraft::new(food, Money::from_units(1)));
        assert_eq!(
            duplicate.advance(),
            Err(ValidationError::DuplicateAllocation(food))
        );

        let negative = draft.with_allocation(food, Money::from_cents(-1));
        assert!(matches!(negative.advance(), Err(ValidationError::AmountInvalid(_))));
    }

    #[test]
    fn test_with_allocation_replaces_same_category() {
        let food = CategoryId::new();
        let draft = complete_draft(food).with_allocation(food, Money::from_units(500));
        assert_eq!(draft.allocations.len(), 1);
        assert_eq!(draft.allocations[0].planned_amount, Money::from_units(500));
    }

    #[test]
    fn test_commit_requires_committing_step() {
        let (_temp_dir, store) = create_test_store();
        let draft = complete_draft(CategoryId::new());

        assert!(matches!(
            draft.commit(&store),
            Err(BudgetError::DraftNotReady(_))
        ));
        assert!(store.list_periods().unwrap().is_empty());
    }

    #[test]
    fn test_commit_persists_period_with_children() {
        let (_temp_dir, store) = create_test_store();
        let food = CategoryId::new();
        let draft = complete_draft(food).advance_to_commit().unwrap();

        let outcome = draft.commit(&store).unwrap();
        let CreationOutcome::Persisted(period) = outcome else {
            panic!("expected a persisted period");
        };

        let stored = store.get_period(period.id).unwrap();
        assert_eq!(stored.income_sources.len(), 1);
        assert_eq!(stored.allocations.len(), 1);
        assert_eq!(stored.allocations[0].budget_period_id, Some(period.id));
        assert_eq!(stored.allocations[0].category_id, Some(food));
    }

    #[test]
    fn test_commit_rejects_overlap() {
        let (_temp_dir, store) = create_test_store();
        let first = complete_draft(CategoryId::new()).advance_to_commit().unwrap();
        first.commit(&store).unwrap();

        let second = complete_draft(CategoryId::new())
            .with_date_range(DateRange::new(date(2025, 1, 31), date(2025, 2, 27)))
            .advance_to_commit()
            .unwrap();
        let err = second.commit(&store).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::PeriodOverlap { .. })
        ));
        assert_eq!(store.list_periods().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_in_place_skips_own_bounds() {
        let (_temp_dir, store) = create_test_store();
        let draft = complete_draft(CategoryId::new()).advance_to_commit().unwrap();
        let CreationOutcome::Persisted(period) = draft.commit(&store).unwrap() else {
            panic!("expected a persisted period");
        };

        let edited = PeriodDraft::from_period(&period)
            .with_date_range(DateRange::new(date(2025, 1, 1), date(2025, 2, 2)))
            .advance_to_commit()
            .unwrap();
        edited.commit(&store).unwrap();

        let periods = store.list_periods().unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].end_date, date(2025, 2, 2));
    }

    #[test]
    fn test_abort() {
        let draft = complete_draft(CategoryId::new());
        assert_eq!(draft.abort(), CreationOutcome::Aborted);
    }
}
