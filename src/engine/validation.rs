//! Validation façade
//!
//! Every entity passes through here before it is handed to storage, whether
//! it was typed in by hand or prefilled from a previous period.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::percentage::{BucketTargets, PercentageReconciler};
use super::period::PeriodValidator;
use crate::error::ValidationError;
use crate::models::{
    BudgetPeriod, Category, CategoryAllocation, IncomeSource, Money, Transaction,
};

pub struct ValidationRules;

impl ValidationRules {
    pub fn require_non_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing(field));
        }
        Ok(())
    }

    /// Magnitude no larger than [`Money::MAX`]
    pub fn require_within_limit(amount: Money, what: &str) -> Result<(), ValidationError> {
        if !amount.is_within_limit() {
            return Err(ValidationError::AmountInvalid(format!(
                "{} exceeds the limit of {}",
                what,
                Money::MAX
            )));
        }
        Ok(())
    }

    pub fn require_positive(amount: Money, what: &str) -> Result<(), ValidationError> {
        Self::require_within_limit(amount, what)?;
        if !amount.is_positive() {
            return Err(ValidationError::AmountInvalid(format!(
                "{} must be greater than zero",
                what
            )));
        }
        Ok(())
    }

    pub fn require_non_negative(amount: Money, what: &str) -> Result<(), ValidationError> {
        Self::require_within_limit(amount, what)?;
        if amount.is_negative() {
            return Err(ValidationError::AmountInvalid(format!(
                "{} cannot be negative",
                what
            )));
        }
        Ok(())
    }

    pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidDateRange(format!(
                "end date {} must be after start date {}",
                end, start
            )));
        }
        Ok(())
    }

    pub fn validate_category(category: &Category) -> Result<(), ValidationError> {
        category.validate()
    }

    pub fn validate_income_source(source: &IncomeSource) -> Result<(), ValidationError> {
        source.validate()
    }

    pub fn validate_allocation(allocation: &CategoryAllocation) -> Result<(), ValidationError> {
        allocation.validate()
    }

    pub fn validate_transaction(transaction: &Transaction) -> Result<(), ValidationError> {
        transaction.validate()
    }

    pub fn validate_targets(targets: &BucketTargets) -> Result<(), ValidationError> {
        PercentageReconciler::validate_allocation(targets.needs, targets.wants, targets.savings)
    }

    /// At most one allocation per category within a period
    pub fn validate_unique_allocations(period: &BudgetPeriod) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for category_id in period.allocations.iter().filter_map(|a| a.category_id) {
            if !seen.insert(category_id) {
                return Err(ValidationError::DuplicateAllocation(category_id));
            }
        }
        Ok(())
    }

    /// Full check for a period about to be committed; stops at the first
    /// violation
    pub fn validate_period(
        period: &BudgetPeriod,
        existing: &[BudgetPeriod],
    ) -> Result<(), ValidationError> {
        PeriodValidator::validate_structure(period)?;
        for source in &period.income_sources {
            Self::validate_income_source(source)?;
        }
        for allocation in &period.allocations {
            Self::validate_allocation(allocation)?;
        }
        Self::validate_unique_allocations(period)?;
        PeriodValidator::validate_no_overlap(period, existing)
    }

    /// Every independent check on a period, each contributing its first
    /// violation, for callers that report all problems at once
    pub fn collect_period_violations(
        period: &BudgetPeriod,
        existing: &[BudgetPeriod],
    ) -> Vec<ValidationError> {
        let income = period
            .income_sources
            .iter()
            .try_for_each(Self::validate_income_source);
        let allocations = period
            .allocations
            .iter()
            .try_for_each(Self::validate_allocation);

        [
            PeriodValidator::validate_structure(period),
            income,
            allocations,
            Self::validate_unique_allocations(period),
            PeriodValidator::validate_no_overlap(period, existing),
        ]
        .into_iter()
        .filter_map(Result::err)
        .fold(Vec::new(), |mut acc, err| {
            if !acc.contains(&err) {
                acc.push(err);
            }
            acc
        })
    }
}
