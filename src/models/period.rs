//! Budget period representation
//!
//! A period is an explicit, inclusive date range together with the income
//! declared for it and the per-category spending plan.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::allocation::CategoryAllocation;
use super::bucket::Methodology;
use super::ids::{BudgetPeriodId, CategoryId};
use super::income::IncomeSource;
use super::money::Money;

/// An inclusive `[start, end]` date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Check if a date falls within this range, both ends included
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Closed-interval intersection; sharing a boundary day counts
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Smallest range covering both
    pub fn union(&self, other: &DateRange) -> DateRange {
        DateRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The range of equal length starting the day after this one ends
    pub fn following(&self) -> DateRange {
        let start = self.end + Duration::days(1);
        DateRange {
            start,
            end: start + (self.end - self.start),
        }
    }

    /// Parse "2025-01-01..2025-01-31"
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let (start, end) = s.trim().split_once("..").unwrap_or((s, ""));
        Ok(Self {
            start: NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d")?,
            end: NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d")?,
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// A budget period with its income and allocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub id: BudgetPeriodId,

    #[serde(default)]
    pub methodology: Methodology,

    pub start_date: NaiveDate,

    /// Inclusive; must be strictly after `start_date`
    pub end_date: NaiveDate,

    /// Declared income in entry order
    #[serde(default)]
    pub income_sources: Vec<IncomeSource>,

    #[serde(default)]
    pub allocations: Vec<CategoryAllocation>,
}

impl BudgetPeriod {
    /// Create an empty period over `[start_date, end_date]`
    pub fn new(methodology: Methodology, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: BudgetPeriodId::new(),
            methodology,
            start_date,
            end_date,
            income_sources: Vec::new(),
            allocations: Vec::new(),
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range().contains(date)
    }

    /// Add an income source, returning self for chaining
    pub fn with_income(mut self, source_name: impl Into<String>, amount: Money) -> Self {
        self.income_sources.push(IncomeSource::new(source_name, amount));
        self
    }

    /// Add an allocation bound to this period, returning self for chaining
    pub fn with_allocation(
        mut self,
        category_id: CategoryId,
        planned_amount: Money,
        carry_over_amount: Money,
    ) -> Self {
        let mut allocation = CategoryAllocation::new(category_id, planned_amount);
        allocation.carry_over_amount = carry_over_amount;
        allocation.budget_period_id = Some(self.id);
        self.allocations.push(allocation);
        self
    }

    pub fn allocation_for(&self, category_id: CategoryId) -> Option<&CategoryAllocation> {
        self.allocations
            .iter()
            .find(|a| a.category_id == Some(category_id))
    }

    pub fn total_income(&self) -> Money {
        self.income_sources.iter().map(|s| s.amount).sum()
    }

    pub fn total_planned(&self) -> Money {
        self.allocations.iter().map(|a| a.planned_amount).sum()
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.range(), self.methodology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let jan = DateRange::new(date(2025, 1, 1), date(2025, 1, 31));
        assert!(jan.contains(date(2025, 1, 1)));
        assert!(jan.contains(date(2025, 1, 31)));
        assert!(!jan.contains(date(2025, 2, 1)));
        assert!(!jan.contains(date(2024, 12, 31)));
    }

    #[test]
    fn test_shared_boundary_day_overlaps() {
        let a = DateRange::new(date(2025, 1, 1), date(2025, 1, 15));
        let b = DateRange::new(date(2025, 1, 15), date(2025, 1, 31));
        let c = DateRange::new(date(2025, 1, 16), date(2025, 1, 31));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_following_keeps_length() {
        let jan = DateRange::new(date(2025, 1, 1), date(2025, 1, 14));
        let next = jan.following();
        assert_eq!(next.start, date(2025, 1, 15));
        assert_eq!(next.end, date(2025, 1, 28));
        assert_eq!(next.days(), jan.days());
    }

    #[test]
    fn test_union() {
        let a = DateRange::new(date(2025, 1, 1), date(2025, 1, 31));
        let b = DateRange::new(date(2025, 1, 10), date(2025, 2, 10));
        assert_eq!(a.union(&b), DateRange::new(date(2025, 1, 1), date(2025, 2, 10)));
    }

    #[test]
    fn test_parse_range() {
        let range = DateRange::parse("2025-01-01..2025-01-31").unwrap();
        assert_eq!(range.start, date(2025, 1, 1));
        assert_eq!(range.end, date(2025, 1, 31));
        assert!(DateRange::parse("2025-01-01").is_err());
        assert_eq!(range.to_string(), "2025-01-01..2025-01-31");
    }

    #[test]
    fn test_builder_totals() {
        let food = CategoryId::new();
        let rent = CategoryId::new();
        let period = BudgetPeriod::new(Methodology::Envelope, date(2025, 1, 1), date(2025, 1, 31))
            .with_income("Salary", Money::from_units(3000))
            .with_income("Side gig", Money::from_units(250))
            .with_allocation(food, Money::from_units(400), Money::zero())
            .with_allocation(rent, Money::from_units(1200), Money::zero());

        assert_eq!(period.total_income(), Money::from_units(3250));
        assert_eq!(period.total_planned(), Money::from_units(1600));
        assert_eq!(
            period.allocation_for(food).unwrap().budget_period_id,
            Some(period.id)
        );
    }

    #[test]
    fn test_serialization() {
        let period = BudgetPeriod::new(Methodology::Percentage, date(2025, 1, 1), date(2025, 1, 31))
            .with_income("Salary", Money::from_units(3000));
        let json = serde_json::to_string(&period).unwrap();
        let back: BudgetPeriod = serde_json::from_str(&json).unwrap();
        assert_eq!(period, back);
    }
}
