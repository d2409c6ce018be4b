//! Spent, remaining and carry-over computation
//!
//! Spending for a category rolls up every descendant category, so a
//! purchase tagged "Groceries" counts against "Food".

use std::collections::HashMap;

use tracing::debug;

use crate::models::{
    BudgetPeriod, CategoryAllocation, CategoryId, CategoryTree, Money, Transaction,
};

/// Totals for a whole period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income: Money,
    pub planned: Money,
    pub spent: Money,
    /// Income minus spent
    pub remaining: Money,
}

/// Budget status of one allocation within its period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationSummary {
    pub category_id: Option<CategoryId>,
    pub planned: Money,
    pub carry_over: Money,
    pub available: Money,
    pub spent: Money,
    pub remaining: Money,
}

impl AllocationSummary {
    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Computes per-category and per-period money flows
pub struct AllocationEngine<'a> {
    tree: &'a CategoryTree,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(tree: &'a CategoryTree) -> Self {
        Self { tree }
    }

    /// Sum of totals for in-period transactions tagged with the category or
    /// any of its descendants
    ///
    /// A transaction tagged with both a category and a sub-category inside
    /// the rollup is counted once.
    pub fn spent_amount(
        &self,
        category_id: CategoryId,
        period: &BudgetPeriod,
        transactions: &[Transaction],
    ) -> Money {
        let rollup = self.tree.rollup_set(category_id);
        let range = period.range();

        let spent: Money = transactions
            .iter()
            .filter(|t| range.contains(t.date))
            .filter(|t| t.tagged_categories().any(|c| rollup.contains(&c)))
            .map(Transaction::total)
            .sum();

        debug!(category = %category_id, period = %range, %spent, "computed spent amount");
        spent
    }

    /// Planned plus carry-over minus spent; negative means over budget
    pub fn remaining_amount(allocation: &CategoryAllocation, spent: Money) -> Money {
        allocation.available() - spent
    }

    /// Surplus forwarded to the next period, floored at zero
    pub fn carry_over(previous_allocation: &CategoryAllocation, previous_spent: Money) -> Money {
        Self::remaining_amount(previous_allocation, previous_spent).floor_zero()
    }

    /// Spent and remaining for a single allocation
    pub fn allocation_summary(
        &self,
        allocation: &CategoryAllocation,
        period: &BudgetPeriod,
        transactions: &[Transaction],
    ) -> AllocationSummary {
        let spent = allocation
            .category_id
            .map(|c| self.spent_amount(c, period, transactions))
            .unwrap_or_default();

        AllocationSummary {
            category_id: allocation.category_id,
            planned: allocation.planned_amount,
            carry_over: allocation.carry_over_amount,
            available: allocation.available(),
            spent,
            remaining: Self::remaining_amount(allocation, spent),
        }
    }

    /// One summary per allocation, in allocation order
    pub fn period_summaries(
        &self,
        period: &BudgetPeriod,
        transactions: &[Transaction],
    ) -> Vec<AllocationSummary> {
        period
            .allocations
            .iter()
            .map(|a| self.allocation_summary(a, period, transactions))
            .collect()
    }

    /// Income, planned, spent across allocated categories, and what is left
    pub fn period_totals(&self, period: &BudgetPeriod, transactions: &[Transaction]) -> PeriodTotals {
        let income = period.total_income();
        let planned = period.total_planned();
        let spent: Money = period
            .allocations
            .iter()
            .filter_map(|a| a.category_id)
            .map(|c| self.spent_amount(c, period, transactions))
            .sum();

        PeriodTotals {
            income,
            planned,
            spent,
            remaining: income - spent,
        }
    }

    /// Next-period carry-over for every allocated category of `previous`
    pub fn carry_over_map(
        &self,
        previous: &BudgetPeriod,
        transactions: &[Transaction],
    ) -> HashMap<CategoryId, Money> {
        previous
            .allocations
            .iter()
            .filter_map(|a| {
                let category_id = a.category_id?;
                let spent = self.spent_amount(category_id, previous, transactions);
                Some((category_id, Self::carry_over(a, spent)))
            })
            .collect()
    }
}
