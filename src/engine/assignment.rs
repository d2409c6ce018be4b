//! Transaction-to-period assignment
//!
//! Membership is derived from the transaction date every time, never
//! stored, so editing a period's bounds can't leave stale links behind.
//! A transaction outside every period is orphaned: a valid state that simply
//! keeps it out of period-scoped totals.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{BudgetPeriod, BudgetPeriodId, DateRange, Transaction, TransactionId};

/// The period a transaction resolves to after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub transaction_id: TransactionId,
    pub period_id: Option<BudgetPeriodId>,
}

pub struct AssignmentResolver;

impl AssignmentResolver {
    /// The period containing the transaction date, if any
    ///
    /// Periods are expected to be pairwise non-overlapping. If they are not,
    /// the match with the earliest start date wins (ties broken by id) so the
    /// result stays deterministic; that is a fallback, not a supported mode.
    pub fn assign<'p>(
        transaction: &Transaction,
        periods: &'p [BudgetPeriod],
    ) -> Option<&'p BudgetPeriod> {
        let mut matches = periods.iter().filter(|p| p.contains(transaction.date));
        let first = matches.next()?;

        let rest: Vec<&BudgetPeriod> = matches.collect();
        if rest.is_empty() {
            return Some(first);
        }

        warn!(
            transaction = %transaction.id,
            date = %transaction.date,
            matches = rest.len() + 1,
            "transaction date falls in overlapping periods"
        );
        std::iter::once(first)
            .chain(rest)
            .min_by_key(|p| (p.start_date, p.id))
    }

    /// True when no period covers the transaction date
    pub fn is_unassigned(transaction: &Transaction, periods: &[BudgetPeriod]) -> bool {
        Self::assign(transaction, periods).is_none()
    }

    /// Transactions that fall outside every period
    pub fn orphaned<'t>(
        transactions: &'t [Transaction],
        periods: &[BudgetPeriod],
    ) -> Vec<&'t Transaction> {
        let orphans: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| Self::is_unassigned(t, periods))
            .collect();
        debug!(count = orphans.len(), "found orphaned transactions");
        orphans
    }

    /// Transactions whose date falls inside `period`
    pub fn period_transactions<'t>(
        period: &BudgetPeriod,
        transactions: &'t [Transaction],
    ) -> Vec<&'t Transaction> {
        transactions
            .iter()
            .filter(|t| period.contains(t.date))
            .collect()
    }

    /// Group every transaction by the period it resolves to; orphans are
    /// left out
    pub fn assign_all<'t>(
        transactions: &'t [Transaction],
        periods: &[BudgetPeriod],
    ) -> HashMap<BudgetPeriodId, Vec<&'t Transaction>> {
        let mut grouped: HashMap<BudgetPeriodId, Vec<&Transaction>> = HashMap::new();
        for transaction in transactions {
            if let Some(period) = Self::assign(transaction, periods) {
                grouped.entry(period.id).or_default().push(transaction);
            }
        }
        grouped
    }

    /// Re-derive assignment for transactions touched by a period edit
    ///
    /// Every transaction dated within the old bounds or the new bounds of
    /// `changed` is resolved again against `periods`, which must already
    /// reflect the edit. Pass `previous_bounds = None` for a newly created
    /// period.
    pub fn reassign_on_period_change(
        previous_bounds: Option<DateRange>,
        changed: &BudgetPeriod,
        periods: &[BudgetPeriod],
        transactions: &[Transaction],
    ) -> Vec<Assignment> {
        let new_bounds = changed.range();
        let affected = |t: &&Transaction| {
            new_bounds.contains(t.date) || previous_bounds.is_some_and(|old| old.contains(t.date))
        };

        transactions
            .iter()
            .filter(affected)
            .map(|t| Assignment {
                transaction_id: t.id,
                period_id: Self::assign(t, periods).map(|p| p.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Methodology, Money, SpendingBucket};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(start: NaiveDate, end: NaiveDate) -> BudgetPeriod {
        BudgetPeriod::new(Methodology::ZeroBased, start, end)
            .with_income("Salary", Money::from_units(1000))
    }

    fn txn(on: NaiveDate) -> Transaction {
        Transaction::new(on, Money::from_units(10), "Cafe", SpendingBucket::Wants)
    }

    fn jan_feb() -> Vec<BudgetPeriod> {
        vec![
            period(date(2025, 1, 1), date(2025, 1, 31)),
            period(date(2025, 2, 1), date(2025, 2, 28)),
        ]
    }

    #[test]
    fn test_assigns_to_containing_period() {
        let periods = jan_feb();
        let found = AssignmentResolver::assign(&txn(date(2025, 1, 15)), &periods).unwrap();
        assert_eq!(found.id, periods[0].id);

        let found = AssignmentResolver::assign(&txn(date(2025, 2, 28)), &periods).unwrap();
        assert_eq!(found.id, periods[1].id);
    }

    #[test]
    fn test_outside_every_period_is_orphaned() {
        let periods = jan_feb();
        let march = txn(date(2025, 3, 1));
        assert!(AssignmentResolver::assign(&march, &periods).is_none());
        assert!(AssignmentResolver::is_unassigned(&march, &periods));

        let txns = vec![txn(date(2025, 1, 2)), march.clone()];
        let orphans = AssignmentResolver::orphaned(&txns, &periods);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, march.id);
    }

    #[test]
    fn test_overlapping_input_picks_earliest_start() {
        let late = period(date(2025, 1, 10), date(2025, 2, 10));
        let early = period(date(2025, 1, 1), date(2025, 1, 31));
        let periods = vec![late, early.clone()];

        let found = AssignmentResolver::assign(&txn(date(2025, 1, 15)), &periods).unwrap();
        assert_eq!(found.id, early.id);
    }

    #[test]
    fn test_assign_all_groups_by_period() {
        let periods = jan_feb();
        let txns = vec![
            txn(date(2025, 1, 1)),
            txn(date(2025, 1, 31)),
            txn(date(2025, 2, 14)),
            txn(date(2024, 12, 31)),
        ];

        let grouped = AssignmentResolver::assign_all(&txns, &periods);
        assert_eq!(grouped[&periods[0].id].len(), 2);
        assert_eq!(grouped[&periods[1].id].len(), 1);
        assert_eq!(grouped.values().map(Vec::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_period_transactions() {
        let periods = jan_feb();
        let txns = vec![txn(date(2025, 1, 5)), txn(date(2025, 2, 5))];
        let in_jan = AssignmentResolver::period_transactions(&periods[0], &txns);
        assert_eq!(in_jan.len(), 1);
        assert_eq!(in_jan[0].id, txns[0].id);
    }

    #[test]
    fn test_reassign_after_shrinking_period() {
        let mut periods = jan_feb();
        let old_bounds = periods[0].range();
        periods[0].end_date = date(2025, 1, 20);

        let early = txn(date(2025, 1, 10));
        let late = txn(date(2025, 1, 25));
        let feb = txn(date(2025, 2, 10));
        let txns = vec![early.clone(), late.clone(), feb];

        let changed = periods[0].clone();
        let result =
            AssignmentResolver::reassign_on_period_change(Some(old_bounds), &changed, &periods, &txns);

        assert_eq!(
            result,
            vec![
                Assignment {
                    transaction_id: early.id,
                    period_id: Some(changed.id),
                },
                Assignment {
                    transaction_id: late.id,
                    period_id: None,
                },
            ]
        );
    }

    #[test]
    fn test_reassign_new_period_claims_orphans() {
        let mut periods = jan_feb();
        let march_txn = txn(date(2025, 3, 3));
        let march = period(date(2025, 3, 1), date(2025, 3, 31));
        periods.push(march.clone());

        let result = AssignmentResolver::reassign_on_period_change(
            None,
            &march,
            &periods,
            &[march_txn.clone(), txn(date(2025, 1, 3))],
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].transaction_id, march_txn.id);
        assert_eq!(result[0].period_id, Some(march.id));
    }
}
