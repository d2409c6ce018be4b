//! Needs/wants/savings reconciliation
//!
//! Compares how a period's spending splits across buckets with the
//! percentages the user declared. Computable under any methodology; callers
//! decide when to show it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::models::{BudgetPeriod, Money, SpendingBucket, Transaction};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Declared target percentage per bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTargets {
    pub needs: Decimal,
    pub wants: Decimal,
    pub savings: Decimal,
}

impl BucketTargets {
    pub fn new(needs: Decimal, wants: Decimal, savings: Decimal) -> Self {
        Self {
            needs,
            wants,
            savings,
        }
    }

    pub fn target(&self, bucket: SpendingBucket) -> Decimal {
        match bucket {
            SpendingBucket::Needs => self.needs,
            SpendingBucket::Wants => self.wants,
            SpendingBucket::Savings => self.savings,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        PercentageReconciler::validate_allocation(self.needs, self.wants, self.savings)
    }
}

impl Default for BucketTargets {
    /// The common 50/30/20 split
    fn default() -> Self {
        Self::new(Decimal::from(50), Decimal::from(30), Decimal::from(20))
    }
}

/// Where actual spending sits relative to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetStatus {
    OnTarget,
    OverTarget,
    UnderTarget,
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTarget => write!(f, "on target"),
            Self::OverTarget => write!(f, "over target"),
            Self::UnderTarget => write!(f, "under target"),
        }
    }
}

/// One bucket's line in a reconciliation report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketReport {
    pub bucket: SpendingBucket,
    pub spent: Money,
    pub actual_percentage: Decimal,
    pub target_percentage: Decimal,
    pub status: TargetStatus,
}

pub struct PercentageReconciler;

impl PercentageReconciler {
    /// Total of in-period transactions in `bucket`
    pub fn bucket_spending(
        bucket: SpendingBucket,
        period: &BudgetPeriod,
        transactions: &[Transaction],
    ) -> Money {
        let range = period.range();
        transactions
            .iter()
            .filter(|t| t.bucket == bucket && range.contains(t.date))
            .map(Transaction::total)
            .sum()
    }

    /// Bucket spending as a percentage of period income; zero when there is
    /// no income
    pub fn actual_percentage(
        bucket: SpendingBucket,
        period: &BudgetPeriod,
        transactions: &[Transaction],
    ) -> Decimal {
        let income = period.total_income();
        if income.is_zero() {
            return Decimal::ZERO;
        }
        let spent = Self::bucket_spending(bucket, period, transactions);
        spent.to_decimal() * ONE_HUNDRED / income.to_decimal()
    }

    /// On target when within `tolerance_basis_points` (hundredths of a
    /// percentage point) of the target
    pub fn compare_to_target(
        actual: Decimal,
        target: Decimal,
        tolerance_basis_points: u32,
    ) -> TargetStatus {
        let tolerance = Decimal::new(i64::from(tolerance_basis_points), 2);
        let diff = actual - target;
        if diff.abs() <= tolerance {
            TargetStatus::OnTarget
        } else if diff > Decimal::ZERO {
            TargetStatus::OverTarget
        } else {
            TargetStatus::UnderTarget
        }
    }

    /// Each percentage non-negative and the three summing to exactly 100
    pub fn validate_allocation(
        needs: Decimal,
        wants: Decimal,
        savings: Decimal,
    ) -> Result<(), ValidationError> {
        for (bucket, value) in [
            (SpendingBucket::Needs, needs),
            (SpendingBucket::Wants, wants),
            (SpendingBucket::Savings, savings),
        ] {
            if value < Decimal::ZERO {
                return Err(ValidationError::PercentageNegative(bucket));
            }
        }

        let sum = needs + wants + savings;
        if sum != ONE_HUNDRED {
            return Err(ValidationError::PercentageSumInvalid(sum));
        }
        Ok(())
    }

    /// Actual vs target for all three buckets
    pub fn reconcile(
        period: &BudgetPeriod,
        transactions: &[Transaction],
        targets: &BucketTargets,
        tolerance_basis_points: u32,
    ) -> Vec<BucketReport> {
        SpendingBucket::all()
            .iter()
            .map(|&bucket| {
                let actual = Self::actual_percentage(bucket, period, transactions);
                let target = targets.target(bucket);
                BucketReport {
                    bucket,
                    spent: Self::bucket_spending(bucket, period, transactions),
                    actual_percentage: actual,
                    target_percentage: target,
                    status: Self::compare_to_target(actual, target, tolerance_basis_points),
                }
            })
            .collect()
    }
}
