//! Category allocation model
//!
//! How much is planned for one category within one period, plus any surplus
//! carried forward from the period before.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AllocationId, BudgetPeriodId, CategoryId};
use super::money::Money;
use crate::engine::ValidationRules;
use crate::error::ValidationError;

/// A planned amount for a category in a specific period
///
/// Both references are optional so that a half-entered allocation can be
/// represented and rejected with a precise error instead of failing to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub id: AllocationId,

    pub category_id: Option<CategoryId>,

    pub budget_period_id: Option<BudgetPeriodId>,

    pub planned_amount: Money,

    /// Surplus forwarded from the previous period; never negative
    #[serde(default)]
    pub carry_over_amount: Money,
}

impl CategoryAllocation {
    /// Create an allocation for a category, not yet bound to a period
    pub fn new(category_id: CategoryId, planned_amount: Money) -> Self {
        Self {
            id: AllocationId::new(),
            category_id: Some(category_id),
            budget_period_id: None,
            planned_amount,
            carry_over_amount: Money::zero(),
        }
    }

    pub fn with_carry_over(mut self, carry_over_amount: Money) -> Self {
        self.carry_over_amount = carry_over_amount;
        self
    }

    /// Total available before spending: planned plus carried-over surplus
    pub fn available(&self) -> Money {
        self.planned_amount + self.carry_over_amount
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category_id.is_none() {
            return Err(ValidationError::AllocationCategoryRequired);
        }
        if self.budget_period_id.is_none() {
            return Err(ValidationError::AllocationBudgetPeriodRequired);
        }
        ValidationRules::require_non_negative(self.planned_amount, "planned amount")?;
        ValidationRules::require_non_negative(self.carry_over_amount, "carry-over amount")
    }
}

impl fmt::Display for CategoryAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "planned: {} (carry-over: {})",
            self.planned_amount, self.carry_over_amount
        )
    }
}
