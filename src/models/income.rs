//! Income source model
//!
//! A named amount of income declared for one budget period.

use serde::{Deserialize, Serialize};

use super::ids::IncomeSourceId;
use super::money::Money;
use crate::engine::ValidationRules;
use crate::error::ValidationError;

/// One declared source of income within a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub id: IncomeSourceId,
    pub source_name: String,
    pub amount: Money,
}

impl IncomeSource {
    pub fn new(source_name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: IncomeSourceId::new(),
            source_name: source_name.into(),
            amount,
        }
    }

    /// Same name and amount under a fresh identifier
    pub fn duplicate(&self) -> Self {
        Self::new(self.source_name.clone(), self.amount)
    }

    /// Field-level checks: a name, and an amount above zero
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationRules::require_non_empty(&self.source_name, "sourceName")?;
        ValidationRules::require_positive(self.amount, &format!("income '{}'", self.source_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(IncomeSource::new("Salary", Money::from_units(3000)).validate().is_ok());

        assert_eq!(
            IncomeSource::new("", Money::from_units(1)).validate(),
            Err(ValidationError::RequiredFieldMissing("sourceName"))
        );
        assert!(matches!(
            IncomeSource::new("Salary", Money::zero()).validate(),
            Err(ValidationError::AmountInvalid(_))
        ));
        assert!(matches!(
            IncomeSource::new("Salary", Money::from_cents(-1)).validate(),
            Err(ValidationError::AmountInvalid(_))
        ));
    }

    #[test]
    fn test_duplicate_gets_fresh_id() {
        let original = IncomeSource::new("Salary", Money::from_units(3000));
        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.source_name, original.source_name);
        assert_eq!(copy.amount, original.amount);
    }
}
