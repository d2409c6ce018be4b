//! Transaction model
//!
//! A single purchase. Which period it belongs to is derived from its date
//! each time it is needed and never stored on the transaction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bucket::SpendingBucket;
use super::ids::{CategoryId, TransactionId};
use super::money::Money;
use crate::engine::ValidationRules;
use crate::error::ValidationError;

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub date: NaiveDate,

    /// Pre-tax amount; must be positive
    pub sub_total: Money,

    #[serde(default)]
    pub tax: Option<Money>,

    pub merchant: String,

    pub bucket: SpendingBucket,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    #[serde(default)]
    pub sub_category_id: Option<CategoryId>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// Create an uncategorized transaction
    pub fn new(
        date: NaiveDate,
        sub_total: Money,
        merchant: impl Into<String>,
        bucket: SpendingBucket,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            sub_total,
            tax: None,
            merchant: merchant.into(),
            bucket,
            category_id: None,
            sub_category_id: None,
            description: None,
        }
    }

    pub fn with_tax(mut self, tax: Money) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_sub_category(mut self, sub_category_id: CategoryId) -> Self {
        self.sub_category_id = Some(sub_category_id);
        self
    }

    /// Sub-total plus tax, if any
    pub fn total(&self) -> Money {
        self.sub_total + self.tax.unwrap_or_default()
    }

    /// Category ids this transaction is tagged with
    pub fn tagged_categories(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.category_id.iter().chain(self.sub_category_id.iter()).copied()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationRules::require_positive(self.sub_total, "sub-total")?;
        if let Some(tax) = self.tax {
            ValidationRules::require_non_negative(tax, "tax")?;
        }
        ValidationRules::require_non_empty(&self.merchant, "merchant")
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.date.format("%Y-%m-%d"),
            self.merchant,
            self.total(),
            self.bucket
        )
    }
}
