//! Custom error types for the budget engine
//!
//! Two layers: [`ValidationError`] is what the engine's validators return and
//! carries the offending value so a caller can explain it; [`BudgetError`] is
//! the crate-wide error that also covers storage and configuration failures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{CategoryId, SpendingBucket};

/// A rule violation found while validating user-entered data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty
    #[error("{0} is required")]
    RequiredFieldMissing(&'static str),

    /// An amount is zero, negative, or otherwise out of range
    #[error("Invalid amount: {0}")]
    AmountInvalid(String),

    /// Start/end dates are not strictly ordered
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// The period intersects an existing one
    #[error("Budget period overlaps an existing period ({start} to {end})")]
    PeriodOverlap { start: NaiveDate, end: NaiveDate },

    /// A period was declared without any income source
    #[error("A budget period needs at least one income source")]
    NoIncome,

    /// Bucket percentages do not add up to 100
    #[error("Bucket percentages must sum to 100 (got {0})")]
    PercentageSumInvalid(Decimal),

    /// A bucket percentage is below zero
    #[error("{0} percentage cannot be negative")]
    PercentageNegative(SpendingBucket),

    /// An allocation has no category
    #[error("An allocation must reference a category")]
    AllocationCategoryRequired,

    /// An allocation has no budget period
    #[error("An allocation must reference a budget period")]
    AllocationBudgetPeriodRequired,

    /// Two allocations of one period target the same category
    #[error("Category {0} is allocated more than once in this period")]
    DuplicateAllocation(CategoryId),

    /// The category parent graph loops back on itself
    #[error("Category {0} is its own ancestor")]
    CategoryCycle(CategoryId),
}

impl ValidationError {
    /// Field errors are fixed by correcting one input field
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            Self::RequiredFieldMissing(_) | Self::AmountInvalid(_) | Self::InvalidDateRange(_)
        )
    }

    /// Cross-entity errors violate a relationship or aggregate rule
    pub fn is_cross_entity(&self) -> bool {
        !self.is_field_error()
    }
}

/// The main error type for budget engine operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Command-line input that could not be parsed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A period draft was committed before every step was completed
    #[error("Period draft is not ready to commit (still {0})")]
    DraftNotReady(String),
}

impl BudgetError {
    /// Create a "not found" error for budget periods
    pub fn period_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget period",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The underlying rule violation, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for budget engine operations
pub type BudgetResult<T> = Result<T, BudgetError>;
