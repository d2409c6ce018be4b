//! Core data models
//!
//! Periods, income, allocations, categories and transactions. These are
//! plain values; the rules that relate them live in [`crate::engine`].

pub mod allocation;
pub mod bucket;
pub mod category;
pub mod ids;
pub mod income;
pub mod money;
pub mod period;
pub mod transaction;

pub use allocation::CategoryAllocation;
pub use bucket::{Methodology, SpendingBucket};
pub use category::{Category, CategoryTree};
pub use ids::{AllocationId, BudgetPeriodId, CategoryId, IncomeSourceId, TransactionId};
pub use income::IncomeSource;
pub use money::Money;
pub use period::{BudgetPeriod, DateRange};
pub use transaction::Transaction;
