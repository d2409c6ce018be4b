//! Storage layer
//!
//! The engine only reads through the [`Repository`] trait and writes whole
//! periods through [`Repository::commit_period`]. [`JsonStore`] is the
//! file-backed implementation used by the CLI.

pub mod file_io;
pub mod json_store;

pub use file_io::{read_json, write_json_atomic};
pub use json_store::JsonStore;

use crate::error::BudgetResult;
use crate::models::{
    BudgetPeriod, BudgetPeriodId, Category, CategoryId, CategoryTree, DateRange, Transaction,
    TransactionId,
};

/// Persistence collaborator for the budget engine
///
/// Implementations must make `commit_period` all-or-nothing: a period, its
/// income sources and its allocations become visible together or not at
/// all.
pub trait Repository {
    fn list_categories(&self) -> BudgetResult<Vec<Category>>;

    /// Periods ordered by start date
    fn list_periods(&self) -> BudgetResult<Vec<BudgetPeriod>>;

    fn get_period(&self, id: BudgetPeriodId) -> BudgetResult<BudgetPeriod>;

    /// All transactions, or only those dated within `bounds`
    fn list_transactions(&self, bounds: Option<DateRange>) -> BudgetResult<Vec<Transaction>>;

    /// Insert or replace a period together with its children
    fn commit_period(&self, period: BudgetPeriod) -> BudgetResult<()>;

    fn delete_period(&self, id: BudgetPeriodId) -> BudgetResult<BudgetPeriod>;

    fn upsert_category(&self, category: Category) -> BudgetResult<()>;

    fn upsert_transaction(&self, transaction: Transaction) -> BudgetResult<()>;

    fn delete_transaction(&self, id: TransactionId) -> BudgetResult<bool>;

    /// Parent/child index, checked for cycles
    fn category_tree(&self) -> BudgetResult<CategoryTree> {
        Ok(CategoryTree::build(&self.list_categories()?)?)
    }

    fn category_descendants(&self, id: CategoryId) -> BudgetResult<Vec<CategoryId>> {
        Ok(self.category_tree()?.descendants(id))
    }
}
