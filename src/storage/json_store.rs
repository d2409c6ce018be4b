//! JSON file repository
//!
//! All entities share one document. Each mutation works on a copy of the
//! in-memory state, writes the copy atomically, and only then replaces the
//! in-memory state, so a failed write leaves both disk and memory unchanged.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::file_io::{read_json, write_json_atomic};
use super::Repository;
use crate::engine::ValidationRules;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetPeriod, BudgetPeriodId, Category, CategoryTree, DateRange, Transaction, TransactionId,
};

/// Serialized layout of `budget.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub periods: Vec<BudgetPeriod>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

pub struct JsonStore {
    path: PathBuf,
    data: RwLock<BudgetData>,
}

impl JsonStore {
    /// Create an empty store backed by `path`; call [`JsonStore::load`] to
    /// read existing data
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BudgetData::default()),
        }
    }

    /// Create a store and load whatever is on disk
    pub fn open(path: PathBuf) -> BudgetResult<Self> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> BudgetResult<()> {
        let file_data: BudgetData = read_json(&self.path)?;
        CategoryTree::build(&file_data.categories)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        debug!(
            path = %self.path.display(),
            periods = file_data.periods.len(),
            transactions = file_data.transactions.len(),
            "loaded budget data"
        );
        *data = file_data;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&BudgetData) -> T) -> BudgetResult<T> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&data))
    }

    /// Apply `f` to a copy, persist the copy, then swap it in
    fn mutate<T>(&self, f: impl FnOnce(&mut BudgetData) -> BudgetResult<T>) -> BudgetResult<T> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut candidate = data.clone();
        let result = f(&mut candidate)?;
        write_json_atomic(&self.path, &candidate)?;
        *data = candidate;
        Ok(result)
    }
}

impl Repository for JsonStore {
    fn list_categories(&self) -> BudgetResult<Vec<Category>> {
        self.read(|d| d.categories.clone())
    }

    fn list_periods(&self) -> BudgetResult<Vec<BudgetPeriod>> {
        self.read(|d| {
            let mut periods = d.periods.clone();
            periods.sort_by_key(|p| (p.start_date, p.id));
            periods
        })
    }

    fn get_period(&self, id: BudgetPeriodId) -> BudgetResult<BudgetPeriod> {
        self.read(|d| d.periods.iter().find(|p| p.id == id).cloned())?
            .ok_or_else(|| BudgetError::period_not_found(id.to_string()))
    }

    fn list_transactions(&self, bounds: Option<DateRange>) -> BudgetResult<Vec<Transaction>> {
        self.read(|d| {
            let mut transactions: Vec<Transaction> = d
                .transactions
                .iter()
                .filter(|t| bounds.map_or(true, |b| b.contains(t.date)))
                .cloned()
                .collect();
            transactions.sort_by_key(|t| (t.date, t.id));
            transactions
        })
    }

    fn commit_period(&self, period: BudgetPeriod) -> BudgetResult<()> {
        let range = period.range();
        let id = period.id;
        self.mutate(|d| {
            match d.periods.iter_mut().find(|p| p.id == period.id) {
                Some(existing) => *existing = period,
                None => d.periods.push(period),
            }
            Ok(())
        })?;
        info!(period = %id, range = %range, "committed budget period");
        Ok(())
    }

    fn delete_period(&self, id: BudgetPeriodId) -> BudgetResult<BudgetPeriod> {
        self.mutate(|d| {
            let index = d
                .periods
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| BudgetError::period_not_found(id.to_string()))?;
            Ok(d.periods.remove(index))
        })
    }

    fn upsert_category(&self, category: Category) -> BudgetResult<()> {
        ValidationRules::validate_category(&category)?;
        self.mutate(|d| {
            if let Some(parent_id) = category.parent_id {
                if !d.categories.iter().any(|c| c.id == parent_id) {
                    return Err(BudgetError::category_not_found(parent_id.to_string()));
                }
            }

            match d.categories.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => *existing = category,
                None => d.categories.push(category),
            }

            CategoryTree::build(&d.categories)?;
            Ok(())
        })
    }

    fn upsert_transaction(&self, transaction: Transaction) -> BudgetResult<()> {
        ValidationRules::validate_transaction(&transaction)?;
        self.mutate(|d| {
            for category_id in transaction.tagged_categories() {
                if !d.categories.iter().any(|c| c.id == category_id) {
                    return Err(BudgetError::category_not_found(category_id.to_string()));
                }
            }

            match d.transactions.iter_mut().find(|t| t.id == transaction.id) {
                Some(existing) => *existing = transaction,
                None => d.transactions.push(transaction),
            }
            Ok(())
        })
    }

    fn delete_transaction(&self, id: TransactionId) -> BudgetResult<bool> {
        self.mutate(|d| {
            let before = d.transactions.len();
            d.transactions.retain(|t| t.id != id);
            Ok(d.transactions.len() != before)
        })
    }

    fn category_tree(&self) -> BudgetResult<CategoryTree> {
        self.read(|d| CategoryTree::build(&d.categories))?
            .map_err(BudgetError::from)
    }
}
