//! Budget engine - period budgeting with validation, rollups and carry-over
//!
//! The core of the crate is [`engine`]: period and field validation,
//! spent/remaining/carry-over computation over a category hierarchy,
//! needs/wants/savings reconciliation, transaction-to-period assignment and
//! composing a new period from the previous one.
//!
//! # Architecture
//!
//! - `config`: Path resolution and user settings
//! - `error`: Validation and crate-level error types
//! - `models`: Periods, categories, allocations, transactions, money
//! - `engine`: Pure calculation and validation components
//! - `storage`: The `Repository` trait and its JSON file implementation
//! - `cli`: Command handlers for the `budget` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_engine::engine::PeriodDraft;
//! use budget_engine::storage::JsonStore;
//!
//! let store = JsonStore::open(paths.budget_file())?;
//! let draft = PeriodDraft::new()
//!     .with_methodology(Methodology::ZeroBased)
//!     .with_date_range(range)
//!     .with_income("Salary", Money::from_units(3000))
//!     .advance_to_commit()?;
//! draft.commit(&store)?;
//! ```

use std::sync::Once;

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{BudgetError, BudgetResult, ValidationError};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber once
///
/// Honors `RUST_LOG`; without it, logs this crate at `info` to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("budget_engine=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
