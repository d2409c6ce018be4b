//! Configuration for the budget engine
//!
//! Path resolution for the data directory and the persisted user settings
//! (bucket targets and the last viewed period).

pub mod paths;
pub mod settings;

pub use paths::BudgetPaths;
pub use settings::UserSettings;
