//! Report CLI commands

use clap::Subcommand;

use super::resolve_period;
use crate::config::UserSettings;
use crate::engine::{AllocationEngine, PercentageReconciler};
use crate::error::BudgetResult;
use crate::storage::Repository;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, planned, spent and remaining for a period
    Totals {
        /// Period ID or a date inside it
        period: Option<String>,
    },

    /// Needs/wants/savings split against the configured targets
    Buckets {
        /// Period ID or a date inside it
        period: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command<R: Repository>(
    repo: &R,
    settings: &UserSettings,
    cmd: ReportCommands,
) -> BudgetResult<()> {
    let periods = repo.list_periods()?;

    match cmd {
        ReportCommands::Totals { period } => {
            let period = resolve_period(
                &periods,
                period.as_deref(),
                settings.last_viewed_budget_period_id,
            )?;
            let tree = repo.category_tree()?;
            let transactions = repo.list_transactions(Some(period.range()))?;
            let totals = AllocationEngine::new(&tree).period_totals(period, &transactions);

            println!("Budget period {}", period);
            println!("  Income:    {:>12}", totals.income);
            println!("  Planned:   {:>12}", totals.planned);
            println!("  Spent:     {:>12}", totals.spent);
            println!("  Remaining: {:>12}", totals.remaining);
        }

        ReportCommands::Buckets { period } => {
            let period = resolve_period(
                &periods,
                period.as_deref(),
                settings.last_viewed_budget_period_id,
            )?;
            let transactions = repo.list_transactions(Some(period.range()))?;
            let reports = PercentageReconciler::reconcile(
                period,
                &transactions,
                &settings.targets(),
                settings.target_tolerance_basis_points,
            );

            println!("Budget period {}", period);
            println!(
                "  {:<8} {:>12} {:>8} {:>8}  Status",
                "Bucket", "Spent", "Actual", "Target"
            );
            for report in reports {
                println!(
                    "  {:<8} {:>12} {:>7}% {:>7}%  {}",
                    report.bucket.name(),
                    report.spent,
                    report.actual_percentage.round_dp(2).to_string(),
                    report.target_percentage.normalize().to_string(),
                    report.status
                );
            }
        }
    }

    Ok(())
}
