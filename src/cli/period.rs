//! Budget period CLI commands
//!
//! Creation and prefill both build a [`PeriodDraft`] and walk it through
//! every step before committing, so the command line gets exactly the same
//! validation as any other caller.

use clap::Subcommand;

use super::{find_category, find_period, parse_date, parse_named_amount, resolve_period};
use crate::config::{BudgetPaths, UserSettings};
use crate::engine::{
    AllocationEngine, AssignmentResolver, CreationOutcome, PeriodDraft, PrefillComposer,
};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPeriod, DateRange, Methodology};
use crate::storage::Repository;

/// Budget period subcommands
#[derive(Subcommand)]
pub enum PeriodCommands {
    /// Create a new budget period
    Create {
        /// Methodology (zero-based, envelope, percentage)
        #[arg(short, long, default_value = "zero-based")]
        methodology: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Income source as NAME=AMOUNT (repeatable)
        #[arg(short, long = "income", required = true)]
        income: Vec<String>,
        /// Category allocation as CATEGORY=AMOUNT (repeatable)
        #[arg(short, long = "allocate")]
        allocate: Vec<String>,
    },

    /// Create the next period from a previous one, carrying over surplus
    Prefill {
        /// Previous period (ID or a date inside it); defaults to the latest
        from: Option<String>,
        /// Override the proposed first day
        #[arg(long)]
        start: Option<String>,
        /// Override the proposed last day
        #[arg(long)]
        end: Option<String>,
        /// Override the copied methodology
        #[arg(short, long)]
        methodology: Option<String>,
    },

    /// List all budget periods
    List,

    /// Show a period with per-category spent and remaining
    Show {
        /// Period ID or a date inside it
        period: Option<String>,
    },

    /// Delete a budget period
    Delete {
        /// Period ID or a date inside it
        period: String,
    },
}

/// Handle a budget period command
pub fn handle_period_command<R: Repository>(
    repo: &R,
    settings: &mut UserSettings,
    paths: &BudgetPaths,
    cmd: PeriodCommands,
) -> BudgetResult<()> {
    match cmd {
        PeriodCommands::Create {
            methodology,
            start,
            end,
            income,
            allocate,
        } => {
            let categories = repo.list_categories()?;
            let mut draft = PeriodDraft::new()
                .with_methodology(parse_methodology(&methodology)?)
                .with_date_range(DateRange::new(parse_date(&start)?, parse_date(&end)?));

            for pair in &income {
                let (name, amount) = parse_named_amount(pair)?;
                draft = draft.with_income(name, amount);
            }
            for pair in &allocate {
                let (name, amount) = parse_named_amount(pair)?;
                let category = find_category(&categories, &name)?;
                draft = draft.with_allocation(category.id, amount);
            }

            let period = commit_draft(repo, &draft)?;
            println!("Created budget period: {}", period);
            println!("  ID: {}", period.id.short());
            settings.set_last_viewed(Some(period.id));
            settings.save(paths)?;
        }

        PeriodCommands::Prefill {
            from,
            start,
            end,
            methodology,
        } => {
            let periods = repo.list_periods()?;
            let previous = match from.as_deref() {
                Some(query) => find_period(&periods, query)?,
                None => periods
                    .iter()
                    .max_by_key(|p| p.start_date)
                    .ok_or_else(|| BudgetError::period_not_found("(no budget periods yet)"))?,
            };

            let tree = repo.category_tree()?;
            let transactions = repo.list_transactions(Some(previous.range()))?;
            let mut draft = PrefillComposer::new(&tree).prefill(previous, &transactions);

            if let Some(methodology) = methodology {
                draft = draft.with_methodology(parse_methodology(&methodology)?);
            }
            if start.is_some() || end.is_some() {
                let proposed = draft
                    .date_range
                    .unwrap_or_else(|| previous.range().following());
                let start = match start {
                    Some(start) => parse_date(&start)?,
                    None => proposed.start,
                };
                let end = match end {
                    Some(end) => parse_date(&end)?,
                    None => proposed.end,
                };
                draft = draft.with_date_range(DateRange::new(start, end));
            }

            let period = commit_draft(repo, &draft)?;
            println!("Prefilled budget period: {}", period);
            println!("  From: {}", previous);
            println!("  ID: {}", period.id.short());
            let categories = repo.list_categories()?;
            for allocation in &period.allocations {
                if !allocation.carry_over_amount.is_positive() {
                    continue;
                }
                let name = allocation
                    .category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id))
                    .map(|c| c.name.as_str())
                    .unwrap_or("(unknown)");
                println!("  Carried over {} into {}", allocation.carry_over_amount, name);
            }
            settings.set_last_viewed(Some(period.id));
            settings.save(paths)?;
        }

        PeriodCommands::List => {
            let periods = repo.list_periods()?;
            if periods.is_empty() {
                println!("No budget periods yet. Create one with 'budget period create'.");
                return Ok(());
            }
            for period in &periods {
                println!(
                    "{}  {}  income {}  planned {}",
                    period.id.short(),
                    period,
                    period.total_income(),
                    period.total_planned()
                );
            }
        }

        PeriodCommands::Show { period } => {
            let periods = repo.list_periods()?;
            let period = resolve_period(
                &periods,
                period.as_deref(),
                settings.last_viewed_budget_period_id,
            )?;

            let categories = repo.list_categories()?;
            let tree = repo.category_tree()?;
            let transactions = repo.list_transactions(Some(period.range()))?;
            let engine = AllocationEngine::new(&tree);

            println!("Budget period {}", period);
            println!("  ID: {}", period.id.short());
            println!("Income:");
            for source in &period.income_sources {
                println!("  {:<20} {:>12}", source.source_name, source.amount);
            }
            println!("Allocations:");
            println!(
                "  {:<20} {:>12} {:>12} {:>12} {:>12}",
                "Category", "Planned", "Carry-over", "Spent", "Remaining"
            );
            for summary in engine.period_summaries(period, &transactions) {
                let name = summary
                    .category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id))
                    .map(|c| c.name.as_str())
                    .unwrap_or("(unknown)");
                println!(
                    "  {:<20} {:>12} {:>12} {:>12} {:>12}{}",
                    name,
                    summary.planned,
                    summary.carry_over,
                    summary.spent,
                    summary.remaining,
                    if summary.is_overspent() { "  OVER" } else { "" }
                );
            }

            settings.set_last_viewed(Some(period.id));
            settings.save(paths)?;
        }

        PeriodCommands::Delete { period } => {
            let periods = repo.list_periods()?;
            let target = find_period(&periods, &period)?.clone();
            repo.delete_period(target.id)?;

            let remaining = repo.list_periods()?;
            let transactions = repo.list_transactions(Some(target.range()))?;
            let orphaned = AssignmentResolver::orphaned(&transactions, &remaining).len();

            println!("Deleted budget period: {}", target);
            if orphaned > 0 {
                println!("  {} transaction(s) no longer belong to any period", orphaned);
            }
            if settings.last_viewed_budget_period_id == Some(target.id) {
                settings.set_last_viewed(None);
                settings.save(paths)?;
            }
        }
    }

    Ok(())
}

fn parse_methodology(s: &str) -> BudgetResult<Methodology> {
    s.parse().map_err(BudgetError::InvalidInput)
}

/// Walk a draft through every step and commit it
fn commit_draft<R: Repository>(repo: &R, draft: &PeriodDraft) -> BudgetResult<BudgetPeriod> {
    match draft.advance_to_commit()?.commit(repo)? {
        CreationOutcome::Persisted(period) => Ok(period),
        CreationOutcome::Aborted => Err(BudgetError::DraftNotReady("aborted".into())),
    }
}
