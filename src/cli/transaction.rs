//! Transaction CLI commands

use clap::Subcommand;

use super::{find_category, find_period, parse_date_or_today, parse_money};
use crate::engine::AssignmentResolver;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{SpendingBucket, Transaction};
use crate::storage::Repository;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a purchase
    Add {
        /// Amount before tax (e.g., "12.50")
        amount: String,
        /// Merchant name
        merchant: String,
        /// Spending bucket (needs, wants, savings)
        #[arg(short, long)]
        bucket: String,
        /// Tax on top of the amount
        #[arg(short, long)]
        tax: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Sub-category name or ID
        #[arg(short, long)]
        sub_category: Option<String>,
        /// Free-text note
        #[arg(long)]
        description: Option<String>,
    },

    /// List transactions
    List {
        /// Only transactions in this period (ID or a date inside it)
        #[arg(short, long)]
        period: Option<String>,
        /// Only transactions outside every period
        #[arg(long, conflicts_with = "period")]
        orphaned: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command<R: Repository>(
    repo: &R,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    match cmd {
        TransactionCommands::Add {
            amount,
            merchant,
            bucket,
            tax,
            date,
            category,
            sub_category,
            description,
        } => {
            let bucket: SpendingBucket = bucket.parse().map_err(BudgetError::InvalidInput)?;
            let date = parse_date_or_today(date.as_deref())?;
            let categories = repo.list_categories()?;

            let mut transaction = Transaction::new(date, parse_money(&amount)?, merchant, bucket);
            if let Some(tax) = tax {
                transaction = transaction.with_tax(parse_money(&tax)?);
            }
            if let Some(category) = category {
                transaction = transaction.with_category(find_category(&categories, &category)?.id);
            }
            if let Some(sub_category) = sub_category {
                let sub = find_category(&categories, &sub_category)?;
                transaction = transaction.with_sub_category(sub.id);
            }
            transaction.description = description;

            repo.upsert_transaction(transaction.clone())?;
            println!("Recorded: {}", transaction);

            let periods = repo.list_periods()?;
            match AssignmentResolver::assign(&transaction, &periods) {
                Some(period) => println!("  Period: {}", period),
                None => println!("  Not inside any budget period"),
            }
        }

        TransactionCommands::List { period, orphaned } => {
            let periods = repo.list_periods()?;
            let transactions = repo.list_transactions(None)?;

            let shown: Vec<&Transaction> = if orphaned {
                AssignmentResolver::orphaned(&transactions, &periods)
            } else if let Some(query) = period {
                let period = find_period(&periods, &query)?;
                AssignmentResolver::period_transactions(period, &transactions)
            } else {
                transactions.iter().collect()
            };

            if shown.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }
            for transaction in shown {
                println!("{}  {}", transaction.id.short(), transaction);
            }
        }
    }

    Ok(())
}
