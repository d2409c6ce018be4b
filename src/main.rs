use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_engine::cli::{
    handle_category_command, handle_period_command, handle_report_command,
    handle_settings_command, handle_transaction_command,
};
use budget_engine::config::{BudgetPaths, UserSettings};
use budget_engine::storage::JsonStore;

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Period budgeting with rollups, carry-over and bucket targets",
    long_about = "Plan income and category allocations per budget period, record \
                  purchases, and see what is spent and left per category. Unspent \
                  money carries over when the next period is prefilled."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand)]
    Category(budget_engine::cli::CategoryCommands),

    /// Budget period commands
    #[command(subcommand)]
    Period(budget_engine::cli::PeriodCommands),

    /// Transaction commands
    #[command(subcommand, alias = "transaction")]
    Txn(budget_engine::cli::TransactionCommands),

    /// Spending reports
    #[command(subcommand)]
    Report(budget_engine::cli::ReportCommands),

    /// Show or change settings
    #[command(subcommand)]
    Settings(budget_engine::cli::SettingsCommands),
}

fn main() -> Result<()> {
    budget_engine::init_tracing();
    let cli = Cli::parse();

    let paths = BudgetPaths::new()?;
    let mut settings = UserSettings::load_or_create(&paths)?;
    let store = JsonStore::open(paths.budget_file())?;

    match cli.command {
        Some(Commands::Category(cmd)) => handle_category_command(&store, cmd)?,
        Some(Commands::Period(cmd)) => handle_period_command(&store, &mut settings, &paths, cmd)?,
        Some(Commands::Txn(cmd)) => handle_transaction_command(&store, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&store, &settings, cmd)?,
        Some(Commands::Settings(cmd)) => handle_settings_command(&mut settings, &paths, cmd)?,
        None => {
            println!("budget - period budgeting from the command line");
            println!();
            println!("Run 'budget --help' for usage information.");
        }
    }

    Ok(())
}
