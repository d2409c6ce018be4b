//! Settings CLI commands

use clap::Subcommand;
use rust_decimal::Decimal;

use crate::config::{BudgetPaths, UserSettings};
use crate::engine::BucketTargets;
use crate::error::{BudgetError, BudgetResult};

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings and paths
    Show,

    /// Set the needs/wants/savings target percentages
    Targets {
        /// Needs percentage
        #[arg(allow_negative_numbers = true)]
        needs: String,
        /// Wants percentage
        #[arg(allow_negative_numbers = true)]
        wants: String,
        /// Savings percentage
        #[arg(allow_negative_numbers = true)]
        savings: String,
        /// Tolerance in basis points (1 = 0.01 percentage points)
        #[arg(long)]
        tolerance: Option<u32>,
    },
}

/// Handle a settings command
pub fn handle_settings_command(
    settings: &mut UserSettings,
    paths: &BudgetPaths,
    cmd: SettingsCommands,
) -> BudgetResult<()> {
    match cmd {
        SettingsCommands::Show => {
            println!("Budget engine configuration");
            println!("===========================");
            println!("Config file:   {}", paths.settings_file().display());
            println!("Data file:     {}", paths.budget_file().display());
            println!();
            println!("Targets:");
            println!("  Needs:   {}%", settings.needs_percentage);
            println!("  Wants:   {}%", settings.wants_percentage);
            println!("  Savings: {}%", settings.savings_percentage);
            println!("  Tolerance: {} bp", settings.target_tolerance_basis_points);
        }

        SettingsCommands::Targets {
            needs,
            wants,
            savings,
            tolerance,
        } => {
            let targets = BucketTargets::new(
                parse_percentage(&needs)?,
                parse_percentage(&wants)?,
                parse_percentage(&savings)?,
            );
            settings.set_targets(targets)?;
            if let Some(tolerance) = tolerance {
                settings.target_tolerance_basis_points = tolerance;
            }
            settings.save(paths)?;

            println!(
                "Targets set: needs {}%, wants {}%, savings {}%",
                targets.needs, targets.wants, targets.savings
            );
        }
    }

    Ok(())
}

fn parse_percentage(s: &str) -> BudgetResult<Decimal> {
    s.trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| BudgetError::InvalidInput(format!("Invalid percentage: '{}'", s)))
}
