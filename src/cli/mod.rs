//! CLI command handlers
//!
//! Bridges clap argument parsing with the engine. Handlers read through the
//! repository, call into `engine`, and print plain text.

pub mod category;
pub mod period;
pub mod report;
pub mod settings;
pub mod transaction;

pub use category::{handle_category_command, CategoryCommands};
pub use period::{handle_period_command, PeriodCommands};
pub use report::{handle_report_command, ReportCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPeriod, BudgetPeriodId, Category, CategoryId, Money};

/// Parse a date argument in YYYY-MM-DD form
pub(crate) fn parse_date(date_str: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetError::InvalidInput(format!(
            "Invalid date format: '{}'. Use YYYY-MM-DD",
            date_str
        ))
    })
}

pub(crate) fn parse_date_or_today(date_str: Option<&str>) -> BudgetResult<NaiveDate> {
    match date_str {
        Some(date_str) => parse_date(date_str),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub(crate) fn parse_money(amount: &str) -> BudgetResult<Money> {
    Money::parse(amount).map_err(|e| BudgetError::InvalidInput(e.to_string()))
}

/// Split a `name=amount` pair
pub(crate) fn parse_named_amount(pair: &str) -> BudgetResult<(String, Money)> {
    let (name, amount) = pair.rsplit_once('=').ok_or_else(|| {
        BudgetError::InvalidInput(format!("Expected NAME=AMOUNT, got '{}'", pair))
    })?;
    Ok((name.trim().to_string(), parse_money(amount)?))
}

/// Find a category by id or case-insensitive name
pub(crate) fn find_category<'c>(
    categories: &'c [Category],
    query: &str,
) -> BudgetResult<&'c Category> {
    let by_id = query.parse::<CategoryId>().ok();
    categories
        .iter()
        .find(|c| Some(c.id) == by_id || c.id.short() == query)
        .or_else(|| {
            categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(query.trim()))
        })
        .ok_or_else(|| BudgetError::category_not_found(query))
}

/// Find a period by id, short id, or a date it contains
pub(crate) fn find_period<'p>(
    periods: &'p [BudgetPeriod],
    query: &str,
) -> BudgetResult<&'p BudgetPeriod> {
    let by_id = query.parse::<BudgetPeriodId>().ok();
    let by_date = parse_date(query).ok();
    periods
        .iter()
        .find(|p| Some(p.id) == by_id || p.id.short() == query)
        .or_else(|| by_date.and_then(|d| periods.iter().find(|p| p.contains(d))))
        .ok_or_else(|| BudgetError::period_not_found(query))
}

/// Resolve an optional period argument: explicit query, else the last
/// viewed period, else the one covering today, else the latest
pub(crate) fn resolve_period<'p>(
    periods: &'p [BudgetPeriod],
    query: Option<&str>,
    last_viewed: Option<BudgetPeriodId>,
) -> BudgetResult<&'p BudgetPeriod> {
    if let Some(query) = query {
        return find_period(periods, query);
    }

    let today = chrono::Local::now().date_naive();
    last_viewed
        .and_then(|id| periods.iter().find(|p| p.id == id))
        .or_else(|| periods.iter().find(|p| p.contains(today)))
        .or_else(|| periods.iter().max_by_key(|p| p.start_date))
        .ok_or_else(|| BudgetError::period_not_found("(no budget periods yet)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Methodology;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_named_amount() {
        let (name, amount) = parse_named_amount("Side gig=250.50").unwrap();
        assert_eq!(name, "Side gig");
        assert_eq!(amount, Money::from_cents(25050));

        assert!(parse_named_amount("Salary").is_err());
        assert!(parse_named_amount("Salary=abc").is_err());
    }

    #[test]
    fn test_find_category_by_name_or_id() {
        let food = Category::new("Food");
        let categories = vec![food.clone(), Category::new("Rent")];

        assert_eq!(find_category(&categories, "food").unwrap().id, food.id);
        assert_eq!(find_category(&categories, &food.id.short()).unwrap().id, food.id);
        assert_eq!(find_category(&categories, &food.id.to_string()).unwrap().id, food.id);
        assert!(find_category(&categories, "Travel").unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_period_by_contained_date() {
        let jan = BudgetPeriod::new(Methodology::ZeroBased, date(2025, 1, 1), date(2025, 1, 31));
        let feb = BudgetPeriod::new(Methodology::ZeroBased, date(2025, 2, 1), date(2025, 2, 28));
        let periods = vec![jan, feb.clone()];

        assert_eq!(find_period(&periods, "2025-02-14").unwrap().id, feb.id);
        assert!(find_period(&periods, "2025-03-01").is_err());
    }

    #[test]
    fn test_resolve_period_prefers_last_viewed() {
        let jan = BudgetPeriod::new(Methodology::ZeroBased, date(2020, 1, 1), date(2020, 1, 31));
        let feb = BudgetPeriod::new(Methodology::ZeroBased, date(2020, 2, 1), date(2020, 2, 29));
        let periods = vec![jan.clone(), feb.clone()];

        assert_eq!(resolve_period(&periods, None, Some(jan.id)).unwrap().id, jan.id);
        assert_eq!(resolve_period(&periods, None, None).unwrap().id, feb.id);
        assert!(resolve_period(&[], None, None).is_err());
    }
}
