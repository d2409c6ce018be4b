//! Building the next period from the previous one

use tracing::debug;

use super::allocation::AllocationEngine;
use super::draft::{AllocationDraft, PeriodDraft};
use crate::models::{BudgetPeriod, CategoryTree, Transaction};

/// Composes a draft period seeded from a previous period
///
/// The result is only a draft: it goes through the same step validation and
/// commit path as a period entered by hand.
pub struct PrefillComposer<'a> {
    engine: AllocationEngine<'a>,
}

impl<'a> PrefillComposer<'a> {
    pub fn new(tree: &'a CategoryTree) -> Self {
        Self {
            engine: AllocationEngine::new(tree),
        }
    }

    /// Copy income and plans from `previous`, carrying forward any unspent
    /// surplus per category
    ///
    /// The methodology is copied and the date range is proposed as the
    /// equal-length range starting the day after `previous` ends.
    pub fn prefill(
        &self,
        previous: &BudgetPeriod,
        previous_transactions: &[Transaction],
    ) -> PeriodDraft {
        let income_sources = previous
            .income_sources
            .iter()
            .map(|s| s.duplicate())
            .collect();

        let allocations = previous
            .allocations
            .iter()
            .map(|a| {
                let carry_over_amount = match a.category_id {
                    Some(category_id) => {
                        let spent = self
                            .engine
                            .spent_amount(category_id, previous, previous_transactions);
                        AllocationEngine::carry_over(a, spent)
                    }
                    None => a.available().floor_zero(),
                };
                AllocationDraft {
                    category_id: a.category_id,
                    planned_amount: a.planned_amount,
                    carry_over_amount,
                }
            })
            .collect();

        let range = previous.range().following();
        debug!(from = %previous.range(), proposed = %range, "prefilled period draft");

        PeriodDraft {
            methodology: Some(previous.methodology),
            date_range: Some(range),
            income_sources,
            allocations,
            ..PeriodDraft::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::draft::{CreationOutcome, CreationStep};
    use crate::models::{Category, CategoryId, DateRange, Methodology, Money, SpendingBucket};
    use crate::storage::{JsonStore, Repository};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (CategoryTree, CategoryId, CategoryId, BudgetPeriod) {
        let food = Category::new("Food");
        let rent = Category::new("Rent");
        let tree = CategoryTree::build(&[food.clone(), rent.clone()]).unwrap();
        let january = BudgetPeriod::new(Methodology::Envelope, date(2025, 1, 1), date(2025, 1, 31))
            .with_income("Salary", Money::from_units(3000))
            .with_allocation(food.id, Money::from_units(100), Money::zero())
            .with_allocation(rent.id, Money::from_units(1000), Money::zero());
        (tree, food.id, rent.id, january)
    }

    fn spend(day: NaiveDate, units: i64, category: CategoryId) -> Transaction {
        Transaction::new(day, Money::from_units(units), "Store", SpendingBucket::Needs)
            .with_category(category)
    }

    #[test]
    fn test_prefill_carries_surplus_and_floors_deficit() {
        let (tree, food, rent, january) = setup();
        let transactions = vec![
            spend(date(2025, 1, 10), 80, food),
            spend(date(2025, 1, 3), 1200, rent),
        ];

        let draft = PrefillComposer::new(&tree).prefill(&january, &transactions);

        let food_draft = draft.allocations.iter().find(|a| a.category_id == Some(food)).unwrap();
        assert_eq!(food_draft.planned_amount, Money::from_units(100));
        assert_eq!(food_draft.carry_over_amount, Money::from_units(20));

        let rent_draft = draft.allocations.iter().find(|a| a.category_id == Some(rent)).unwrap();
        assert_eq!(rent_draft.planned_amount, Money::from_units(1000));
        assert_eq!(rent_draft.carry_over_amount, Money::zero());
    }

    #[test]
    fn test_prefill_copies_income_with_fresh_ids() {
        let (tree, _, _, january) = setup();
        let draft = PrefillComposer::new(&tree).prefill(&january, &[]);

        assert_eq!(draft.income_sources.len(), 1);
        let (old, new) = (&january.income_sources[0], &draft.income_sources[0]);
        assert_ne!(old.id, new.id);
        assert_eq!(old.source_name, new.source_name);
        assert_eq!(old.amount, new.amount);
    }

    #[test]
    fn test_prefill_proposes_following_range() {
        let (tree, _, _, january) = setup();
        let draft = PrefillComposer::new(&tree).prefill(&january, &[]);

        assert_eq!(draft.step, CreationStep::SelectingMethodology);
        assert_eq!(draft.methodology, Some(Methodology::Envelope));
        assert_eq!(
            draft.date_range,
            Some(DateRange::new(date(2025, 2, 1), date(2025, 3, 3)))
        );
        assert!(draft.period_id.is_none());
    }

    #[test]
    fn test_prefilled_draft_uses_normal_commit_path() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(temp_dir.path().join("budget.json")).unwrap();
        let (tree, _, _, january) = setup();
        store.commit_period(january.clone()).unwrap();

        let composer = PrefillComposer::new(&tree);

        // Reusing January's dates collides with the stored period
        let clash = composer
            .prefill(&january, &[])
            .with_date_range(january.range())
            .advance_to_commit()
            .unwrap();
        let err = clash.commit(&store).unwrap_err();
        assert!(err.is_validation());

        let february = composer.prefill(&january, &[]).advance_to_commit().unwrap();
        assert!(matches!(
            february.commit(&store).unwrap(),
            CreationOutcome::Persisted(_)
        ));
        assert_eq!(store.list_periods().unwrap().len(), 2);
    }
}
