use rust_decimal::Decimal;

use super::error::{BudgetError, EntryError};
use super::types::{
    Budget, BudgetEntry, BudgetEntryFilter, Category, CategoryTotal, EntryType, UNSAVED_ID,
};

/// Suffix appended to the name of a duplicated budget.
pub const COPY_SUFFIX: &str = " (copy)";

/// Filters entries by owning budget.
pub fn filter_entries_by_budget(entries: &[BudgetEntry], budget_id: i64) -> Vec<BudgetEntry> {
    entries
        .iter()
        .filter(|entry| entry.budget_id == budget_id)
        .cloned()
        .collect()
}

/// Filters entries with a [`BudgetEntryFilter`].
pub fn filter_entries(entries: &[BudgetEntry], filter: &BudgetEntryFilter) -> Vec<BudgetEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}

/// Sums the outcome entries. Amounts that do not parse count as zero.
pub fn total_expenses(entries: &[BudgetEntry]) -> Decimal {
    entries
        .iter()
        .filter(|entry| entry.entry_type == EntryType::Outcome)
        .map(|entry| entry.parsed_amount().unwrap_or(Decimal::ZERO))
        .sum()
}

/// Aggregates entry amounts per category.
///
/// Every category starts at zero, amounts that fail to parse contribute zero,
/// zero sums are dropped and the rest is sorted by amount, largest first.
/// Equal amounts keep the enumeration order of [`Category::ALL`].
pub fn totals_per_category(entries: &[BudgetEntry]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Category::ALL
        .into_iter()
        .map(|category| CategoryTotal {
            category,
            amount: Decimal::ZERO,
        })
        .collect();

    for entry in entries {
        let amount = entry.parsed_amount().unwrap_or(Decimal::ZERO);
        if let Some(bucket) = totals.iter_mut().find(|t| t.category == entry.category) {
            bucket.amount += amount;
        }
    }

    totals.retain(|t| !t.amount.is_zero());
    // sort_by is stable, so ties stay in enumeration order
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

/// Builds the unsaved copy of a budget.
pub fn duplicate_budget(original: &Budget) -> Budget {
    Budget {
        id: UNSAVED_ID,
        amount: original.amount,
        name: format!("{}{}", original.name, COPY_SUFFIX),
        total_expenses: Decimal::ZERO,
        date: original.date,
    }
}

/// Copies entries under a new owning budget.
///
/// Identity and selection state are reset; every other field is kept.
pub fn duplicate_entries(entries: &[BudgetEntry], new_budget_id: i64) -> Vec<BudgetEntry> {
    entries
        .iter()
        .map(|entry| BudgetEntry {
            id: UNSAVED_ID,
            budget_id: new_budget_id,
            is_selected: false,
            ..entry.clone()
        })
        .collect()
}

/// Validates a budget before creation or update.
pub fn validate_budget(budget: &Budget) -> Result<(), BudgetError> {
    if budget.name.trim().is_empty() {
        return Err(BudgetError::EmptyName);
    }
    if budget.amount.is_sign_negative() {
        return Err(BudgetError::NegativeAmount);
    }
    Ok(())
}

/// Validates an entry before creation or update.
pub fn validate_entry(entry: &BudgetEntry) -> Result<(), EntryError> {
    if entry.budget_id < 0 {
        return Err(EntryError::MissingBudgetId);
    }
    if entry.description.len() > 200 {
        return Err(EntryError::DescriptionTooLong);
    }
    match entry.parsed_amount() {
        Some(amount) if amount.is_sign_negative() => {
            Err(EntryError::NegativeAmount(entry.amount.clone()))
        }
        Some(_) => Ok(()),
        None => Err(EntryError::InvalidAmount(entry.amount.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn entry(category: Category, amount: &str) -> BudgetEntry {
        BudgetEntry::outcome(1, amount, "test", category, date())
    }

    #[test]
    fn test_totals_drop_zero_categories() {
        let entries = vec![
            entry(Category::Food, "10.00"),
            entry(Category::Food, "5.00"),
            entry(Category::Health, "0"),
        ];

        let totals = totals_per_category(&entries);

        assert_eq!(
            totals,
            vec![CategoryTotal {
                category: Category::Food,
                amount: dec!(15.00),
            }]
        );
    }

    #[test]
    fn test_totals_sorted_descending() {
        let entries = vec![
            entry(Category::Food, "3"),
            entry(Category::Travel, "40"),
            entry(Category::Health, "12.5"),
        ];

        let order: Vec<Category> = totals_per_category(&entries)
            .into_iter()
            .map(|t| t.category)
            .collect();

        assert_eq!(
            order,
            vec![Category::Travel, Category::Health, Category::Food]
        );
    }

    #[test]
    fn test_totals_ties_keep_enumeration_order() {
        let entries = vec![
            entry(Category::Other, "7"),
            entry(Category::Groceries, "7"),
            entry(Category::Food, "7"),
        ];

        let order: Vec<Category> = totals_per_category(&entries)
            .into_iter()
            .map(|t| t.category)
            .collect();

        assert_eq!(
            order,
            vec![Category::Food, Category::Groceries, Category::Other]
        );
    }

    #[test]
    fn test_totals_unparseable_amount_counts_as_zero() {
        let entries = vec![entry(Category::Food, "abc"), entry(Category::Food, "2")];

        let totals = totals_per_category(&entries);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].amount, dec!(2));
    }

    #[test]
    fn test_totals_empty_input() {
        assert!(totals_per_category(&[]).is_empty());
    }

    #[test]
    fn test_total_expenses_ignores_income() {
        let mut entries = vec![entry(Category::Food, "8"), entry(Category::Food, "x")];
        entries.push(BudgetEntry::income(1, "100", "pay", Category::Salary, date()));

        assert_eq!(total_expenses(&entries), dec!(8));
    }

    #[test]
    fn test_duplicate_budget_appends_suffix() {
        let original = Budget::new("Trip", dec!(900), date()).with_id(4);

        let copy = duplicate_budget(&original);

        assert_eq!(copy.name, "Trip (copy)");
        assert_eq!(copy.id, UNSAVED_ID);
        assert_eq!(copy.amount, original.amount);
        assert_eq!(copy.date, original.date);
    }

    #[test]
    fn test_duplicate_entries_rewrites_owner() {
        let mut source = entry(Category::Travel, "120").with_id(9).with_invoice("a.jpg");
        source.is_selected = true;

        let copies = duplicate_entries(&[source.clone()], 42);

        assert_eq!(copies.len(), 1);
        let copy = &copies[0];
        assert_eq!(copy.id, UNSAVED_ID);
        assert_eq!(copy.budget_id, 42);
        assert!(!copy.is_selected);
        assert_eq!(copy.amount, source.amount);
        assert_eq!(copy.description, source.description);
        assert_eq!(copy.category, source.category);
        assert_eq!(copy.invoice, source.invoice);
    }

    #[test]
    fn test_filter_entries_by_budget() {
        let entries = vec![
            entry(Category::Food, "1"),
            BudgetEntry::outcome(2, "1", "other", Category::Food, date()),
        ];

        let filtered = filter_entries_by_budget(&entries, 2);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].budget_id, 2);
    }

    #[test]
    fn test_validate_budget() {
        assert!(validate_budget(&Budget::new("Rent", dec!(1000), date())).is_ok());
        assert_eq!(
            validate_budget(&Budget::new("  ", dec!(1), date())),
            Err(BudgetError::EmptyName)
        );
        assert!(validate_budget(&Budget::new("x".repeat(300), dec!(1), date())).is_ok());
        assert_eq!(
            validate_budget(&Budget::new("Rent", dec!(-1), date())),
            Err(BudgetError::NegativeAmount)
        );
    }

    #[test]
    fn test_validate_entry() {
        assert!(validate_entry(&entry(Category::Food, "4.20")).is_ok());
        assert_eq!(
            validate_entry(&entry(Category::Food, "four")),
            Err(EntryError::InvalidAmount("four".to_string()))
        );
        assert_eq!(
            validate_entry(&entry(Category::Food, "-3")),
            Err(EntryError::NegativeAmount("-3".to_string()))
        );

        let orphan = BudgetEntry::outcome(UNSAVED_ID, "1", "x", Category::Food, date());
        assert_eq!(validate_entry(&orphan), Err(EntryError::MissingBudgetId));
    }
}
