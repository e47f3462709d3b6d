//! Pretty output formatting.

use budgetsync_core::budget::{Budget, BudgetDetail, BudgetEntry, CategoryTotal};
use budgetsync_core::remote::{CollaboratorResponse, UserInfo};

use crate::sync::{SyncReport, SyncState};

/// Format a budget for display.
pub fn format_budget(budget: &Budget) -> String {
    format!(
        "{}\n  ID: {}\n  Amount: {}\n  Date: {}",
        budget.name, budget.id, budget.amount, budget.date
    )
}

/// Format budgets for display.
pub fn format_budgets(budgets: &[Budget]) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }
    let mut output = format!("BUDGETS ({})\n", budgets.len());
    output.push_str(&"-".repeat(40));
    for budget in budgets {
        output.push_str(&format!("\n{}", format_budget(budget)));
        output.push('\n');
    }
    output
}

/// Format an entry for display.
pub fn format_entry(entry: &BudgetEntry) -> String {
    let description = if entry.description.is_empty() {
        "(no description)"
    } else {
        &entry.description
    };
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Budget: {}\n  Amount: {}\n  Category: {}\n  Date: {}",
        description,
        entry.entry_type.as_str(),
        entry.id,
        entry.budget_id,
        entry.amount,
        entry.category.as_str(),
        entry.date
    );
    if let Some(invoice) = &entry.invoice {
        output.push_str(&format!("\n  Invoice: {}", invoice));
    }
    output
}

/// Format entries for display.
pub fn format_entries(entries: &[BudgetEntry]) -> String {
    if entries.is_empty() {
        return "No entries found.".to_string();
    }
    let mut output = format!("ENTRIES ({})\n", entries.len());
    output.push_str(&"-".repeat(40));
    for entry in entries {
        output.push_str(&format!("\n{}", format_entry(entry)));
        output.push('\n');
    }
    output
}

/// Format a budget with its entries and derived expenses.
pub fn format_detail(detail: &BudgetDetail) -> String {
    let budget = &detail.budget;
    let mut output = format_budget(budget);
    output.push_str(&format!(
        "\n  Spent: {}\n  Remaining: {}\n\n",
        budget.total_expenses,
        budget.remaining()
    ));
    output.push_str(&format_entries(&detail.entries));
    output
}

/// Format per-category totals for display.
pub fn format_totals(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return "No totals found.".to_string();
    }
    let mut output = format!("TOTALS ({})\n", totals.len());
    output.push_str(&"-".repeat(40));
    for total in totals {
        output.push_str(&format!(
            "\n  {:<16}{:>12}",
            total.category.as_str(),
            total.amount.to_string()
        ));
    }
    output
}

/// Format the outcome of a budget sync.
pub fn format_sync_report(report: &SyncReport) -> String {
    format!(
        "Synced budgets: {} created, {} updated, {} deleted",
        report.created, report.updated, report.deleted
    )
}

/// Format the sync status.
pub fn format_sync_state(state: &SyncState) -> String {
    let mut output = match state.last_synced_at {
        Some(at) => format!("Last synced: {}", at.to_rfc3339()),
        None => "Never synced".to_string(),
    };
    if let Some(error) = &state.sync_error {
        output.push_str(&format!("\n  Error: {}", error));
    }
    output
}

/// Format a user for display.
pub fn format_user(user: &UserInfo) -> String {
    match &user.name {
        Some(name) => format!("{}\n  ID: {}\n  Email: {}", name, user.id, user.email),
        None => format!("{}\n  ID: {}", user.email, user.id),
    }
}

/// Format users for display.
pub fn format_users(users: &[UserInfo]) -> String {
    if users.is_empty() {
        return "No collaborators found.".to_string();
    }
    let mut output = format!("COLLABORATORS ({})\n", users.len());
    output.push_str(&"-".repeat(40));
    for user in users {
        output.push_str(&format!("\n{}", format_user(user)));
        output.push('\n');
    }
    output
}

/// Format an added collaborator.
pub fn format_collaborator(collaborator: &CollaboratorResponse) -> String {
    format!(
        "Added to {}:\n{}",
        collaborator.budget_id,
        format_user(&collaborator.user)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetsync_core::budget::Category;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_budgets(&[]), "No budgets found.");
        assert_eq!(format_entries(&[]), "No entries found.");
        assert_eq!(format_totals(&[]), "No totals found.");
        assert_eq!(format_users(&[]), "No collaborators found.");
    }

    #[test]
    fn test_format_budgets_header() {
        let budgets = vec![Budget::new("Rent", dec!(900), date()).with_id(0)];

        let output = format_budgets(&budgets);

        assert!(output.starts_with("BUDGETS (1)\n"));
        assert!(output.contains("Rent\n  ID: 0\n  Amount: 900\n  Date: 2024-02-10"));
    }

    #[test]
    fn test_format_entry_placeholder_and_invoice() {
        let entry = BudgetEntry::outcome(1, "4.5", "", Category::Food, date())
            .with_id(2)
            .with_invoice("receipt.jpg");

        let output = format_entry(&entry);

        assert!(output.starts_with("(no description) [OUTCOME]"));
        assert!(output.contains("Category: FOOD"));
        assert!(output.ends_with("Invoice: receipt.jpg"));
    }

    #[test]
    fn test_format_detail_shows_remaining() {
        let budget = Budget::new("Trip", dec!(100), date()).with_id(1);
        let entries = vec![BudgetEntry::outcome(1, "30", "Train", Category::Travel, date())];

        let output = format_detail(&BudgetDetail::new(budget, entries));

        assert!(output.contains("Spent: 30"));
        assert!(output.contains("Remaining: 70"));
        assert!(output.contains("ENTRIES (1)"));
    }

    #[test]
    fn test_format_sync_state_with_error() {
        let state = SyncState {
            syncing: false,
            last_synced_at: None,
            sync_error: Some("Server returned 500".to_string()),
        };

        assert_eq!(
            format_sync_state(&state),
            "Never synced\n  Error: Server returned 500"
        );
    }
}
