use thiserror::Error;

/// Errors that can occur when validating budgets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Budget name cannot be empty")]
    EmptyName,
    #[error("Budget amount cannot be negative")]
    NegativeAmount,
}

/// Errors that can occur when validating budget entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Entry amount is not a number: {0}")]
    InvalidAmount(String),
    #[error("Entry amount cannot be negative: {0}")]
    NegativeAmount(String),
    #[error("Entry description too long (max 200 characters)")]
    DescriptionTooLong,
    #[error("Budget ID is required")]
    MissingBudgetId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_error_display() {
        assert_eq!(
            BudgetError::EmptyName.to_string(),
            "Budget name cannot be empty"
        );
        assert_eq!(
            BudgetError::NegativeAmount.to_string(),
            "Budget amount cannot be negative"
        );
    }

    #[test]
    fn test_entry_error_display() {
        assert_eq!(
            EntryError::InvalidAmount("1,2".to_string()).to_string(),
            "Entry amount is not a number: 1,2"
        );
        assert_eq!(
            EntryError::MissingBudgetId.to_string(),
            "Budget ID is required"
        );
    }
}
