use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of a row that has not been persisted yet.
pub const UNSAVED_ID: i64 = -1;

/// A named spending envelope with a total amount and creation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub amount: Decimal,
    pub name: String,
    /// Sum of the budget's outcome entries. Derived, never stored.
    #[serde(default)]
    pub total_expenses: Decimal,
    pub date: NaiveDate,
}

impl Budget {
    /// Creates a new, unsaved budget.
    pub fn new(name: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: UNSAVED_ID,
            amount,
            name: name.into(),
            total_expenses: Decimal::ZERO,
            date,
        }
    }

    /// Sets a specific ID for this budget.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Returns true once the store has assigned an identity.
    pub fn is_persisted(&self) -> bool {
        self.id >= 0
    }

    /// Amount left after subtracting the derived expenses.
    pub fn remaining(&self) -> Decimal {
        self.amount - self.total_expenses
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            amount: Decimal::ZERO,
            name: String::new(),
            total_expenses: Decimal::ZERO,
            date: NaiveDate::default(),
        }
    }
}

/// Direction of money for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Outcome,
    Income,
}

impl EntryType {
    /// Stored text representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Outcome => "OUTCOME",
            EntryType::Income => "INCOME",
        }
    }

    /// Parses the stored text representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OUTCOME" => Some(EntryType::Outcome),
            "INCOME" => Some(EntryType::Income),
            _ => None,
        }
    }
}

/// Closed set of spending categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Groceries,
    Health,
    Transport,
    Housing,
    Utilities,
    Entertainment,
    Shopping,
    Education,
    Travel,
    Salary,
    Other,
}

impl Category {
    /// Every category in enumeration order.
    pub const ALL: [Category; 12] = [
        Category::Food,
        Category::Groceries,
        Category::Health,
        Category::Transport,
        Category::Housing,
        Category::Utilities,
        Category::Entertainment,
        Category::Shopping,
        Category::Education,
        Category::Travel,
        Category::Salary,
        Category::Other,
    ];

    /// Stored text representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Groceries => "GROCERIES",
            Category::Health => "HEALTH",
            Category::Transport => "TRANSPORT",
            Category::Housing => "HOUSING",
            Category::Utilities => "UTILITIES",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Shopping => "SHOPPING",
            Category::Education => "EDUCATION",
            Category::Travel => "TRAVEL",
            Category::Salary => "SALARY",
            Category::Other => "OTHER",
        }
    }

    /// Parses the stored text representation.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// A single income/outcome transaction attributed to a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub id: i64,
    pub budget_id: i64,
    /// Decimal amount kept as entered.
    pub amount: String,
    pub description: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: Category,
    pub date: NaiveDate,
    /// Path or URI of an attached receipt.
    pub invoice: Option<String>,
    /// UI selection state, never persisted.
    #[serde(skip)]
    pub is_selected: bool,
}

impl BudgetEntry {
    /// Creates a new, unsaved outcome entry.
    pub fn outcome(
        budget_id: i64,
        amount: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            budget_id,
            amount: amount.into(),
            description: description.into(),
            entry_type: EntryType::Outcome,
            category,
            date,
            invoice: None,
            is_selected: false,
        }
    }

    /// Creates a new, unsaved income entry.
    pub fn income(
        budget_id: i64,
        amount: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            entry_type: EntryType::Income,
            ..Self::outcome(budget_id, amount, description, category, date)
        }
    }

    /// Sets a specific ID for this entry.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Attaches a receipt path.
    pub fn with_invoice(mut self, invoice: impl Into<String>) -> Self {
        self.invoice = Some(invoice.into());
        self
    }

    /// Parses the amount text, `None` when it is not a number.
    pub fn parsed_amount(&self) -> Option<Decimal> {
        self.amount.trim().parse::<Decimal>().ok()
    }
}

/// Read-only join of one budget with its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetDetail {
    pub budget: Budget,
    pub entries: Vec<BudgetEntry>,
}

impl BudgetDetail {
    /// Joins a budget with its entries and derives `total_expenses`.
    pub fn new(mut budget: Budget, entries: Vec<BudgetEntry>) -> Self {
        budget.total_expenses = super::operations::total_expenses(&entries);
        Self { budget, entries }
    }
}

/// Predicate over entries. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntryFilter {
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BudgetEntryFilter {
    /// Returns true if the entry satisfies every set field.
    pub fn matches(&self, entry: &BudgetEntry) -> bool {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_lowercase);

        description.is_none_or(|d| entry.description.to_lowercase().contains(&d))
            && self.entry_type.is_none_or(|t| entry.entry_type == t)
            && self.start_date.is_none_or(|s| entry.date >= s)
            && self.end_date.is_none_or(|e| entry.date <= e)
    }
}

/// Sum of one category across a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Decimal,
}
