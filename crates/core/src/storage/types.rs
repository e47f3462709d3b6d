use serde::{Deserialize, Serialize};

/// Table touched by a committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Budget,
    BudgetEntry,
}

/// Notification emitted on the store's change feed after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChange {
    pub table: Table,
}

impl TableChange {
    pub fn budgets() -> Self {
        Self {
            table: Table::Budget,
        }
    }

    pub fn entries() -> Self {
        Self {
            table: Table::BudgetEntry,
        }
    }

    /// Returns true if a live query over `table` must re-read.
    pub fn affects(&self, table: Table) -> bool {
        self.table == table
    }
}

/// Kind of row a remote identity is linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Budget,
    Entry,
}

impl LinkKind {
    /// Stored text representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Budget => "budget",
            LinkKind::Entry => "entry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_affects_only_its_table() {
        assert!(TableChange::budgets().affects(Table::Budget));
        assert!(!TableChange::budgets().affects(Table::BudgetEntry));
        assert!(TableChange::entries().affects(Table::BudgetEntry));
    }

    #[test]
    fn test_link_kind_text() {
        assert_eq!(LinkKind::Budget.as_str(), "budget");
        assert_eq!(LinkKind::Entry.as_str(), "entry");
    }
}
