//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
///
/// `budget_entry.budget_id` is a logical reference to `budget.id`; the
/// cascade on budget deletion is done by the store, not by SQLite.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS budget (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    amount TEXT NOT NULL,
    date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS budget_entry (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    budget_id INTEGER NOT NULL,
    amount TEXT NOT NULL,
    description TEXT NOT NULL,
    type TEXT NOT NULL,
    category TEXT NOT NULL,
    date TEXT NOT NULL,
    invoice TEXT
);

CREATE TABLE IF NOT EXISTS remote_link (
    kind TEXT NOT NULL,
    local_id INTEGER NOT NULL,
    remote_id TEXT NOT NULL,
    PRIMARY KEY (kind, local_id),
    UNIQUE (kind, remote_id)
);

CREATE INDEX IF NOT EXISTS idx_budget_entry_budget_id ON budget_entry(budget_id);
CREATE INDEX IF NOT EXISTS idx_budget_entry_date ON budget_entry(date);
"#;

// Budget queries
pub const SELECT_BUDGETS: &str = r#"
SELECT id, name, amount, date
FROM budget
ORDER BY id ASC
"#;

pub const INSERT_BUDGET: &str = r#"
INSERT INTO budget (name, amount, date)
VALUES (?1, ?2, ?3)
"#;

pub const UPDATE_BUDGET: &str = r#"
UPDATE budget
SET name = ?2, amount = ?3, date = ?4
WHERE id = ?1
"#;

pub const DELETE_BUDGET: &str = r#"
DELETE FROM budget
WHERE id = ?1
"#;

// Entry queries
pub const SELECT_ENTRIES: &str = r#"
SELECT id, budget_id, amount, description, type, category, date, invoice
FROM budget_entry
ORDER BY date ASC, id ASC
"#;

pub const INSERT_ENTRY: &str = r#"
INSERT INTO budget_entry (budget_id, amount, description, type, category, date, invoice)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const UPDATE_ENTRY: &str = r#"
UPDATE budget_entry
SET budget_id = ?2, amount = ?3, description = ?4, type = ?5, category = ?6, date = ?7, invoice = ?8
WHERE id = ?1
"#;

pub const DELETE_ENTRY: &str = r#"
DELETE FROM budget_entry
WHERE id = ?1
"#;

pub const DELETE_ENTRIES_BY_BUDGET: &str = r#"
DELETE FROM budget_entry
WHERE budget_id = ?1
"#;

// Remote link queries
pub const UPSERT_LINK: &str = r#"
INSERT OR REPLACE INTO remote_link (kind, local_id, remote_id)
VALUES (?1, ?2, ?3)
"#;

pub const DELETE_LINK: &str = r#"
DELETE FROM remote_link
WHERE kind = ?1 AND local_id = ?2
"#;

pub const SELECT_LOCAL_ID: &str = r#"
SELECT local_id
FROM remote_link
WHERE kind = ?1 AND remote_id = ?2
"#;

pub const SELECT_REMOTE_ID: &str = r#"
SELECT remote_id
FROM remote_link
WHERE kind = ?1 AND local_id = ?2
"#;

pub const SELECT_LINKS: &str = r#"
SELECT local_id, remote_id
FROM remote_link
WHERE kind = ?1
ORDER BY local_id ASC
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS budget ("));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS budget_entry"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS remote_link"));
        assert!(!CREATE_TABLES.contains("FOREIGN KEY"));
    }

    #[test]
    fn test_queries_contain_expected_keywords() {
        assert!(SELECT_BUDGETS.contains("SELECT"));
        assert!(INSERT_BUDGET.contains("INSERT"));
        assert!(UPDATE_BUDGET.contains("UPDATE"));
        assert!(DELETE_BUDGET.contains("DELETE"));

        assert!(SELECT_ENTRIES.contains("ORDER BY date"));
        assert!(INSERT_ENTRY.contains("INSERT"));
        assert!(UPDATE_ENTRY.contains("UPDATE"));
        assert!(DELETE_ENTRY.contains("DELETE"));
        assert!(DELETE_ENTRIES_BY_BUDGET.contains("budget_id = ?1"));

        assert!(UPSERT_LINK.contains("INSERT OR REPLACE"));
        assert!(SELECT_LINKS.contains("kind = ?1"));
    }
}
