//! Wire types shared by the remote client and the sync reconciler.
//!
//! Pure data with no I/O.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::{Budget, BudgetEntry, Category, EntryType, UNSAVED_ID};

/// Request payload for creating a shared budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBudgetRequest {
    pub name: String,
    pub amount: Decimal,
}

impl CreateBudgetRequest {
    pub fn from_budget(budget: &Budget) -> Self {
        Self {
            name: budget.name.clone(),
            amount: budget.amount,
        }
    }
}

/// A budget as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl BudgetResponse {
    /// Converts into an unsaved local budget.
    ///
    /// The backend may omit the date; `fallback_date` is used then.
    pub fn to_budget(&self, fallback_date: NaiveDate) -> Budget {
        Budget::new(
            self.name.clone(),
            self.amount,
            self.date.unwrap_or(fallback_date),
        )
    }

    /// Returns true if the local budget carries different user-visible fields.
    pub fn differs_from(&self, budget: &Budget) -> bool {
        self.name != budget.name
            || self.amount != budget.amount
            || self.date.is_some_and(|d| d != budget.date)
    }
}

/// Confirmation of an added collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorResponse {
    pub budget_id: String,
    pub user: UserInfo,
}

/// A user that can access a shared budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An entry of a shared budget as pushed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub id: String,
    pub budget_id: String,
    pub amount: String,
    pub description: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
}

impl RemoteEntry {
    /// Converts into an unsaved local entry owned by `local_budget_id`.
    pub fn to_entry(&self, local_budget_id: i64) -> BudgetEntry {
        BudgetEntry {
            id: UNSAVED_ID,
            budget_id: local_budget_id,
            amount: self.amount.clone(),
            description: self.description.clone(),
            entry_type: self.entry_type,
            category: self.category,
            date: self.date,
            invoice: self.invoice.clone(),
            is_selected: false,
        }
    }
}

/// A change pushed by the backend over the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteEvent {
    BudgetUpserted { budget: BudgetResponse },
    BudgetDeleted { id: String },
    EntryUpserted { entry: RemoteEntry },
    EntryDeleted { id: String, budget_id: String },
}
