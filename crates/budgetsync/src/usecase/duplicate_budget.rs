use std::sync::Arc;

use budgetsync_core::budget::{duplicate_budget, duplicate_entries, Budget, UNSAVED_ID};
use tokio_stream::StreamExt;

use crate::dispatch::Dispatchers;
use crate::error::{Error, Result};
use crate::repository::{BudgetEntryRepository, BudgetRepository};

/// Copies a budget and all its entries under a new identity.
#[derive(Clone)]
pub struct DuplicateBudgetUseCase {
    budgets: Arc<dyn BudgetRepository>,
    entries: Arc<dyn BudgetEntryRepository>,
    dispatchers: Dispatchers,
}

impl DuplicateBudgetUseCase {
    pub fn new(
        budgets: Arc<dyn BudgetRepository>,
        entries: Arc<dyn BudgetEntryRepository>,
        dispatchers: Dispatchers,
    ) -> Self {
        Self {
            budgets,
            entries,
            dispatchers,
        }
    }

    /// Returns the persisted copy.
    ///
    /// The copy is named `"{name} (copy)"` and receives the entries of the
    /// first emission of the original's entry stream.
    pub async fn execute(&self, budget: Budget) -> Result<Budget> {
        let budgets = Arc::clone(&self.budgets);
        let entries = Arc::clone(&self.entries);

        self.dispatchers
            .compute(async move {
                let original = entries
                    .get_all_by_budget_id(budget.id)
                    .next()
                    .await
                    .ok_or_else(|| {
                        Error::Dispatch("entry stream closed before first snapshot".to_string())
                    })?;

                let copy = duplicate_budget(&budget);
                // The store assigns the new owner inside the transaction.
                let copies = duplicate_entries(&original, UNSAVED_ID);
                let created = budgets.create_with_entries(copy, copies).await?;

                tracing::info!(
                    from = budget.id,
                    to = created.id,
                    entries = original.len(),
                    "Duplicated budget"
                );
                Ok::<_, Error>(created)
            })
            .await
    }
}
