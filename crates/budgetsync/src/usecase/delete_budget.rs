use std::sync::Arc;

use crate::dispatch::Dispatchers;
use crate::error::Result;
use crate::repository::BudgetRepository;

/// Deletes a budget together with every entry that references it.
#[derive(Clone)]
pub struct DeleteBudgetUseCase {
    budgets: Arc<dyn BudgetRepository>,
    dispatchers: Dispatchers,
}

impl DeleteBudgetUseCase {
    pub fn new(budgets: Arc<dyn BudgetRepository>, dispatchers: Dispatchers) -> Self {
        Self {
            budgets,
            dispatchers,
        }
    }

    /// Returns the number of entries removed with the budget.
    pub async fn execute(&self, budget_id: i64) -> Result<usize> {
        let budgets = Arc::clone(&self.budgets);
        let removed = self
            .dispatchers
            .io(async move { budgets.delete_with_entries(budget_id).await })
            .await?;

        tracing::info!(budget_id, entries = removed, "Deleted budget");
        Ok(removed)
    }
}
