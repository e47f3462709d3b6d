use std::sync::Arc;

use budgetsync_core::budget::{
    filter_entries_by_budget, totals_per_category, BudgetEntry, CategoryTotal,
};

use crate::dispatch::Dispatchers;
use crate::error::{Error, Result};
use crate::repository::BudgetEntryRepository;

/// Aggregates cached entry amounts per category.
#[derive(Clone)]
pub struct GetTotalsPerCategoryUseCase {
    entries: Arc<dyn BudgetEntryRepository>,
    dispatchers: Dispatchers,
}

impl GetTotalsPerCategoryUseCase {
    pub fn new(entries: Arc<dyn BudgetEntryRepository>, dispatchers: Dispatchers) -> Self {
        Self {
            entries,
            dispatchers,
        }
    }

    /// Totals over every cached entry, largest first.
    pub async fn execute(&self) -> Result<Vec<CategoryTotal>> {
        let entries = Arc::clone(&self.entries);
        self.dispatchers
            .compute(async move {
                let cached = entries.cached_entries().await;
                Ok::<_, Error>(aggregate(&cached))
            })
            .await
    }

    /// Totals over the cached entries of one budget.
    pub async fn execute_for_budget(&self, budget_id: i64) -> Result<Vec<CategoryTotal>> {
        let entries = Arc::clone(&self.entries);
        self.dispatchers
            .compute(async move {
                let cached = entries.cached_entries().await;
                let scoped = filter_entries_by_budget(&cached, budget_id);
                Ok::<_, Error>(aggregate(&scoped))
            })
            .await
    }
}

fn aggregate(entries: &[BudgetEntry]) -> Vec<CategoryTotal> {
    for entry in entries.iter().filter(|e| e.parsed_amount().is_none()) {
        tracing::debug!(
            entry_id = entry.id,
            amount = %entry.amount,
            "Unparseable amount counted as zero"
        );
    }
    totals_per_category(entries)
}
