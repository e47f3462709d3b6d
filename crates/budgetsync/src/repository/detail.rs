//! Combined budget + entries view.

use std::sync::Arc;

use budgetsync_core::budget::{Budget, BudgetDetail, BudgetEntry};
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use crate::cache::BoxStream;
use crate::dispatch::Dispatchers;
use crate::error::Result;
use crate::usecase::DeleteBudgetUseCase;

use super::{BudgetEntryRepository, BudgetRepository};

/// Buffer between the combining task and the returned stream.
const DETAIL_CHANNEL_CAPACITY: usize = 16;

/// Joins one budget with its entries and keeps the latest join cached.
///
/// State machine of the cached detail: `BudgetDetail::default()` until the
/// first join is observed, then replaced only when the joined value changes.
pub struct BudgetDetailRepository {
    budgets: Arc<dyn BudgetRepository>,
    entries: Arc<dyn BudgetEntryRepository>,
    delete_budget: DeleteBudgetUseCase,
    dispatchers: Dispatchers,
    cached: Arc<Mutex<BudgetDetail>>,
}

impl BudgetDetailRepository {
    pub fn new(
        budgets: Arc<dyn BudgetRepository>,
        entries: Arc<dyn BudgetEntryRepository>,
        delete_budget: DeleteBudgetUseCase,
        dispatchers: Dispatchers,
    ) -> Self {
        Self {
            budgets,
            entries,
            delete_budget,
            dispatchers,
            cached: Arc::new(Mutex::new(BudgetDetail::default())),
        }
    }

    /// Combine-latest of the budget and its entries.
    ///
    /// Nothing is emitted while the budget is missing, and consecutive equal
    /// joins are emitted once. The combining task runs on the compute
    /// context and stops when the returned stream is dropped or either
    /// source stream ends.
    pub fn observe(&self, budget_id: i64) -> BoxStream<BudgetDetail> {
        let (tx, rx) = mpsc::channel(DETAIL_CHANNEL_CAPACITY);
        let mut budgets = self.budgets.budgets();
        let mut entries = self.entries.get_all_by_budget_id(budget_id);
        let cached = Arc::clone(&self.cached);

        self.dispatchers.compute_handle().spawn(async move {
            let mut budget: Option<Budget> = None;
            let mut budget_entries: Option<Vec<BudgetEntry>> = None;
            let mut last: Option<BudgetDetail> = None;

            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    next = budgets.next() => match next {
                        Some(snapshot) => {
                            budget = snapshot.iter().find(|b| b.id == budget_id).cloned();
                        }
                        None => break,
                    },
                    next = entries.next() => match next {
                        Some(list) => budget_entries = Some(list),
                        None => break,
                    },
                }

                let (Some(current_budget), Some(current_entries)) = (&budget, &budget_entries)
                else {
                    continue;
                };
                let detail = BudgetDetail::new(current_budget.clone(), current_entries.clone());
                if last.as_ref() == Some(&detail) {
                    continue;
                }

                {
                    let mut current = cached.lock().await;
                    if *current != detail {
                        *current = detail.clone();
                    }
                }
                last = Some(detail.clone());

                if tx.send(detail).await.is_err() {
                    break;
                }
            }

            tracing::trace!(budget_id, "Detail stream closed");
        });

        Box::pin(ReceiverStream::new(rx))
    }

    /// Latest joined detail, or `BudgetDetail::default()` before any join.
    pub async fn cached_detail(&self) -> BudgetDetail {
        self.cached.lock().await.clone()
    }

    /// Resets the cached detail to the uninitialized value.
    pub async fn clear_cache(&self) {
        *self.cached.lock().await = BudgetDetail::default();
    }

    /// Deletes a budget and its entries.
    pub async fn delete_budget(&self, budget_id: i64) -> Result<usize> {
        self.delete_budget.execute(budget_id).await
    }

    pub async fn delete_entries_by_ids(&self, ids: Vec<i64>) -> Result<usize> {
        self.entries.delete_by_ids(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use budgetsync_core::budget::Category;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    async fn app_with_budget() -> (App, Budget) {
        let app = App::in_memory().await.unwrap();
        let budget = app
            .budgets
            .create(Budget::new("November", dec!(600), date(1)))
            .await
            .unwrap();
        (app, budget)
    }

    #[tokio::test]
    async fn test_detail_joins_budget_and_entries() {
        let (app, budget) = app_with_budget().await;
        app.entries
            .create(BudgetEntry::outcome(budget.id, "40", "Gym", Category::Health, date(2)))
            .await
            .unwrap();

        let mut details = app.details.observe(budget.id);
        let detail = loop {
            let detail = details.next().await.unwrap();
            if !detail.entries.is_empty() {
                break detail;
            }
        };

        assert_eq!(detail.budget.id, budget.id);
        assert_eq!(detail.budget.total_expenses, dec!(40));
        assert_eq!(app.details.cached_detail().await, detail);
    }

    #[tokio::test]
    async fn test_missing_budget_emits_nothing() {
        let app = App::in_memory().await.unwrap();
        let mut details = app.details.observe(12345);

        let next = tokio::time::timeout(Duration::from_millis(50), details.next()).await;

        assert!(next.is_err());
        assert_eq!(app.details.cached_detail().await, BudgetDetail::default());
    }

    #[tokio::test]
    async fn test_unrelated_change_does_not_reemit() {
        let (app, budget) = app_with_budget().await;
        let mut details = app.details.observe(budget.id);
        let first = details.next().await.unwrap();

        // Entries of another budget change the entry table but not this join.
        app.entries
            .create(BudgetEntry::outcome(budget.id + 1, "5", "Other", Category::Other, date(3)))
            .await
            .unwrap();
        let next = tokio::time::timeout(Duration::from_millis(50), details.next()).await;

        assert!(next.is_err());
        assert_eq!(app.details.cached_detail().await, first);
    }

    #[tokio::test]
    async fn test_clear_cache_resets_to_default() {
        let (app, budget) = app_with_budget().await;
        let mut details = app.details.observe(budget.id);
        details.next().await.unwrap();

        app.details.clear_cache().await;

        assert_eq!(app.details.cached_detail().await, BudgetDetail::default());
    }

    #[tokio::test]
    async fn test_delete_budget_cascades() {
        let (app, budget) = app_with_budget().await;
        let entry = app
            .entries
            .create(BudgetEntry::outcome(budget.id, "1", "x", Category::Food, date(2)))
            .await
            .unwrap();

        let removed = app.details.delete_budget(budget.id).await.unwrap();

        assert_eq!(removed, 1);
        app.entry_source
            .subscription()
            .wait_for(|entries| entries.iter().all(|e| e.id != entry.id))
            .await
            .unwrap();
        assert!(app.entries.entry(entry.id).await.is_none());
    }
}
