//! Remote sync reconciler.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use budgetsync_core::budget::Budget;
use budgetsync_core::remote::{
    BudgetResponse, CollaboratorResponse, CreateBudgetRequest, RemoteBudgetSource, RemoteEntry,
    RemoteEvent, RemoteEventStream, UserInfo,
};
use budgetsync_core::storage::{LinkKind, LocalStore, StorageError};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::StreamExt;

use crate::dispatch::Dispatchers;
use crate::error::{Error, Result};
use crate::repository::{BudgetEntryRepository, BudgetRepository};
use crate::usecase::DeleteBudgetUseCase;

use super::SyncState;

/// Counts of local changes made by one [`SyncService::sync_budgets`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

enum Upsert {
    Created,
    Updated,
    Unchanged,
}

/// Applies backend state to the local store.
///
/// Remote budgets are matched to local ones through the remote link table.
/// Reconciliation reads the store directly, so it never acts on a stale
/// cache. Every write goes through the repositories and reaches the caches
/// like any other write.
pub struct SyncService {
    remote: Arc<dyn RemoteBudgetSource>,
    budgets: Arc<dyn BudgetRepository>,
    entries: Arc<dyn BudgetEntryRepository>,
    store: Arc<dyn LocalStore>,
    delete_budget: DeleteBudgetUseCase,
    dispatchers: Dispatchers,
    state: watch::Sender<SyncState>,
}

impl SyncService {
    pub fn new(
        remote: Arc<dyn RemoteBudgetSource>,
        budgets: Arc<dyn BudgetRepository>,
        entries: Arc<dyn BudgetEntryRepository>,
        store: Arc<dyn LocalStore>,
        delete_budget: DeleteBudgetUseCase,
        dispatchers: Dispatchers,
    ) -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self {
            remote,
            budgets,
            entries,
            store,
            delete_budget,
            dispatchers,
            state,
        }
    }

    /// Observes the sync status.
    pub fn state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Pulls every remote budget and reconciles the linked local budgets.
    ///
    /// Unknown remote budgets are created locally, changed ones are updated,
    /// and linked local budgets that disappeared remotely are deleted with
    /// their entries.
    pub async fn sync_budgets(&self) -> Result<SyncReport> {
        self.state.send_modify(|state| *state = state.started());
        let result = self.reconcile_budgets().await;

        match &result {
            Ok(report) => {
                tracing::info!(
                    created = report.created,
                    updated = report.updated,
                    deleted = report.deleted,
                    "Budgets synced"
                );
                self.state
                    .send_modify(|state| *state = state.succeeded(Utc::now()));
            }
            Err(e) => self.record_error(e),
        }
        result
    }

    /// Publishes a local budget to the backend and links the two ids.
    ///
    /// Returns the remote id. Sharing an already shared budget returns the
    /// existing remote id without calling the backend.
    pub async fn share_budget(&self, local_id: i64) -> Result<String> {
        let result = self.share(local_id).await;
        self.record(&result);
        result
    }

    /// Invites a user, by email, to a shared budget.
    pub async fn add_collaborator(
        &self,
        local_id: i64,
        email: &str,
    ) -> Result<CollaboratorResponse> {
        let result = self.invite(local_id, email.to_string()).await;
        self.record(&result);
        result
    }

    /// Lists the users of a shared budget.
    pub async fn collaborators(&self, local_id: i64) -> Result<Vec<UserInfo>> {
        let result = self.list_collaborators(local_id).await;
        self.record(&result);
        result
    }

    /// Reconciles one pushed change into the local store.
    pub async fn apply_event(&self, event: RemoteEvent) -> Result<()> {
        let result = match event {
            RemoteEvent::BudgetUpserted { budget } => self.apply_budget_upsert(&budget).await,
            RemoteEvent::BudgetDeleted { id } => self.delete_linked_budget(&id).await.map(|_| ()),
            RemoteEvent::EntryUpserted { entry } => self.upsert_entry(&entry).await,
            RemoteEvent::EntryDeleted { id, .. } => self.delete_linked_entry(&id).await,
        };
        self.record(&result);
        result
    }

    /// Applies remote events until the stream ends or `shutdown` resolves.
    ///
    /// A failed event is logged and recorded in the sync state; the loop
    /// keeps going.
    pub async fn run<S>(&self, mut events: RemoteEventStream, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Remote sync stopped");
                    break;
                }
                next = events.next() => match next {
                    Some(Ok(event)) => {
                        tracing::debug!(?event, "Remote event");
                        // apply_event records its own failures
                        let _ = self.apply_event(event).await;
                    }
                    Some(Err(e)) => self.record_error(&Error::from(e)),
                    None => {
                        tracing::info!("Remote event stream ended");
                        break;
                    }
                },
            }
        }
    }

    fn record<T>(&self, result: &Result<T>) {
        match result {
            Ok(_) => {
                self.state.send_if_modified(|state| {
                    if state.sync_error.is_none() {
                        return false;
                    }
                    *state = state.cleared();
                    true
                });
            }
            Err(e) => self.record_error(e),
        }
    }

    fn record_error(&self, error: &Error) {
        let description = error.describe();
        tracing::warn!(error = %description, "Remote sync failed");
        self.state
            .send_modify(|state| *state = state.failed(description));
    }

    async fn reconcile_budgets(&self) -> Result<SyncReport> {
        let remote = Arc::clone(&self.remote);
        let remote_budgets = self
            .dispatchers
            .io(async move { remote.get_budgets().await })
            .await?;

        let local = self.local_budgets().await?;
        let links: HashMap<String, i64> = self
            .store
            .links(LinkKind::Budget)
            .await?
            .into_iter()
            .map(|(local_id, remote_id)| (remote_id, local_id))
            .collect();

        let mut report = SyncReport::default();
        for remote_budget in &remote_budgets {
            let existing = links
                .get(&remote_budget.id)
                .and_then(|local_id| local.iter().find(|b| b.id == *local_id));
            match self.upsert_budget(remote_budget, existing).await? {
                Upsert::Created => report.created += 1,
                Upsert::Updated => report.updated += 1,
                Upsert::Unchanged => {}
            }
        }

        let remote_ids: HashSet<&str> = remote_budgets.iter().map(|b| b.id.as_str()).collect();
        for remote_id in links.keys().filter(|id| !remote_ids.contains(id.as_str())) {
            if self.delete_linked_budget(remote_id).await? {
                report.deleted += 1;
            }
        }

        Ok(report)
    }

    /// Budgets as committed in the store, ahead of any cache refresh.
    async fn local_budgets(&self) -> Result<Vec<Budget>> {
        let store = Arc::clone(&self.store);
        self.dispatchers
            .io(async move { store.all_budgets().await })
            .await
    }

    async fn apply_budget_upsert(&self, remote_budget: &BudgetResponse) -> Result<()> {
        let local = self.local_budgets().await?;
        let linked = self
            .store
            .local_id(LinkKind::Budget, &remote_budget.id)
            .await?;
        let existing = linked.and_then(|local_id| local.iter().find(|b| b.id == local_id));
        self.upsert_budget(remote_budget, existing).await?;
        Ok(())
    }

    async fn upsert_budget(
        &self,
        remote_budget: &BudgetResponse,
        existing: Option<&Budget>,
    ) -> Result<Upsert> {
        match existing {
            Some(budget) if remote_budget.differs_from(budget) => {
                let updated = Budget {
                    name: remote_budget.name.clone(),
                    amount: remote_budget.amount,
                    date: remote_budget.date.unwrap_or(budget.date),
                    ..budget.clone()
                };
                self.budgets.update(updated).await?;
                tracing::debug!(
                    budget_id = budget.id,
                    remote_id = %remote_budget.id,
                    "Updated budget from remote"
                );
                Ok(Upsert::Updated)
            }
            Some(_) => Ok(Upsert::Unchanged),
            None => {
                let created = self
                    .budgets
                    .create(remote_budget.to_budget(Utc::now().date_naive()))
                    .await?;
                self.store
                    .link(LinkKind::Budget, created.id, &remote_budget.id)
                    .await?;
                tracing::debug!(
                    budget_id = created.id,
                    remote_id = %remote_budget.id,
                    "Created budget from remote"
                );
                Ok(Upsert::Created)
            }
        }
    }

    /// Deletes the local budget linked to `remote_id`, if any.
    ///
    /// Returns true if a local budget was removed.
    async fn delete_linked_budget(&self, remote_id: &str) -> Result<bool> {
        let Some(local_id) = self.store.local_id(LinkKind::Budget, remote_id).await? else {
            tracing::debug!(remote_id, "Ignoring deletion of unlinked budget");
            return Ok(false);
        };

        let deleted = match self.delete_budget.execute(local_id).await {
            Ok(_) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e),
        };
        self.store.unlink(LinkKind::Budget, local_id).await?;
        Ok(deleted)
    }

    async fn upsert_entry(&self, remote_entry: &RemoteEntry) -> Result<()> {
        let budget_id = self
            .store
            .local_id(LinkKind::Budget, &remote_entry.budget_id)
            .await?
            .ok_or_else(|| {
                Error::Sync(format!(
                    "entry {} references unknown remote budget {}",
                    remote_entry.id, remote_entry.budget_id
                ))
            })?;
        let entry = remote_entry.to_entry(budget_id);

        if let Some(local_id) = self.store.local_id(LinkKind::Entry, &remote_entry.id).await? {
            match self.entries.update(entry.clone().with_id(local_id)).await {
                Ok(()) => return Ok(()),
                // Deleted locally since it was linked; recreate below.
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        let created = self.entries.create(entry).await?;
        self.store
            .link(LinkKind::Entry, created.id, &remote_entry.id)
            .await?;
        Ok(())
    }

    async fn delete_linked_entry(&self, remote_id: &str) -> Result<()> {
        let Some(local_id) = self.store.local_id(LinkKind::Entry, remote_id).await? else {
            tracing::debug!(remote_id, "Ignoring deletion of unlinked entry");
            return Ok(());
        };

        match self.entries.delete(local_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.store.unlink(LinkKind::Entry, local_id).await?;
        Ok(())
    }

    async fn share(&self, local_id: i64) -> Result<String> {
        if let Some(remote_id) = self.store.remote_id(LinkKind::Budget, local_id).await? {
            return Ok(remote_id);
        }

        let local = self.local_budgets().await?;
        let budget = local
            .iter()
            .find(|b| b.id == local_id)
            .ok_or_else(|| StorageError::not_found("Budget", local_id))?;

        let remote = Arc::clone(&self.remote);
        let request = CreateBudgetRequest::from_budget(budget);
        let response = self
            .dispatchers
            .io(async move { remote.create_budget(request).await })
            .await?;

        self.store
            .link(LinkKind::Budget, local_id, &response.id)
            .await?;
        tracing::info!(budget_id = local_id, remote_id = %response.id, "Shared budget");
        Ok(response.id)
    }

    async fn invite(&self, local_id: i64, email: String) -> Result<CollaboratorResponse> {
        let budget_id = self.remote_budget_id(local_id).await?;
        let remote = Arc::clone(&self.remote);
        let response = self
            .dispatchers
            .io(async move { remote.add_collaborator(&budget_id, &email).await })
            .await?;
        tracing::info!(budget_id = local_id, user = %response.user.email, "Added collaborator");
        Ok(response)
    }

    async fn list_collaborators(&self, local_id: i64) -> Result<Vec<UserInfo>> {
        let budget_id = self.remote_budget_id(local_id).await?;
        let remote = Arc::clone(&self.remote);
        self.dispatchers
            .io(async move { remote.get_collaborators(&budget_id).await })
            .await
    }

    async fn remote_budget_id(&self, local_id: i64) -> Result<String> {
        self.store
            .remote_id(LinkKind::Budget, local_id)
            .await?
            .ok_or_else(|| Error::Sync(format!("budget {local_id} is not shared")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use budgetsync_core::budget::{BudgetEntry, Category, EntryType};
    use budgetsync_core::remote::NetworkError;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::app::App;

    #[derive(Default)]
    struct FakeRemote {
        budgets: Mutex<Vec<BudgetResponse>>,
        collaborators: Mutex<HashMap<String, Vec<UserInfo>>>,
        offline: AtomicBool,
        created: AtomicUsize,
    }

    impl FakeRemote {
        fn with_budgets(budgets: Vec<BudgetResponse>) -> Arc<Self> {
            let remote = Self::default();
            *remote.budgets.lock().unwrap() = budgets;
            Arc::new(remote)
        }

        fn set_budgets(&self, budgets: Vec<BudgetResponse>) {
            *self.budgets.lock().unwrap() = budgets;
        }

        fn check(&self) -> budgetsync_core::remote::Result<()> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(NetworkError::with_cause(
                    "Backend unreachable",
                    std::io::Error::other("connection refused"),
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RemoteBudgetSource for FakeRemote {
        async fn create_budget(
            &self,
            request: CreateBudgetRequest,
        ) -> budgetsync_core::remote::Result<BudgetResponse> {
            self.check()?;
            let n = self.created.fetch_add(1, Ordering::SeqCst);
            let response = BudgetResponse {
                id: format!("shared-{n}"),
                name: request.name,
                amount: request.amount,
                date: None,
            };
            self.budgets.lock().unwrap().push(response.clone());
            Ok(response)
        }

        async fn get_budgets(&self) -> budgetsync_core::remote::Result<Vec<BudgetResponse>> {
            self.check()?;
            Ok(self.budgets.lock().unwrap().clone())
        }

        async fn add_collaborator(
            &self,
            budget_id: &str,
            email: &str,
        ) -> budgetsync_core::remote::Result<CollaboratorResponse> {
            self.check()?;
            let user = UserInfo {
                id: format!("user-{email}"),
                email: email.to_string(),
                name: None,
            };
            self.collaborators
                .lock()
                .unwrap()
                .entry(budget_id.to_string())
                .or_default()
                .push(user.clone());
            Ok(CollaboratorResponse {
                budget_id: budget_id.to_string(),
                user,
            })
        }

        async fn get_collaborators(
            &self,
            budget_id: &str,
        ) -> budgetsync_core::remote::Result<Vec<UserInfo>> {
            self.check()?;
            Ok(self
                .collaborators
                .lock()
                .unwrap()
                .get(budget_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn events(&self) -> budgetsync_core::remote::Result<RemoteEventStream> {
            self.check()?;
            Ok(Box::pin(tokio_stream::empty()))
        }
    }

    fn remote_budget(id: &str, name: &str, amount: Decimal) -> BudgetResponse {
        BudgetResponse {
            id: id.to_string(),
            name: name.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 2, 1),
        }
    }

    fn remote_entry(id: &str, budget_id: &str, amount: &str) -> RemoteEntry {
        RemoteEntry {
            id: id.to_string(),
            budget_id: budget_id.to_string(),
            amount: amount.to_string(),
            description: "Shared dinner".to_string(),
            entry_type: EntryType::Outcome,
            category: Category::Food,
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            invoice: None,
        }
    }

    async fn setup(remote: Arc<FakeRemote>) -> (App, SyncService) {
        let app = App::in_memory().await.unwrap();
        let service = app.sync_service(remote);
        (app, service)
    }

    async fn budgets_settled(app: &App, count: usize) -> Vec<Budget> {
        app.budget_source
            .subscription()
            .wait_for(|budgets| budgets.len() == count)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_sync_creates_unknown_remote_budgets() {
        let remote = FakeRemote::with_budgets(vec![
            remote_budget("r-1", "Flat", dec!(1200)),
            remote_budget("r-2", "Trip", dec!(800)),
        ]);
        let (app, service) = setup(remote).await;

        let report = service.sync_budgets().await.unwrap();

        assert_eq!(
            report,
            SyncReport {
                created: 2,
                updated: 0,
                deleted: 0
            }
        );
        let budgets = budgets_settled(&app, 2).await;
        let flat = budgets.iter().find(|b| b.name == "Flat").unwrap();
        assert_eq!(
            app.store.local_id(LinkKind::Budget, "r-1").await.unwrap(),
            Some(flat.id)
        );
    }

    #[tokio::test]
    async fn test_repeated_sync_updates_instead_of_duplicating() {
        let remote = FakeRemote::with_budgets(vec![remote_budget("r-1", "Flat", dec!(1200))]);
        let (app, service) = setup(Arc::clone(&remote)).await;
        service.sync_budgets().await.unwrap();

        remote.set_budgets(vec![remote_budget("r-1", "Flat share", dec!(1300))]);
        let report = service.sync_budgets().await.unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 1);
        let budgets = app
            .budget_source
            .subscription()
            .wait_for(|budgets| budgets.iter().any(|b| b.name == "Flat share"))
            .await
            .unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, dec!(1300));
    }

    #[tokio::test]
    async fn test_budget_removed_remotely_is_deleted_locally() {
        let remote = FakeRemote::with_budgets(vec![remote_budget("r-1", "Flat", dec!(1200))]);
        let (app, service) = setup(Arc::clone(&remote)).await;
        let local_only = app
            .budgets
            .create(Budget::new(
                "Private",
                dec!(50),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ))
            .await
            .unwrap();
        service.sync_budgets().await.unwrap();
        let shared_id = app
            .store
            .local_id(LinkKind::Budget, "r-1")
            .await
            .unwrap()
            .unwrap();
        app.entries
            .create(BudgetEntry::outcome(
                shared_id,
                "20",
                "Cleaning",
                Category::Housing,
                NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
            ))
            .await
            .unwrap();

        remote.set_budgets(Vec::new());
        let report = service.sync_budgets().await.unwrap();

        assert_eq!(report.deleted, 1);
        let budgets = budgets_settled(&app, 1).await;
        assert_eq!(budgets[0].id, local_only.id);
        app.entry_source
            .subscription()
            .wait_for(|entries| entries.is_empty())
            .await
            .unwrap();
        assert!(app.store.links(LinkKind::Budget).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_sets_and_success_clears_sync_error() {
        let remote = FakeRemote::with_budgets(Vec::new());
        remote.offline.store(true, Ordering::SeqCst);
        let (_app, service) = setup(Arc::clone(&remote)).await;
        let state = service.state();

        let result = service.sync_budgets().await;

        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(
            state.borrow().sync_error.as_deref(),
            Some("Backend unreachable: connection refused")
        );
        assert!(!state.borrow().syncing);

        remote.offline.store(false, Ordering::SeqCst);
        service.sync_budgets().await.unwrap();

        let current = state.borrow().clone();
        assert_eq!(current.sync_error, None);
        assert!(current.last_synced_at.is_some());
    }

    #[tokio::test]
    async fn test_share_budget_links_and_is_idempotent() {
        let remote = FakeRemote::with_budgets(Vec::new());
        let (app, service) = setup(Arc::clone(&remote)).await;
        let budget = app
            .budgets
            .create(Budget::new(
                "House",
                dec!(2000),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ))
            .await
            .unwrap();

        let remote_id = service.share_budget(budget.id).await.unwrap();
        let again = service.share_budget(budget.id).await.unwrap();

        assert_eq!(remote_id, again);
        assert_eq!(remote.created.load(Ordering::SeqCst), 1);
        assert_eq!(
            app.store.remote_id(LinkKind::Budget, budget.id).await.unwrap(),
            Some(remote_id)
        );
    }

    #[tokio::test]
    async fn test_collaborators_of_shared_budget() {
        let remote = FakeRemote::with_budgets(Vec::new());
        let (app, service) = setup(remote).await;
        let budget = app
            .budgets
            .create(Budget::new(
                "House",
                dec!(2000),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ))
            .await
            .unwrap();
        service.share_budget(budget.id).await.unwrap();

        let added = service
            .add_collaborator(budget.id, "ana@example.com")
            .await
            .unwrap();
        let users = service.collaborators(budget.id).await.unwrap();

        assert_eq!(added.user.email, "ana@example.com");
        assert_eq!(users, vec![added.user]);
    }

    #[tokio::test]
    async fn test_collaborator_on_unshared_budget_fails() {
        let remote = FakeRemote::with_budgets(Vec::new());
        let (_app, service) = setup(remote).await;

        let result = service.add_collaborator(9, "ana@example.com").await;

        assert!(matches!(result, Err(Error::Sync(_))));
        assert!(service.state().borrow().sync_error.is_some());
    }

    #[tokio::test]
    async fn test_entry_events_create_update_and_delete() {
        let remote = FakeRemote::with_budgets(vec![remote_budget("r-1", "Flat", dec!(1200))]);
        let (app, service) = setup(remote).await;
        service.sync_budgets().await.unwrap();

        service
            .apply_event(RemoteEvent::EntryUpserted {
                entry: remote_entry("e-1", "r-1", "30"),
            })
            .await
            .unwrap();
        service
            .apply_event(RemoteEvent::EntryUpserted {
                entry: remote_entry("e-1", "r-1", "35"),
            })
            .await
            .unwrap();

        let entries = app
            .entry_source
            .subscription()
            .wait_for(|entries| entries.iter().any(|e| e.amount == "35"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);

        service
            .apply_event(RemoteEvent::EntryDeleted {
                id: "e-1".to_string(),
                budget_id: "r-1".to_string(),
            })
            .await
            .unwrap();

        app.entry_source
            .subscription()
            .wait_for(|entries| entries.is_empty())
            .await
            .unwrap();
        assert_eq!(app.store.local_id(LinkKind::Entry, "e-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_for_unknown_budget_is_rejected() {
        let remote = FakeRemote::with_budgets(Vec::new());
        let (_app, service) = setup(remote).await;

        let result = service
            .apply_event(RemoteEvent::EntryUpserted {
                entry: remote_entry("e-1", "missing", "10"),
            })
            .await;

        assert!(matches!(result, Err(Error::Sync(_))));
    }

    #[tokio::test]
    async fn test_run_applies_events_until_stream_ends() {
        let remote = FakeRemote::with_budgets(Vec::new());
        let (app, service) = setup(remote).await;
        let events: RemoteEventStream = Box::pin(tokio_stream::iter(vec![
            Ok(RemoteEvent::BudgetUpserted {
                budget: remote_budget("r-7", "Pushed", dec!(70)),
            }),
            Err(NetworkError::new("stream hiccup")),
            Ok(RemoteEvent::EntryUpserted {
                entry: remote_entry("e-7", "r-7", "7"),
            }),
        ]));

        service.run(events, std::future::pending()).await;

        let budgets = budgets_settled(&app, 1).await;
        assert_eq!(budgets[0].name, "Pushed");
        let entries = app
            .entry_source
            .subscription()
            .wait_for(|entries| entries.len() == 1)
            .await
            .unwrap();
        assert_eq!(entries[0].budget_id, budgets[0].id);
        // The successful entry event cleared the stream error.
        assert_eq!(service.state().borrow().sync_error, None);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let remote = FakeRemote::with_budgets(Vec::new());
        let (_app, service) = setup(remote).await;
        let events: RemoteEventStream = Box::pin(tokio_stream::pending());

        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            service.run(events, async {}),
        )
        .await
        .unwrap();
    }
}
