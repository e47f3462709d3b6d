//! Execution of parsed commands against the application graph.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use budgetsync_core::budget::{Budget, BudgetEntry, BudgetEntryFilter, UNSAVED_ID};
use budgetsync_core::remote::RemoteBudgetSource;
use chrono::Local;
use serde::Serialize;
use tokio_stream::StreamExt;

use crate::app::App;
use crate::error::Error;
use crate::output::{pretty, render};
use crate::sync::SyncService;

use super::budgets::BudgetsAction;
use super::collaborators::CollaboratorsAction;
use super::entries::EntriesAction;
use super::{Command, OutputFormat};

/// Everything a command needs besides its arguments.
pub struct Context<'a> {
    pub app: &'a App,
    pub remote: Arc<dyn RemoteBudgetSource>,
    pub format: OutputFormat,
    pub quiet: bool,
    /// Periodic full sync while watching, `None` disables it.
    pub sync_interval: Option<Duration>,
}

impl Context<'_> {
    fn emit<W, T>(
        &self,
        out: &mut W,
        value: &T,
        pretty: impl FnOnce(&T) -> String,
    ) -> std::io::Result<()>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        writeln!(out, "{}", render(value, self.format, pretty))
    }

    fn note<W: Write>(&self, out: &mut W, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(out, "{}", message)
    }

    async fn budget(&self, id: i64) -> anyhow::Result<Budget> {
        self.app
            .budgets
            .budget(id)
            .await
            .with_context(|| format!("Budget not found: {}", id))
    }

    async fn entry(&self, id: i64) -> anyhow::Result<BudgetEntry> {
        self.app
            .entries
            .entry(id)
            .await
            .with_context(|| format!("BudgetEntry not found: {}", id))
    }

    fn sync_service(&self) -> SyncService {
        self.app.sync_service(Arc::clone(&self.remote))
    }
}

/// Runs one command, writing its output to `out`.
///
/// Watching commands run until `shutdown` resolves.
pub async fn dispatch<W, S>(
    ctx: &Context<'_>,
    command: Command,
    out: &mut W,
    shutdown: S,
) -> anyhow::Result<()>
where
    W: Write,
    S: Future<Output = ()>,
{
    let app = ctx.app;

    match command {
        Command::Budgets(budgets_cmd) => match budgets_cmd.action {
            BudgetsAction::List => {
                let budgets = app.budgets.cached_budgets().await;
                ctx.emit(out, budgets.as_slice(), pretty::format_budgets)?;
            }
            BudgetsAction::Get { id } => {
                let budget = ctx.budget(id).await?;
                ctx.emit(out, &budget, pretty::format_budget)?;
            }
            BudgetsAction::Create { name, amount, date } => {
                let date = date.unwrap_or_else(|| Local::now().date_naive());
                let budget = app.budgets.create(Budget::new(name, amount, date)).await?;
                ctx.emit(out, &budget, |b| {
                    format!("Created:\n{}", pretty::format_budget(b))
                })?;
            }
            BudgetsAction::Update {
                id,
                name,
                amount,
                date,
            } => {
                let mut budget = ctx.budget(id).await?;
                if let Some(name) = name {
                    budget.name = name;
                }
                if let Some(amount) = amount {
                    budget.amount = amount;
                }
                if let Some(date) = date {
                    budget.date = date;
                }
                app.budgets.update(budget.clone()).await?;
                ctx.emit(out, &budget, |b| {
                    format!("Updated:\n{}", pretty::format_budget(b))
                })?;
            }
            BudgetsAction::Delete { id } => {
                let removed = app.delete_budget.execute(id).await?;
                ctx.note(
                    out,
                    &format!("Deleted budget {} and {} entries", id, removed),
                )?;
            }
        },
        Command::Entries(entries_cmd) => match entries_cmd.action {
            EntriesAction::List {
                budget_id,
                description,
                entry_type,
                start,
                end,
            } => {
                let filter = BudgetEntryFilter {
                    description,
                    entry_type: entry_type.map(Into::into),
                    start_date: start,
                    end_date: end,
                };
                let mut entries = app.entries.filtered(filter).await;
                if let Some(budget_id) = budget_id {
                    entries.retain(|entry| entry.budget_id == budget_id);
                }
                ctx.emit(out, entries.as_slice(), pretty::format_entries)?;
            }
            EntriesAction::Add {
                budget_id,
                amount,
                description,
                entry_type,
                category,
                date,
                invoice,
            } => {
                // entries may only reference existing budgets
                ctx.budget(budget_id).await?;
                let entry = BudgetEntry {
                    id: UNSAVED_ID,
                    budget_id,
                    amount,
                    description,
                    entry_type: entry_type.into(),
                    category: category.into(),
                    date: date.unwrap_or_else(|| Local::now().date_naive()),
                    invoice,
                    is_selected: false,
                };
                let created = app.entries.create(entry).await?;
                ctx.emit(out, &created, |e| {
                    format!("Created:\n{}", pretty::format_entry(e))
                })?;
            }
            EntriesAction::Update {
                id,
                amount,
                description,
                entry_type,
                category,
                date,
                invoice,
                clear_invoice,
            } => {
                let mut entry = ctx.entry(id).await?;
                if let Some(amount) = amount {
                    entry.amount = amount;
                }
                if let Some(description) = description {
                    entry.description = description;
                }
                if let Some(entry_type) = entry_type {
                    entry.entry_type = entry_type.into();
                }
                if let Some(category) = category {
                    entry.category = category.into();
                }
                if let Some(date) = date {
                    entry.date = date;
                }
                if clear_invoice {
                    entry.invoice = None;
                } else if invoice.is_some() {
                    entry.invoice = invoice;
                }
                app.entries.update(entry.clone()).await?;
                ctx.emit(out, &entry, |e| {
                    format!("Updated:\n{}", pretty::format_entry(e))
                })?;
            }
            EntriesAction::Delete { ids } => {
                let requested = ids.len();
                let removed = app.entries.delete_by_ids(ids).await?;
                ctx.note(
                    out,
                    &format!("Deleted {} of {} entries", removed, requested),
                )?;
            }
        },
        Command::Detail { budget_id, watch } => {
            ctx.budget(budget_id).await?;
            let mut details = app.details.observe(budget_id);

            if !watch {
                let detail = details
                    .next()
                    .await
                    .context("Detail stream closed before the first join")?;
                ctx.emit(out, &detail, pretty::format_detail)?;
                return Ok(());
            }

            tokio::pin!(shutdown);
            loop {
                tokio::select! {
                    _ = &mut shutdown => break,
                    next = details.next() => match next {
                        Some(detail) => {
                            ctx.emit(out, &detail, pretty::format_detail)?;
                            out.flush()?;
                        }
                        None => {
                            ctx.note(out, &format!("Budget {} is gone", budget_id))?;
                            break;
                        }
                    },
                }
            }
        }
        Command::Duplicate { budget_id } => {
            let original = ctx.budget(budget_id).await?;
            let copy = app.duplicate_budget.execute(original).await?;
            ctx.emit(out, &copy, |b| {
                format!("Duplicated:\n{}", pretty::format_budget(b))
            })?;
        }
        Command::Totals { budget_id } => {
            let totals = match budget_id {
                Some(id) => app.totals.execute_for_budget(id).await?,
                None => app.totals.execute().await?,
            };
            ctx.emit(out, totals.as_slice(), pretty::format_totals)?;
        }
        Command::Sync { watch } => {
            let sync = ctx.sync_service();
            let report = sync.sync_budgets().await?;
            ctx.emit(out, &report, pretty::format_sync_report)?;

            if watch {
                let events = ctx.remote.events().await.map_err(Error::from)?;
                ctx.note(out, "Watching remote changes, press Ctrl+C to stop")?;
                out.flush()?;

                tokio::select! {
                    _ = sync.run(events, shutdown) => {}
                    _ = periodic_sync(&sync, ctx.sync_interval) => {}
                }

                let state = sync.state().borrow().clone();
                ctx.emit(out, &state, pretty::format_sync_state)?;
            }
        }
        Command::Share { budget_id } => {
            let remote_id = ctx.sync_service().share_budget(budget_id).await?;
            let shared = serde_json::json!({
                "budget_id": budget_id,
                "remote_id": &remote_id,
            });
            ctx.emit(out, &shared, |_| {
                format!("Shared budget {} as {}", budget_id, remote_id)
            })?;
        }
        Command::Collaborators(collaborators_cmd) => match collaborators_cmd.action {
            CollaboratorsAction::List { budget_id } => {
                let users = ctx.sync_service().collaborators(budget_id).await?;
                ctx.emit(out, users.as_slice(), pretty::format_users)?;
            }
            CollaboratorsAction::Add { budget_id, email } => {
                let added = ctx
                    .sync_service()
                    .add_collaborator(budget_id, &email)
                    .await?;
                ctx.emit(out, &added, pretty::format_collaborator)?;
            }
        },
    }

    Ok(())
}

/// Repeats a full budget sync every `interval`. Never completes.
async fn periodic_sync(sync: &SyncService, interval: Option<Duration>) {
    let Some(period) = interval else {
        return std::future::pending().await;
    };

    let mut ticker = tokio::time::interval(period);
    // the first tick completes immediately and the initial sync already ran
    ticker.tick().await;
    loop {
        ticker.tick().await;
        // failures are recorded in the sync state
        let _ = sync.sync_budgets().await;
    }
}
