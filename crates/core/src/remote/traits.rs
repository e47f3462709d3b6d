use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use super::{
    BudgetResponse, CollaboratorResponse, CreateBudgetRequest, RemoteEvent, Result, UserInfo,
};

/// Stream of pushed changes from the backend.
pub type RemoteEventStream = Pin<Box<dyn Stream<Item = Result<RemoteEvent>> + Send>>;

/// Collaboration backend. Every call reports failure as a value.
#[async_trait]
pub trait RemoteBudgetSource: Send + Sync {
    /// Creates a shared budget.
    async fn create_budget(&self, request: CreateBudgetRequest) -> Result<BudgetResponse>;

    /// Lists the budgets visible to the current user.
    async fn get_budgets(&self) -> Result<Vec<BudgetResponse>>;

    /// Invites a user to a shared budget.
    async fn add_collaborator(&self, budget_id: &str, email: &str)
        -> Result<CollaboratorResponse>;

    /// Lists the users of a shared budget.
    async fn get_collaborators(&self, budget_id: &str) -> Result<Vec<UserInfo>>;

    /// Opens the persistent event connection.
    async fn events(&self) -> Result<RemoteEventStream>;
}
