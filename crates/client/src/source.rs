//! [`RemoteBudgetSource`] backed by the HTTP client.

use async_trait::async_trait;
use budgetsync_core::remote::{
    BudgetResponse, CollaboratorResponse, CreateBudgetRequest, NetworkError, RemoteBudgetSource,
    RemoteEventStream, Result, UserInfo,
};
use tokio_stream::StreamExt;

use crate::client::BudgetsyncClient;

#[async_trait]
impl RemoteBudgetSource for BudgetsyncClient {
    async fn create_budget(&self, request: CreateBudgetRequest) -> Result<BudgetResponse> {
        Ok(BudgetsyncClient::create_budget(self, &request).await?)
    }

    async fn get_budgets(&self) -> Result<Vec<BudgetResponse>> {
        Ok(self.list_budgets().await?)
    }

    async fn add_collaborator(
        &self,
        budget_id: &str,
        email: &str,
    ) -> Result<CollaboratorResponse> {
        Ok(BudgetsyncClient::add_collaborator(self, budget_id, email).await?)
    }

    async fn get_collaborators(&self, budget_id: &str) -> Result<Vec<UserInfo>> {
        Ok(self.list_collaborators(budget_id).await?)
    }

    async fn events(&self) -> Result<RemoteEventStream> {
        let stream = self.watch_events().await?;
        Ok(Box::pin(stream.map(|item| item.map_err(NetworkError::from))))
    }
}
