//! Budget and collaborator API operations.

use super::BudgetsyncClient;
use crate::error::Result;
use budgetsync_core::remote::{
    BudgetResponse, CollaboratorResponse, CreateBudgetRequest, UserInfo,
};
use serde::Serialize;

/// Request for inviting a collaborator.
#[derive(Debug, Serialize)]
struct AddCollaboratorRequest<'a> {
    email: &'a str,
}

/// Path of a budget's collaborator list.
fn collaborators_path(budget_id: &str) -> String {
    format!(
        "/api/budgets/{}/collaborators",
        urlencoding::encode(budget_id)
    )
}

impl BudgetsyncClient {
    /// List the budgets visible to the current user.
    pub async fn list_budgets(&self) -> Result<Vec<BudgetResponse>> {
        let response = self.client.get(self.url("/api/budgets")).send().await?;
        self.handle_response(response).await
    }

    /// Create a shared budget.
    pub async fn create_budget(&self, req: &CreateBudgetRequest) -> Result<BudgetResponse> {
        let response = self
            .client
            .post(self.url("/api/budgets"))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Invite a user to a shared budget.
    pub async fn add_collaborator(
        &self,
        budget_id: &str,
        email: &str,
    ) -> Result<CollaboratorResponse> {
        let response = self
            .client
            .post(self.url(&collaborators_path(budget_id)))
            .json(&AddCollaboratorRequest { email })
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List the users of a shared budget.
    pub async fn list_collaborators(&self, budget_id: &str) -> Result<Vec<UserInfo>> {
        let response = self
            .client
            .get(self.url(&collaborators_path(budget_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }
}
