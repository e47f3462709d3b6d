//! Collaborator CLI commands.

use clap::{Parser, Subcommand};

/// Collaborator management commands.
#[derive(Debug, Parser)]
pub struct CollaboratorsCommand {
    #[command(subcommand)]
    pub action: CollaboratorsAction,
}

/// Available collaborator actions.
#[derive(Debug, Subcommand)]
pub enum CollaboratorsAction {
    /// List the users of a shared budget.
    List {
        /// Local budget ID.
        budget_id: i64,
    },
    /// Invite a user to a shared budget.
    Add {
        /// Local budget ID.
        budget_id: i64,
        /// Email of the invited user.
        #[arg(long)]
        email: String,
    },
}
