mod error;
mod traits;
mod types;

pub use error::{NetworkError, Result};
pub use traits::{RemoteBudgetSource, RemoteEventStream};
pub use types::{
    BudgetResponse, CollaboratorResponse, CreateBudgetRequest, RemoteEntry, RemoteEvent, UserInfo,
};
