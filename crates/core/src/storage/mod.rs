mod error;
mod traits;
mod types;

pub use error::{Result, StorageError};
pub use traits::{BudgetStore, ChangeFeed, EntryStore, LocalStore, RemoteLinkStore};
pub use types::{LinkKind, Table, TableChange};
