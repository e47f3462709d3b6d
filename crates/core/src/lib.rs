//! Functional core of budgetsync.
//!
//! Domain types, validation and aggregation live here as pure functions,
//! next to the traits the imperative shell implements: the persistent
//! store ([`storage`]) and the collaboration backend ([`remote`]).

pub mod budget;
pub mod remote;
pub mod storage;
