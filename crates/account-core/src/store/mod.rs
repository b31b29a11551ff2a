// # Account Store
//
// In-memory registry of the accounts the client currently knows about,
// keyed by orgno, each paired with the presentation handle of its row.
//
// The store may be stale relative to the server between refreshes. It is
// mutated only from the task driving user interaction and carries no
// locking of its own.

pub mod account_store;

pub use account_store::{AccountEntry, AccountStore, RowHandle, StoreEvent};
