// # account-core
//
// Core library for the account management client.
//
// ## Architecture Overview
//
// This library holds the synchronization and validation core of the client:
// - **validate**: Shape check for untyped account records
// - **AccountApi**: Trait for the remote account REST service
// - **AccountStore**: orgno-keyed registry that reconciles fresh lists
//   without losing row identity
// - **SyncController**: Runs user operations against the service and the
//   store, ending each in a `Disposition`
//
// ## Design Principles
//
// 1. **Validate at every boundary**: Form input and network payloads become
//    `Account` values only through `Account::from_record`
// 2. **Server first**: The store changes only after the server accepted
// 3. **No silent deletes**: A refresh never removes a local account
// 4. **No retries**: Failures are reported, the user decides what to do

pub mod account;
pub mod config;
pub mod error;
pub mod store;
pub mod sync;
pub mod traits;
pub mod validate;

// Re-export core types for convenience
pub use account::{Account, AccountForm, Envelope, load_records};
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use store::{AccountEntry, AccountStore, RowHandle, StoreEvent};
pub use sync::{Disposition, OperationState, SyncController};
pub use traits::AccountApi;
pub use validate::validate;
