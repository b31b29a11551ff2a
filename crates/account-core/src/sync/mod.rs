//! Sync controller
//!
//! The SyncController is responsible for:
//! - Populating the store from the server
//! - Refreshing it on demand through reconciliation
//! - Pushing single-record creates, edits and deletes
//! - Classifying every outcome into a [`Disposition`]
//!
//! ## Architecture
//!
//! ```text
//!  presentation ──► SyncController ──► AccountApi ──► account service
//!       ▲                 │
//!       │                 ▼
//!       └──────── AccountStore (StoreEvents)
//! ```
//!
//! ## Operation Flow
//!
//! 1. Local records are validated; failures stop before any network call
//! 2. One request goes out; a rejection or transport error ends the operation
//! 3. Only after the server accepted does the store change
//! 4. The outcome is returned as a disposition plus view update events
//!
//! Nothing is retried. Operations run one at a time through `&mut self`.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::account::Account;
use crate::error::{Error, ErrorKind, Result};
use crate::store::{AccountStore, StoreEvent};
use crate::traits::AccountApi;

/// Outcome of a user-facing operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Server accepted; the store was updated and the events say how
    Success {
        message: String,
        events: Vec<StoreEvent>,
    },

    /// Refused by the server or by local validation; store untouched
    Rejected { message: String },

    /// Server unreachable; store untouched
    ConnectionFailure { message: String },

    /// Anything else; details are in the log
    Unknown { message: String },
}

impl Disposition {
    pub fn is_success(&self) -> bool {
        matches!(self, Disposition::Success { .. })
    }

    /// Text to show the user
    pub fn message(&self) -> &str {
        match self {
            Disposition::Success { message, .. }
            | Disposition::Rejected { message }
            | Disposition::ConnectionFailure { message }
            | Disposition::Unknown { message } => message,
        }
    }

    /// View update events, empty unless successful
    pub fn events(&self) -> &[StoreEvent] {
        match self {
            Disposition::Success { events, .. } => events,
            _ => &[],
        }
    }
}

/// Lifecycle of the most recent operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Rejected,
    Failed,
}

/// Orchestrates the account store against the account service
pub struct SyncController {
    /// Remote account service
    client: Box<dyn AccountApi>,

    /// Local view of the accounts
    store: AccountStore,

    /// State of the last operation
    state: OperationState,
}

impl SyncController {
    /// Create a controller with an empty store
    pub fn new(client: Box<dyn AccountApi>) -> Self {
        Self {
            client,
            store: AccountStore::new(),
            state: OperationState::Idle,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn last_state(&self) -> OperationState {
        self.state
    }

    /// Ask the server for its test endpoint; success carries the raw body
    pub async fn check_connection(&mut self) -> Disposition {
        self.state = OperationState::InFlight;
        let result = self
            .client
            .test_connection()
            .await
            .map(|body| (body, Vec::new()));
        self.conclude("test connection", result)
    }

    /// Populate the store with every account the server holds
    ///
    /// Records are added one by one; a bad record is logged and skipped.
    pub async fn initial_load(&mut self) -> Disposition {
        self.state = OperationState::InFlight;
        info!("Populating accounts");
        let result = self.load_all().await;
        self.conclude("initial load", result)
    }

    /// Fetch every account and reconcile it into the store
    pub async fn refresh(&mut self) -> Disposition {
        self.state = OperationState::InFlight;
        info!("Updating accounts");
        let result = self.fetch_and_reconcile(None).await;
        self.conclude("refresh", result)
    }

    /// Fetch the first `count` accounts and reconcile them into the store
    pub async fn refresh_limited(&mut self, count: usize) -> Disposition {
        self.state = OperationState::InFlight;
        info!("Updating first {} account(s)", count);
        let result = self.fetch_and_reconcile(Some(count)).await;
        self.conclude("refresh", result)
    }

    /// Create an account from a submitted form record
    pub async fn submit_create(&mut self, record: &Value) -> Disposition {
        self.state = OperationState::InFlight;
        let result = self.create(record).await;
        self.conclude("create", result)
    }

    /// Replace account `orgno` with a submitted form record
    ///
    /// After the write the account is fetched back and the server's copy,
    /// not the submitted one, goes into the store.
    pub async fn submit_edit(&mut self, orgno: i64, record: &Value) -> Disposition {
        self.state = OperationState::InFlight;
        let result = self.edit(orgno, record).await;
        self.conclude("edit", result)
    }

    /// Delete account `orgno` on the server, then locally
    pub async fn submit_delete(&mut self, orgno: i64) -> Disposition {
        self.state = OperationState::InFlight;
        let result = self.delete(orgno).await;
        self.conclude("delete", result)
    }

    async fn load_all(&mut self) -> Result<(String, Vec<StoreEvent>)> {
        let envelope = self.client.fetch_many(None).await?.accepted()?;
        let records = envelope.records()?;

        let events = self
            .store
            .add_accounts(&records)
            .into_iter()
            .filter_map(|outcome| outcome.ok())
            .collect();

        Ok((envelope.message, events))
    }

    async fn fetch_and_reconcile(&mut self, count: Option<usize>) -> Result<(String, Vec<StoreEvent>)> {
        let envelope = self.client.fetch_many(count).await?.accepted()?;
        let records = envelope.records()?;
        let events = self.store.reconcile(&records);
        Ok((envelope.message, events))
    }

    async fn create(&mut self, record: &Value) -> Result<(String, Vec<StoreEvent>)> {
        let account = Account::from_record(record)?;
        info!("Adding account: {}", account.orgno);

        let envelope = self.client.create(&account).await?.accepted()?;

        let events = match self.fetch_and_reconcile(None).await {
            Ok((_, events)) => events,
            Err(e) => {
                warn!(
                    "Account {} created but refresh failed, keeping submitted copy: {}",
                    account.orgno, e
                );
                self.upsert(account)?
            }
        };

        Ok((envelope.message, events))
    }

    async fn edit(&mut self, orgno: i64, record: &Value) -> Result<(String, Vec<StoreEvent>)> {
        let account = Account::from_record(record)?;
        if account.orgno != orgno {
            return Err(Error::invalid_field(
                crate::account::FIELD_ORGNO,
                format!("Cannot change orgno {} to {}", orgno, account.orgno),
            ));
        }
        info!("Editing account: {}", orgno);

        let envelope = self.client.update(&account).await?.accepted()?;

        // The write already landed; a refused refetch is not a rejected edit
        let fresh = self
            .client
            .fetch_one(orgno)
            .await?
            .accepted()
            .map_err(|e| Error::malformed(format!("Account {} edited but refetch failed: {}", orgno, e)))?
            .account()?;
        if fresh.orgno != orgno {
            return Err(Error::malformed(format!(
                "Asked for account {}, server returned {}",
                orgno, fresh.orgno
            )));
        }

        Ok((envelope.message, self.upsert(fresh)?))
    }

    async fn delete(&mut self, orgno: i64) -> Result<(String, Vec<StoreEvent>)> {
        info!("Deleting account: {}", orgno);
        let envelope = self.client.delete(orgno).await?.accepted()?;

        let events = match self.store.remove_account(orgno) {
            Some(event) => vec![event],
            None => {
                debug!("Deleted account {} was not held locally", orgno);
                Vec::new()
            }
        };

        Ok((envelope.message, events))
    }

    /// Update if held, insert otherwise
    fn upsert(&mut self, account: Account) -> Result<Vec<StoreEvent>> {
        let event = if self.store.contains(account.orgno) {
            self.store.update_account(account.orgno, account)?
        } else {
            self.store.insert_account(account)?
        };
        Ok(vec![event])
    }

    /// Map an operation result to its disposition and record the final state
    fn conclude(&mut self, operation: &str, result: Result<(String, Vec<StoreEvent>)>) -> Disposition {
        let (state, disposition) = match result {
            Ok((message, events)) => {
                info!("{} succeeded ({} view update(s))", operation, events.len());
                (
                    OperationState::Succeeded,
                    Disposition::Success { message, events },
                )
            }
            Err(e) => match e.kind() {
                ErrorKind::Validation => {
                    warn!("{} refused locally: {}", operation, e);
                    let message = match &e {
                        Error::Validation { message, .. } => message.clone(),
                        _ => e.to_string(),
                    };
                    (OperationState::Rejected, Disposition::Rejected { message })
                }
                ErrorKind::Rejected => {
                    warn!("{} rejected by server: {}", operation, e);
                    let message = match e {
                        Error::Rejected(message) => message,
                        other => other.to_string(),
                    };
                    (OperationState::Rejected, Disposition::Rejected { message })
                }
                ErrorKind::Connection => {
                    warn!("{} failed: {}", operation, e);
                    (
                        OperationState::Failed,
                        Disposition::ConnectionFailure {
                            message: format!("Could not connect to server {}", self.client.endpoint()),
                        },
                    )
                }
                ErrorKind::Unknown => {
                    error!("Unknown error during {}: {}", operation, e);
                    (
                        OperationState::Failed,
                        Disposition::Unknown {
                            message: "Unknown error".to_string(),
                        },
                    )
                }
            },
        };

        self.state = state;
        disposition
    }
}
