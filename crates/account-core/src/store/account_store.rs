// # Reconciling Account Store
//
// ## Reconciliation
//
// After every list fetch the fresh records are merged into the store:
//
// 1. Invalid records are dropped with a warning
// 2. Known orgnos are updated in place, keeping their row handle
// 3. Unknown orgnos are inserted with a new row handle
// 4. Local accounts missing from the fresh list are left alone
//
// Only an explicit delete removes an account. A refresh that omits an
// account is not evidence that it was deleted.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, warn};

use crate::account::Account;
use crate::error::{Error, Result};

/// Identity of an account's row in the presentation layer
///
/// Allocated on insert and kept for as long as the account stays in the
/// store; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(u64);

impl RowHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// An account held by the store
#[derive(Debug, Clone, PartialEq)]
pub struct AccountEntry {
    /// Current account value
    pub account: Account,
    /// Row handle, stable across updates
    pub handle: RowHandle,
    /// When the value was last written
    pub last_synced: DateTime<Utc>,
}

/// View update instructions for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Render a new row
    Inserted { handle: RowHandle, account: Account },

    /// Refresh an existing row
    Updated { handle: RowHandle, account: Account },

    /// Drop a row
    Removed { handle: RowHandle, orgno: i64 },
}

impl StoreEvent {
    pub fn handle(&self) -> RowHandle {
        match self {
            StoreEvent::Inserted { handle, .. }
            | StoreEvent::Updated { handle, .. }
            | StoreEvent::Removed { handle, .. } => *handle,
        }
    }
}

/// In-memory account registry keyed by orgno
///
/// # Example
///
/// ```rust
/// use account_core::AccountStore;
/// use serde_json::json;
///
/// let mut store = AccountStore::new();
/// let events = store.reconcile(&[json!({
///     "name": "AAA",
///     "orgno": 510,
///     "leader_title": "Manager",
///     "leader_name": "Somename",
///     "type": "Technology",
/// })]);
///
/// assert_eq!(events.len(), 1);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AccountStore {
    entries: HashMap<i64, AccountEntry>,
    next_handle: u64,
}

impl AccountStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, orgno: i64) -> bool {
        self.entries.contains_key(&orgno)
    }

    pub fn get(&self, orgno: i64) -> Option<&AccountEntry> {
        self.entries.get(&orgno)
    }

    /// All entries in row order
    pub fn accounts(&self) -> Vec<&AccountEntry> {
        let mut entries: Vec<&AccountEntry> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.handle);
        entries
    }

    /// Validate an untyped record and insert it
    ///
    /// Insert-only: an orgno already held is refused and the store is left
    /// untouched.
    pub fn add_account(&mut self, record: &Value) -> Result<StoreEvent> {
        let account = Account::from_record(record).inspect_err(|e| {
            error!("Invalid account {}: {}", record, e);
        })?;
        self.insert_account(account)
    }

    /// Insert an already validated account
    pub fn insert_account(&mut self, account: Account) -> Result<StoreEvent> {
        if self.entries.contains_key(&account.orgno) {
            warn!("Account {} already present, not adding", account.orgno);
            return Err(Error::Duplicate(account.orgno));
        }

        let handle = RowHandle(self.next_handle);
        self.next_handle += 1;

        debug!("Adding account: {}", account.orgno);
        self.entries.insert(
            account.orgno,
            AccountEntry {
                account: account.clone(),
                handle,
                last_synced: Utc::now(),
            },
        );

        Ok(StoreEvent::Inserted { handle, account })
    }

    /// Add each record independently
    ///
    /// One bad record does not abort the batch; every record gets its own
    /// outcome, in input order.
    pub fn add_accounts(&mut self, records: &[Value]) -> Vec<Result<StoreEvent>> {
        records.iter().map(|record| self.add_account(record)).collect()
    }

    /// Replace a held account, keeping its row handle
    ///
    /// Returns [`Error::NotFound`] when `orgno` is not held; the caller
    /// decides whether to insert instead.
    pub fn update_account(&mut self, orgno: i64, account: Account) -> Result<StoreEvent> {
        if account.orgno != orgno {
            return Err(Error::invalid_field(
                crate::account::FIELD_ORGNO,
                format!("orgno {} does not match account {}", account.orgno, orgno),
            ));
        }

        let entry = self
            .entries
            .get_mut(&orgno)
            .ok_or_else(|| Error::not_found(orgno.to_string()))?;

        debug!("Updating account: {}", orgno);
        entry.account = account.clone();
        entry.last_synced = Utc::now();

        Ok(StoreEvent::Updated {
            handle: entry.handle,
            account,
        })
    }

    /// Drop an account after it was deleted on the server
    pub fn remove_account(&mut self, orgno: i64) -> Option<StoreEvent> {
        self.entries.remove(&orgno).map(|entry| {
            debug!("Removing account: {}", orgno);
            StoreEvent::Removed {
                handle: entry.handle,
                orgno,
            }
        })
    }

    /// Merge a freshly fetched list into the store
    ///
    /// Returns the insert/update events to replay, in input order. Accounts
    /// absent from `records` are never removed.
    pub fn reconcile(&mut self, records: &[Value]) -> Vec<StoreEvent> {
        let mut events = Vec::with_capacity(records.len());

        for record in records {
            let account = match Account::from_record(record) {
                Ok(account) => account,
                Err(e) => {
                    warn!("Could not update account {}: {}", record, e);
                    continue;
                }
            };

            let orgno = account.orgno;
            let outcome = if self.contains(orgno) {
                self.update_account(orgno, account)
            } else {
                self.insert_account(account)
            };

            match outcome {
                Ok(event) => events.push(event),
                Err(e) => warn!("Could not reconcile account {}: {}", orgno, e),
            }
        }

        debug!(
            "Reconciled {} record(s) into {} event(s), store holds {}",
            records.len(),
            events.len(),
            self.len()
        );
        events
    }
}
