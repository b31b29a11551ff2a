//! Account model
//!
//! The typed account record, the response envelope of the account service,
//! and the raw-text form a user fills in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::validate;

pub const FIELD_NAME: &str = "name";
pub const FIELD_ORGNO: &str = "orgno";
pub const FIELD_LEADER_TITLE: &str = "leader_title";
pub const FIELD_LEADER_NAME: &str = "leader_name";
pub const FIELD_TYPE: &str = "type";

/// Required account fields, in validation order
pub const ACCOUNT_FIELDS: &[&str] = &[
    FIELD_NAME,
    FIELD_ORGNO,
    FIELD_LEADER_TITLE,
    FIELD_LEADER_NAME,
    FIELD_TYPE,
];

/// An organisation account
///
/// `orgno` is the unique key. Accounts are replaced whole, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub orgno: i64,
    pub leader_title: String,
    pub leader_name: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

impl Account {
    /// Parse and validate an untyped record
    ///
    /// This is the only way records coming from the network or a form
    /// become accounts.
    pub fn from_record(record: &Value) -> Result<Self> {
        validate::check(record)?;
        Ok(serde_json::from_value(record.clone())?)
    }

    /// Untyped representation sent over the wire
    pub fn to_record(&self) -> Value {
        serde_json::json!({
            FIELD_NAME: self.name,
            FIELD_ORGNO: self.orgno,
            FIELD_LEADER_TITLE: self.leader_title,
            FIELD_LEADER_NAME: self.leader_name,
            FIELD_TYPE: self.account_type,
        })
    }
}

/// Uniform response wrapper of the account service
///
/// `result=false` is a server-side rejection, not a transport failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub result: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            result: true,
            message: message.into(),
            data,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            result: false,
            message: message.into(),
            data: None,
        }
    }

    /// Turn a rejection into [`Error::Rejected`], keeping accepted envelopes
    pub fn accepted(self) -> Result<Self> {
        if self.result {
            Ok(self)
        } else {
            Err(Error::rejected(self.message))
        }
    }

    /// The payload as a sequence of records
    ///
    /// A missing payload is an empty list; anything other than an array is
    /// a malformed response.
    pub fn records(&self) -> Result<Vec<Value>> {
        match &self.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(other) => Err(Error::malformed(format!(
                "Expected a list of accounts, got: {}",
                other
            ))),
        }
    }

    /// The payload as a single validated account
    pub fn account(&self) -> Result<Account> {
        match &self.data {
            Some(record) => Account::from_record(record),
            None => Err(Error::malformed("Response carries no account")),
        }
    }
}

/// Account fields as typed into a form, all raw text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountForm {
    pub name: String,
    pub orgno: String,
    pub leader_title: String,
    pub leader_name: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

impl AccountForm {
    /// Pre-fill a form for editing an existing account
    pub fn from_account(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            orgno: account.orgno.to_string(),
            leader_title: account.leader_title.clone(),
            leader_name: account.leader_name.clone(),
            account_type: account.account_type.clone(),
        }
    }

    /// Build the untyped record submitted by the form
    ///
    /// Only `orgno` needs conversion; a non-integer is reported against it.
    pub fn to_record(&self) -> Result<Value> {
        let orgno: i64 = self.orgno.trim().parse().map_err(|_| {
            Error::invalid_field(FIELD_ORGNO, format!("Invalid orgno passed: {}", self.orgno))
        })?;

        Ok(serde_json::json!({
            FIELD_NAME: self.name,
            FIELD_ORGNO: orgno,
            FIELD_LEADER_TITLE: self.leader_title,
            FIELD_LEADER_NAME: self.leader_name,
            FIELD_TYPE: self.account_type,
        }))
    }
}

/// Read untyped account records from a JSON file
///
/// The file holds either one account object or an array of them. Records
/// are returned as-is; validation happens when they are submitted.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        other => Err(Error::invalid(format!(
            "{}: expected an account object or a list of accounts, got {}",
            path.display(),
            other
        ))),
    }
}
