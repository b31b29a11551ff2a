//! Account record validation
//!
//! A record is an untyped JSON mapping. It is valid iff all five account
//! fields are present, `orgno` is an integer and the other four are strings.
//! Fields are checked in [`ACCOUNT_FIELDS`] order and the first failure wins.
//!
//! `orgno` must fit in an `i64`, since that is what [`Account`] holds; larger
//! JSON integers are treated as not an int.
//!
//! [`Account`]: crate::account::Account

use serde_json::Value;
use tracing::error;

use crate::account::{ACCOUNT_FIELDS, FIELD_ORGNO};
use crate::error::{Error, Result};

/// Check a record's shape, returning the first offending field
pub fn check(record: &Value) -> Result<()> {
    let map = record
        .as_object()
        .ok_or_else(|| Error::invalid("Account record is not an object"))?;

    for field in ACCOUNT_FIELDS {
        let value = map
            .get(*field)
            .ok_or_else(|| Error::invalid_field(*field, format!("Field {} not in account", field)))?;

        if *field == FIELD_ORGNO {
            if value.as_i64().is_none() {
                return Err(Error::invalid_field(*field, format!("Field {} is not an int", field)));
            }
        } else if !value.is_string() {
            return Err(Error::invalid_field(*field, format!("Field {} is not a str", field)));
        }
    }

    Ok(())
}

/// Whether a record has the exact account shape
///
/// Failures are logged with the offending field.
pub fn validate(record: &Value) -> bool {
    match check(record) {
        Ok(()) => true,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}
