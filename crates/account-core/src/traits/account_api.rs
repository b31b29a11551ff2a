// # Account API Trait
//
// Defines the interface to the remote account service.
//
// ## Implementations
//
// - HTTP: `account-http` crate
// - Test doubles in `tests/common`
//
// ## Remote contract
//
// | Method            | Call                                     |
// |-------------------|------------------------------------------|
// | `test_connection` | GET    /api/v1/test                      |
// | `fetch_one`       | GET    /api/v1/account/{orgno}           |
// | `fetch_many`      | GET    /api/v1/accounts/{count or 0}     |
// | `create`          | POST   /api/v1/accounts/add              |
// | `update`          | PUT    /api/v1/accounts/edit/{orgno}     |
// | `delete`          | DELETE /api/v1/accounts/delete/{orgno}   |

use async_trait::async_trait;

use crate::account::{Account, Envelope};

/// The remote account service
///
/// Implementations are stateless proxies: one request per call, no retries,
/// no caching. A well-formed envelope is returned as `Ok` even when
/// `result=false`; deciding what a rejection means is left to the caller.
///
/// # Errors
///
/// - [`Error::Connection`](crate::Error::Connection): host unreachable or refused
/// - [`Error::MalformedResponse`](crate::Error::MalformedResponse): body is not an envelope
/// - [`Error::Http`](crate::Error::Http): any other transport failure
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Check the server answers; returns the raw text body
    async fn test_connection(&self) -> Result<String, crate::Error>;

    /// Fetch a single account
    async fn fetch_one(&self, orgno: i64) -> Result<Envelope, crate::Error>;

    /// Fetch the first `count` accounts in name order, or all with `None`
    async fn fetch_many(&self, count: Option<usize>) -> Result<Envelope, crate::Error>;

    /// Create an account
    async fn create(&self, account: &Account) -> Result<Envelope, crate::Error>;

    /// Replace an account, addressed by its own `orgno`
    async fn update(&self, account: &Account) -> Result<Envelope, crate::Error>;

    /// Delete an account
    async fn delete(&self, orgno: i64) -> Result<Envelope, crate::Error>;

    /// Where this client points, for user-facing messages
    fn endpoint(&self) -> String;
}
