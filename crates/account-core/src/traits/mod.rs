//! Core traits for the account client
//!
//! - [`AccountApi`]: The remote account service, one method per REST call

pub mod account_api;

pub use account_api::AccountApi;
