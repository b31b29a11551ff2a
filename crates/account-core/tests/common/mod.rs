//! Test doubles and common utilities for sync contract tests
//!
//! This module provides a scripted AccountApi that records calls instead of
//! talking to a server.

#![allow(dead_code)]

use account_core::error::{Error, Result};
use account_core::{Account, AccountApi, Envelope};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted reply to a single call
pub enum Reply {
    Envelope(Envelope),
    Refused,
    Garbage,
}

impl Reply {
    fn into_result(self) -> Result<Envelope> {
        match self {
            Reply::Envelope(envelope) => Ok(envelope),
            Reply::Refused => Err(Error::connection("connection refused")),
            Reply::Garbage => Err(Error::malformed("expected value at line 1 column 1")),
        }
    }
}

/// A mock AccountApi that replays queued replies and counts calls
///
/// Calls with no queued reply answer `{result: true}` with no data, or a
/// refused connection when the mock is unreachable.
pub struct MockAccountApi {
    replies: Arc<std::sync::Mutex<VecDeque<Reply>>>,
    /// Call counter across all methods
    call_count: Arc<AtomicUsize>,
    /// Recorded calls, e.g. "create 510"
    calls: Arc<std::sync::Mutex<Vec<String>>>,
    unreachable: bool,
}

impl MockAccountApi {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(std::sync::Mutex::new(VecDeque::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(std::sync::Mutex::new(Vec::new())),
            unreachable: false,
        }
    }

    /// A mock for which every call fails to connect
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    /// Queue the reply for the next call
    pub fn push(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_ok(&self, message: &str, data: Option<Value>) -> &Self {
        self.push(Reply::Envelope(Envelope::ok(message, data)))
    }

    pub fn push_rejected(&self, message: &str) -> &Self {
        self.push(Reply::Envelope(Envelope::rejected(message)))
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the recorded calls
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Create a new MockAccountApi that shares its script and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            replies: Arc::clone(&other.replies),
            call_count: Arc::clone(&other.call_count),
            calls: Arc::clone(&other.calls),
            unreachable: other.unreachable,
        }
    }

    fn answer(&self, call: String) -> Result<Envelope> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(call);

        if self.unreachable {
            return Err(Error::connection("connection refused"));
        }

        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply.into_result(),
            None => Ok(Envelope::ok("", None)),
        }
    }
}

#[async_trait::async_trait]
impl AccountApi for MockAccountApi {
    async fn test_connection(&self) -> Result<String> {
        self.answer("test".to_string())
            .map(|envelope| envelope.message)
    }

    async fn fetch_one(&self, orgno: i64) -> Result<Envelope> {
        self.answer(format!("fetch_one {}", orgno))
    }

    async fn fetch_many(&self, count: Option<usize>) -> Result<Envelope> {
        self.answer(format!("fetch_many {}", count.unwrap_or(0)))
    }

    async fn create(&self, account: &Account) -> Result<Envelope> {
        self.answer(format!("create {}", account.orgno))
    }

    async fn update(&self, account: &Account) -> Result<Envelope> {
        self.answer(format!("update {}", account.orgno))
    }

    async fn delete(&self, orgno: i64) -> Result<Envelope> {
        self.answer(format!("delete {}", orgno))
    }

    fn endpoint(&self) -> String {
        "127.0.0.1:8080".to_string()
    }
}

/// Helper to build a valid untyped account record
pub fn record(name: &str, orgno: i64) -> Value {
    json!({
        "name": name,
        "orgno": orgno,
        "leader_title": "Manager",
        "leader_name": "Somename",
        "type": "Technology",
    })
}
