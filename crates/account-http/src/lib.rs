// # HTTP Account Client
//
// This crate provides the HTTP implementation of `AccountApi` for the
// account REST service.
//
// ## Behavior
//
// - One HTTP request per call, no retry, no caching
// - Refused or unreachable hosts become `Error::Connection`
// - Any body that parses as an envelope is returned as-is, whatever the
//   status code; `result=false` is for the caller to interpret
// - Bodies that are not envelopes become `Error::MalformedResponse`
// - No timeout beyond reqwest's defaults
//
// ## API Reference
//
// - Test:   GET    `/api/v1/test`
// - Fetch:  GET    `/api/v1/account/:orgno`
// - List:   GET    `/api/v1/accounts/:count` (0 = all, ordered by name)
// - Add:    POST   `/api/v1/accounts/add`
// - Edit:   PUT    `/api/v1/accounts/edit/:orgno`
// - Delete: DELETE `/api/v1/accounts/delete/:orgno`

use account_core::config::ClientConfig;
use account_core::{Account, AccountApi, Envelope, Error, Result};
use async_trait::async_trait;

const PATH_TEST: &str = "/api/v1/test";
const PATH_ACCOUNT: &str = "/api/v1/account";
const PATH_ACCOUNTS: &str = "/api/v1/accounts";
const PATH_ADD: &str = "/api/v1/accounts/add";
const PATH_EDIT: &str = "/api/v1/accounts/edit";
const PATH_DELETE: &str = "/api/v1/accounts/delete";

/// Longest body excerpt quoted in malformed-response errors
const BODY_EXCERPT_LEN: usize = 200;

/// HTTP client for the account service
///
/// Constructed once from a validated [`ClientConfig`]; holds no other state.
#[derive(Debug, Clone)]
pub struct HttpAccountClient {
    /// `http://host:port`
    base_url: String,

    /// `host:port`, for user-facing messages
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl HttpAccountClient {
    /// Create a client for the configured server
    ///
    /// Fails before any network activity if the host is not an IP address
    /// or the port is outside 1..=65535.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        // The host is always an IP literal on the local network
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(config, client)
    }

    /// Create a client around a preconfigured reqwest client
    pub fn with_client(config: &ClientConfig, client: reqwest::Client) -> Result<Self> {
        let base_url = config.base_url()?;
        let endpoint = base_url.trim_start_matches("http://").to_string();

        Ok(Self {
            base_url,
            endpoint,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and read the whole body
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(reqwest::StatusCode, String)> {
        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        tracing::debug!("Response: {} ({} bytes)", status, body.len());
        Ok((status, body))
    }

    async fn envelope(&self, request: reqwest::RequestBuilder) -> Result<Envelope> {
        let (status, body) = self.send(request).await?;
        decode_envelope(status.as_u16(), &body)
    }
}

#[async_trait]
impl AccountApi for HttpAccountClient {
    async fn test_connection(&self) -> Result<String> {
        let (status, body) = self.send(self.client.get(self.url(PATH_TEST))).await?;

        if !status.is_success() {
            return Err(Error::http(format!("Connection test failed: {} - {}", status, excerpt(&body))));
        }
        Ok(body)
    }

    async fn fetch_one(&self, orgno: i64) -> Result<Envelope> {
        tracing::debug!("Fetching account {}", orgno);
        let url = self.url(&format!("{}/{}", PATH_ACCOUNT, orgno));
        self.envelope(self.client.get(url)).await
    }

    async fn fetch_many(&self, count: Option<usize>) -> Result<Envelope> {
        let count = count.unwrap_or(0);
        tracing::debug!("Fetching accounts (count: {})", count);
        let url = self.url(&format!("{}/{}", PATH_ACCOUNTS, count));
        self.envelope(self.client.get(url)).await
    }

    async fn create(&self, account: &Account) -> Result<Envelope> {
        tracing::debug!("Creating account {}", account.orgno);
        let request = self.client.post(self.url(PATH_ADD)).json(account);
        self.envelope(request).await
    }

    async fn update(&self, account: &Account) -> Result<Envelope> {
        tracing::debug!("Updating account {}", account.orgno);
        let url = self.url(&format!("{}/{}", PATH_EDIT, account.orgno));
        self.envelope(self.client.put(url).json(account)).await
    }

    async fn delete(&self, orgno: i64) -> Result<Envelope> {
        tracing::debug!("Deleting account {}", orgno);
        let url = self.url(&format!("{}/{}", PATH_DELETE, orgno));
        self.envelope(self.client.delete(url)).await
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}

/// Parse a response body as an envelope
///
/// The status code only shows up in the error; a server answering 404 with
/// `{"result": false, ...}` is a rejection, not a malformed response.
pub fn decode_envelope(status: u16, body: &str) -> Result<Envelope> {
    serde_json::from_str::<Envelope>(body).map_err(|e| {
        Error::malformed(format!(
            "Status {}: {} (body: {:?})",
            status,
            e,
            excerpt(body)
        ))
    })
}

/// Map a reqwest send error onto the error taxonomy
fn classify(err: reqwest::Error) -> Error {
    if err.is_connect() {
        Error::connection(format!("HTTP request failed: {}", err))
    } else if err.is_timeout() {
        Error::http(format!("HTTP request timed out: {}", err))
    } else {
        Error::http(format!("HTTP request failed: {}", err))
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
