//! Configuration types for the account client
//!
//! The only configuration the core needs is where the account service lives.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Default server address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u32 = 8080;

/// Location of the account REST service
///
/// `port` is kept wider than `u16` so out-of-range values coming from
/// configuration are reported instead of silently truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server IP address (IPv4 or IPv6, no hostnames)
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port, 1..=65535
    #[serde(default = "default_port")]
    pub port: u32,
}

impl ClientConfig {
    /// Create a new configuration
    pub fn new(host: impl Into<String>, port: u32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.ip()?;
        self.port_u16()?;
        Ok(())
    }

    /// The host parsed as an IP address
    pub fn ip(&self) -> Result<IpAddr, crate::Error> {
        self.host
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| crate::Error::config(format!("Invalid IP address '{}': {}", self.host, e)))
    }

    /// The port narrowed to its wire type
    pub fn port_u16(&self) -> Result<u16, crate::Error> {
        match u16::try_from(self.port) {
            Ok(port) if port >= 1 => Ok(port),
            _ => Err(crate::Error::config(format!("Invalid port: {}", self.port))),
        }
    }

    /// Base URL of the service, `http://{host}:{port}`
    pub fn base_url(&self) -> Result<String, crate::Error> {
        let port = self.port_u16()?;
        Ok(match self.ip()? {
            IpAddr::V4(ip) => format!("http://{}:{}", ip, port),
            IpAddr::V6(ip) => format!("http://[{}]:{}", ip, port),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_host(), default_port())
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u32 {
    DEFAULT_PORT
}
