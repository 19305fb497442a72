//! Connector Configuration

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::Credentials;
use crate::Result;

/// Configuration for a SOCKS5 connector.
///
/// The three timeouts mirror the knobs of the handshake: how long to wait
/// for the TCP connection to the proxy itself, how much extra slack to add
/// to the caller's timeout while the proxy opens the outbound connection,
/// and how much extra slack to leave on the socket's steady-state read
/// timeout afterwards. A zero duration means no timeout.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocksConfig {
    /// Address of the SOCKS5 proxy
    pub proxy_addr: SocketAddr,
    /// Timeout for connecting to the proxy
    #[serde(with = "humantime_serde")]
    pub connect_to_proxy_timeout: Duration,
    /// Extra timeout added to the caller's timeout during the CONNECT
    /// exchange
    #[serde(with = "humantime_serde")]
    pub extra_connect_timeout: Duration,
    /// Extra timeout added to the socket's prior read timeout once the
    /// tunnel is established
    #[serde(with = "humantime_serde")]
    pub extra_socket_timeout: Duration,
    /// Username/password for proxies that require authentication
    pub credentials: Option<Credentials>,
}

impl SocksConfig {
    /// Create a configuration for a proxy that does not require
    /// authentication
    pub fn new(
        proxy_addr: SocketAddr,
        connect_to_proxy_timeout: Duration,
        extra_connect_timeout: Duration,
        extra_socket_timeout: Duration,
    ) -> Self {
        Self {
            proxy_addr,
            connect_to_proxy_timeout,
            extra_connect_timeout,
            extra_socket_timeout,
            credentials: None,
        }
    }

    /// Add username/password credentials for a proxy that requires
    /// authentication
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl Default for SocksConfig {
    fn default() -> Self {
        Self {
            proxy_addr: "127.0.0.1:1080".parse().expect("valid address"),
            connect_to_proxy_timeout: Duration::from_secs(30),
            extra_connect_timeout: Duration::ZERO,
            extra_socket_timeout: Duration::ZERO,
            credentials: None,
        }
    }
}
