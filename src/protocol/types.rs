//! SOCKS5 Protocol Types

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::SocksError;
use crate::protocol::constants::*;
use crate::Result;

/// Authentication methods the client is able to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    NoAuth,
    UserPass,
}

impl AuthMethod {
    /// Get the method code for this method
    pub fn method_code(&self) -> u8 {
        match self {
            AuthMethod::NoAuth => SOCKS5_AUTH_NONE,
            AuthMethod::UserPass => SOCKS5_AUTH_USERPASS,
        }
    }
}

/// Username/password pair for RFC 1929 authentication.
///
/// Each component must fit in a single-byte length prefix once UTF-8
/// encoded, so both are limited to 255 bytes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create a new credential pair, validating the length limits
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let credentials = Self {
            username: username.into(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Check the single-byte length-prefix limits.
    ///
    /// Deserialized credentials bypass `new`, so the connector re-runs
    /// this at construction.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.username.len() > MAX_FIELD_LEN {
            return Err(SocksError::InvalidArgument(format!(
                "username too long: {} bytes",
                self.username.len()
            )));
        }
        if self.password.len() > MAX_FIELD_LEN {
            return Err(SocksError::InvalidArgument(format!(
                "password too long: {} bytes",
                self.password.len()
            )));
        }
        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Target endpoint reached through the proxy, addressed by domain name.
///
/// The proxy performs name resolution, so a host that is already a literal
/// IP address is rejected: connecting to a resolved address would leak the
/// caller's intent to resolve names locally and is unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEndpoint {
    host: String,
    port: u16,
}

impl TargetEndpoint {
    /// Create a new endpoint from an unresolved host name and port
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.parse::<IpAddr>().is_ok() {
            return Err(SocksError::InvalidArgument(format!(
                "resolved IP addresses are not supported: {host}"
            )));
        }
        if host.len() > MAX_FIELD_LEN {
            return Err(SocksError::InvalidArgument(format!(
                "host name too long: {} bytes",
                host.len()
            )));
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for TargetEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Human-readable reasons for CONNECT reply codes 0 through 8 (RFC 1928)
const REPLY_REASONS: [&str; 9] = [
    "Succeeded",
    "General SOCKS server failure",
    "Connection not allowed by ruleset",
    "Network unreachable",
    "Host unreachable",
    "Connection refused",
    "TTL expired",
    "Command not supported",
    "Address type not supported",
];

/// Map a CONNECT reply code to its reason string, or the raw numeric code
/// for codes outside the table
pub fn reply_reason(code: u8) -> String {
    match REPLY_REASONS.get(code as usize) {
        Some(reason) => (*reason).to_string(),
        None => code.to_string(),
    }
}
