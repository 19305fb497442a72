//! Error Types

use thiserror::Error;

/// Errors produced while tunneling a connection through a SOCKS5 proxy.
///
/// Every variant is terminal: the handshake is aborted immediately and the
/// underlying socket is left to the caller, which owns it and must close it.
#[derive(Debug, Error)]
pub enum SocksError {
    /// A caller-supplied value violates a protocol limit, such as a host
    /// name or credential longer than 255 bytes, or an endpoint that
    /// carries a resolved IP address instead of a domain name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server reported a protocol version other than the expected one
    /// (5 for SOCKS, 1 for the username/password subnegotiation).
    #[error("unsupported protocol version: expected {expected}, got {actual}")]
    ProtocolVersion { expected: u8, actual: u8 },

    /// The server selected method 0xFF, meaning none of the offered
    /// authentication methods are acceptable.
    #[error("proxy requires authentication")]
    AuthRequired,

    /// The server selected an authentication method other than the one
    /// that was requested.
    #[error("unsupported auth method: {0}")]
    UnsupportedMethod(u8),

    /// The username/password subnegotiation returned a non-zero status.
    #[error("authentication failed, status: {0}")]
    AuthFailed(u8),

    /// The CONNECT reply carried a non-zero reply code.
    #[error("connection failed: {reason}")]
    ConnectFailed { code: u8, reason: String },

    /// The CONNECT reply carried a bound-address type that is neither
    /// IPv4 nor IPv6.
    #[error("unsupported address type: {0}")]
    UnsupportedAddressType(u8),

    /// The stream ended before a fixed-size protocol field was fully read.
    #[error("unexpected end of stream")]
    TruncatedStream,

    /// An I/O failure on the underlying socket, including read timeouts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
