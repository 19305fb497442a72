//! SOCKS5 Client Tunnel
//!
//! A blocking SOCKS5 client (RFC 1928) with optional username/password
//! authentication (RFC 1929). The connector performs method negotiation,
//! authentication and the CONNECT exchange over a single TCP connection,
//! then hands the stream back to the caller as an ordinary tunneled
//! byte connection.

pub mod codec;
pub mod config;
pub mod connector;
pub mod error;
pub mod protocol;
pub mod transport;

pub use config::SocksConfig;
pub use connector::SocksConnector;
pub use error::SocksError;
pub use protocol::{Credentials, TargetEndpoint};
pub use transport::Transport;

/// Common result type for the crate
pub type Result<T> = std::result::Result<T, SocksError>;
