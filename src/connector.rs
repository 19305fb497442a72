//! SOCKS5 Connector
//!
//! Orchestrates the handshake phases over one socket: method negotiation,
//! optional authentication, then the CONNECT exchange, with the read
//! timeout elevated for the CONNECT round trip and settled to its
//! steady-state value once the tunnel is up.

use std::net::TcpStream;
use std::time::Duration;

use tracing::debug;

use crate::config::SocksConfig;
use crate::protocol::{Handshake, TargetEndpoint};
use crate::transport::Transport;
use crate::Result;

/// A connector that tunnels TCP connections through a SOCKS5 proxy.
///
/// The connector holds the proxy address, the timeout configuration and
/// optional credentials; each call to [`connect`](Self::connect) performs
/// one complete handshake on a fresh socket. There are no retries: any
/// failure aborts the call and the caller must discard the socket.
pub struct SocksConnector {
    config: SocksConfig,
}

impl SocksConnector {
    /// Create a connector, validating any configured credentials once
    pub fn new(config: SocksConfig) -> Result<Self> {
        if let Some(credentials) = &config.credentials {
            credentials.validate()?;
        }
        Ok(Self { config })
    }

    /// Connect to `endpoint` through the proxy.
    ///
    /// Blocks for the entire handshake. `timeout` bounds the proxy's
    /// CONNECT round trip (plus the configured extra); afterwards the
    /// returned stream's read timeout is its previous value plus
    /// `extra_socket_timeout`.
    pub fn connect(&self, endpoint: &TargetEndpoint, timeout: Duration) -> Result<TcpStream> {
        debug!(proxy = %self.config.proxy_addr, target = %endpoint, "connecting through SOCKS5 proxy");
        let mut stream = if self.config.connect_to_proxy_timeout.is_zero() {
            TcpStream::connect(self.config.proxy_addr)?
        } else {
            TcpStream::connect_timeout(
                &self.config.proxy_addr,
                self.config.connect_to_proxy_timeout,
            )?
        };
        self.establish(&mut stream, endpoint, timeout)?;
        debug!(target = %endpoint, "tunnel established");
        Ok(stream)
    }

    /// Convenience form of [`connect`](Self::connect) taking a raw host
    /// and port
    pub fn connect_host(&self, host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
        let endpoint = TargetEndpoint::new(host, port)?;
        self.connect(&endpoint, timeout)
    }

    /// Run the handshake over an already connected stream.
    ///
    /// Exposed separately so the tunnel can be established over any
    /// [`Transport`], and so the handshake can be tested without a real
    /// network.
    pub fn establish<T: Transport>(
        &self,
        stream: &mut T,
        endpoint: &TargetEndpoint,
        timeout: Duration,
    ) -> Result<()> {
        let mut handshake = Handshake::new(stream, self.config.credentials.as_ref());

        handshake.send_method_request()?;
        handshake.receive_method_response()?;

        if self.config.credentials.is_some() {
            handshake.send_auth_request()?;
            handshake.receive_auth_response()?;
        }

        // Elevate the read timeout for the CONNECT round trip, which
        // includes the proxy's own outbound connection attempt
        let old_timeout = handshake.read_timeout()?;
        handshake
            .set_read_timeout(as_socket_timeout(timeout + self.config.extra_connect_timeout))?;

        handshake.send_connect_request(endpoint)?;
        handshake.receive_connect_response()?;

        // Steady-state timeout for application traffic. If the CONNECT
        // exchange fails the elevated timeout is left in place, matching
        // the behavior callers already rely on; the failed socket must be
        // discarded anyway.
        let steady = old_timeout.unwrap_or(Duration::ZERO) + self.config.extra_socket_timeout;
        handshake.set_read_timeout(as_socket_timeout(steady))?;
        Ok(())
    }
}

/// A zero socket timeout means "no timeout", as with `SO_TIMEOUT`
fn as_socket_timeout(timeout: Duration) -> Option<Duration> {
    if timeout.is_zero() {
        None
    } else {
        Some(timeout)
    }
}
