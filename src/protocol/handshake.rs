//! SOCKS5 Client Handshake
//!
//! Drives the client side of the RFC 1928 handshake over an already
//! connected stream: method negotiation, optional RFC 1929
//! username/password subnegotiation, then the CONNECT exchange.
//!
//! The phases must run strictly in order and never retry; any validation
//! failure moves the session to `Failed`, which is terminal.

use tracing::debug;

use crate::codec::write_uint16;
use crate::error::SocksError;
use crate::protocol::constants::*;
use crate::protocol::types::{reply_reason, AuthMethod, Credentials, TargetEndpoint};
use crate::transport::{read_fully, Transport};
use crate::Result;

/// Handshake progress, advanced step by step by the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    MethodSent,
    MethodOk,
    AuthSent,
    AuthOk,
    ConnectSent,
    Established,
    Failed,
}

/// Per-call handshake session over a borrowed stream
pub struct Handshake<'a, T: Transport> {
    stream: &'a mut T,
    credentials: Option<&'a Credentials>,
    phase: Phase,
}

impl<'a, T: Transport> Handshake<'a, T> {
    pub fn new(stream: &'a mut T, credentials: Option<&'a Credentials>) -> Self {
        Self {
            stream,
            credentials,
            phase: Phase::Init,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The single authentication method offered to the server, chosen by
    /// whether credentials are configured
    fn requested_method(&self) -> AuthMethod {
        if self.credentials.is_some() {
            AuthMethod::UserPass
        } else {
            AuthMethod::NoAuth
        }
    }

    fn advance(&mut self, phase: Phase) {
        debug!(?phase, "handshake phase");
        self.phase = phase;
    }

    fn fail(&mut self, err: SocksError) -> SocksError {
        self.phase = Phase::Failed;
        err
    }

    /// Send the method-selection request: version, method count, method
    pub fn send_method_request(&mut self) -> Result<()> {
        let request = [SOCKS5_VERSION, 1, self.requested_method().method_code()];
        self.write_all_flush(&request)?;
        self.advance(Phase::MethodSent);
        Ok(())
    }

    /// Receive and validate the method-selection response
    pub fn receive_method_response(&mut self) -> Result<()> {
        let mut response = [0u8; 2];
        self.read(&mut response)?;
        let version = response[0];
        let method = response[1];
        if version != SOCKS5_VERSION {
            return Err(self.fail(SocksError::ProtocolVersion {
                expected: SOCKS5_VERSION,
                actual: version,
            }));
        }
        if method == SOCKS5_AUTH_NO_ACCEPTABLE {
            return Err(self.fail(SocksError::AuthRequired));
        }
        if method != self.requested_method().method_code() {
            return Err(self.fail(SocksError::UnsupportedMethod(method)));
        }
        self.advance(Phase::MethodOk);
        Ok(())
    }

    /// Send the RFC 1929 username/password request
    pub fn send_auth_request(&mut self) -> Result<()> {
        let Some(credentials) = self.credentials else {
            return Err(self.fail(SocksError::InvalidArgument(
                "credentials not configured".to_string(),
            )));
        };
        credentials.validate().map_err(|e| self.fail(e))?;
        let username = credentials.username().as_bytes();
        let password = credentials.password().as_bytes();
        let mut request = Vec::with_capacity(3 + username.len() + password.len());
        request.push(SOCKS5_USERPASS_VERSION);
        request.push(username.len() as u8);
        request.extend_from_slice(username);
        request.push(password.len() as u8);
        request.extend_from_slice(password);
        self.write_all_flush(&request)?;
        self.advance(Phase::AuthSent);
        Ok(())
    }

    /// Receive and validate the subnegotiation response
    pub fn receive_auth_response(&mut self) -> Result<()> {
        let mut response = [0u8; 2];
        self.read(&mut response)?;
        let version = response[0];
        let status = response[1];
        if version != SOCKS5_USERPASS_VERSION {
            return Err(self.fail(SocksError::ProtocolVersion {
                expected: SOCKS5_USERPASS_VERSION,
                actual: version,
            }));
        }
        if status != SOCKS5_USERPASS_SUCCESS {
            return Err(self.fail(SocksError::AuthFailed(status)));
        }
        self.advance(Phase::AuthOk);
        Ok(())
    }

    /// Send the CONNECT request for a domain-name target.
    ///
    /// The request is `7 + len(host)` bytes: version, command, reserved,
    /// address type, host length, host bytes, then the big-endian port.
    pub fn send_connect_request(&mut self, endpoint: &TargetEndpoint) -> Result<()> {
        let host = endpoint.host().as_bytes();
        if host.len() > MAX_FIELD_LEN {
            return Err(self.fail(SocksError::InvalidArgument(format!(
                "host name too long: {} bytes",
                host.len()
            ))));
        }
        let mut request = vec![0u8; 7 + host.len()];
        request[0] = SOCKS5_VERSION;
        request[1] = SOCKS5_CMD_CONNECT;
        request[2] = SOCKS5_RESERVED;
        request[3] = SOCKS5_ADDR_DOMAIN;
        request[4] = host.len() as u8;
        request[5..5 + host.len()].copy_from_slice(host);
        let port_offset = request.len() - 2;
        write_uint16(endpoint.port() as i32, &mut request, port_offset)
            .map_err(|e| self.fail(e))?;
        self.write_all_flush(&request)?;
        self.advance(Phase::ConnectSent);
        Ok(())
    }

    /// Receive and validate the CONNECT reply, consuming the bound address
    /// and port even though the caller has no use for them
    pub fn receive_connect_response(&mut self) -> Result<()> {
        let mut header = [0u8; 4];
        self.read(&mut header)?;
        let version = header[0];
        let reply = header[1];
        let address_type = header[3];
        if version != SOCKS5_VERSION {
            return Err(self.fail(SocksError::ProtocolVersion {
                expected: SOCKS5_VERSION,
                actual: version,
            }));
        }
        if reply != SOCKS5_REPLY_SUCCESS {
            return Err(self.fail(SocksError::ConnectFailed {
                code: reply,
                reason: reply_reason(reply),
            }));
        }
        match address_type {
            SOCKS5_ADDR_IPV4 => self.read(&mut [0u8; 4])?,
            SOCKS5_ADDR_IPV6 => self.read(&mut [0u8; 16])?,
            other => return Err(self.fail(SocksError::UnsupportedAddressType(other))),
        }
        // Bound port
        self.read(&mut [0u8; 2])?;
        self.advance(Phase::Established);
        Ok(())
    }

    /// Current read timeout of the underlying stream
    pub fn read_timeout(&self) -> std::io::Result<Option<std::time::Duration>> {
        self.stream.read_timeout()
    }

    /// Adjust the read timeout of the underlying stream
    pub fn set_read_timeout(
        &self,
        timeout: Option<std::time::Duration>,
    ) -> std::io::Result<()> {
        self.stream.set_read_timeout(timeout)
    }

    fn write_all_flush(&mut self, bytes: &[u8]) -> Result<()> {
        if let Err(e) = self.stream.write_all(bytes).and_then(|()| self.stream.flush()) {
            return Err(self.fail(e.into()));
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        read_fully(&mut *self.stream, buf).map_err(|e| self.fail(e))
    }
}
