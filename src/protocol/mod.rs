//! SOCKS5 Protocol Implementation
//!
//! This module contains the client-side SOCKS5 protocol handling logic.

pub mod constants;
pub mod handshake;
pub mod types;

pub use constants::*;
pub use handshake::{Handshake, Phase};
pub use types::{reply_reason, AuthMethod, Credentials, TargetEndpoint};
