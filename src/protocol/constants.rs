//! SOCKS5 Protocol Constants

// SOCKS5 Protocol Version
pub const SOCKS5_VERSION: u8 = 0x05;

// Commands
pub const SOCKS5_CMD_CONNECT: u8 = 0x01;

// Address Types
pub const SOCKS5_ADDR_IPV4: u8 = 0x01;
pub const SOCKS5_ADDR_DOMAIN: u8 = 0x03;
pub const SOCKS5_ADDR_IPV6: u8 = 0x04;

// Authentication Methods
pub const SOCKS5_AUTH_NONE: u8 = 0x00;
pub const SOCKS5_AUTH_USERPASS: u8 = 0x02;
pub const SOCKS5_AUTH_NO_ACCEPTABLE: u8 = 0xFF;

// Reply code for a successful CONNECT
pub const SOCKS5_REPLY_SUCCESS: u8 = 0x00;

// Reserved field value
pub const SOCKS5_RESERVED: u8 = 0x00;

// Username/Password subnegotiation version
pub const SOCKS5_USERPASS_VERSION: u8 = 0x01;

// Username/Password success status
pub const SOCKS5_USERPASS_SUCCESS: u8 = 0x00;

// Maximum length of a domain name, credential or other length-prefixed
// field: the prefix is a single unsigned byte
pub const MAX_FIELD_LEN: usize = 255;
