//! Byte Encoding Helpers

use crate::error::SocksError;
use crate::Result;

/// The maximum value that can be represented as an unsigned 16-bit integer.
const MAX_16_BIT_UNSIGNED: i32 = 65535;

/// Writes `src` into `dst` at `offset` as a big-endian unsigned 16-bit
/// integer.
///
/// Fails if `src` is outside the 0..=65535 range or if the buffer does not
/// have two bytes available at `offset`.
pub fn write_uint16(src: i32, dst: &mut [u8], offset: usize) -> Result<()> {
    if src < 0 || src > MAX_16_BIT_UNSIGNED {
        return Err(SocksError::InvalidArgument(format!(
            "value out of range for uint16: {src}"
        )));
    }
    if dst.len() < offset + 2 {
        return Err(SocksError::InvalidArgument(format!(
            "buffer too short for uint16 at offset {offset}"
        )));
    }
    dst[offset] = (src >> 8) as u8;
    dst[offset + 1] = (src & 0xff) as u8;
    Ok(())
}
