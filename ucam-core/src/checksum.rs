//! Data packet verify code
//!
//! From the datasheet:
//! 1. Sum every byte of the packet before the verify code (id, length, payload)
//! 2. Keep the low byte of the sum
//! 3. Send it as a 16-bit value with the high byte zero
//!
//! An additive byte sum cannot detect reordered bytes or two errors that
//! cancel out, so a match only means the packet is plausibly intact.

use tracing::trace;

/// Calculate the verify code of a data packet
///
/// # Examples
///
/// ```
/// use ucam_core::checksum;
///
/// // id 1, length 2, payload FF D8
/// let code = checksum::calculate(&[0x01, 0x00, 0x02, 0x00], &[0xFF, 0xD8]);
/// assert_eq!(code, 0xDA);
/// ```
pub fn calculate(header: &[u8], payload: &[u8]) -> u8 {
    let code = header
        .iter()
        .chain(payload)
        .fold(0u8, |sum, &b| sum.wrapping_add(b));

    trace!(
        header_len = header.len(),
        payload_len = payload.len(),
        code = format!("0x{:02X}", code),
        "Calculated verify code"
    );

    code
}
