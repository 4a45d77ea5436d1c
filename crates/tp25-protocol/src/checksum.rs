//! Additive checksum shared by commands and notifications.

/// Sum of `bytes`, truncated to 8 bits.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Verify that `message[offset]` holds the checksum of everything before it.
///
/// Returns `None` when `offset` is outside the message.
pub fn verify_checksum(message: &[u8], offset: usize) -> Option<bool> {
    let expected = *message.get(offset)?;
    Some(checksum(&message[..offset]) == expected)
}
