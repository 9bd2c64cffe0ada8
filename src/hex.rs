//! Lowercase hex helpers shared by the byte-array types.

use std::fmt;

/// Writes `bytes` as lowercase hex.
pub(crate) fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

/// Encodes `bytes` as a lowercase hex string.
#[cfg_attr(not(feature = "serde"), allow(dead_code))]
pub(crate) fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decodes hex digits into `out`.
///
/// On failure returns the offending character and its position.
pub(crate) fn decode_into(digits: &str, out: &mut [u8]) -> Result<(), (char, usize)> {
    let raw = digits.as_bytes();
    for (i, slot) in out.iter_mut().enumerate() {
        let hi = nibble(raw[2 * i]).ok_or((char::from(raw[2 * i]), 2 * i))?;
        let lo = nibble(raw[2 * i + 1]).ok_or((char::from(raw[2 * i + 1]), 2 * i + 1))?;
        *slot = (hi << 4) | lo;
    }
    Ok(())
}

const fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_mixed_case() {
        let mut out = [0u8; 2];
        decode_into("aBc0", &mut out).unwrap();
        assert_eq!(out, [0xab, 0xc0]);
    }

    #[test]
    fn decode_reports_position() {
        let mut out = [0u8; 2];
        assert_eq!(decode_into("00z0", &mut out), Err(('z', 2)));
    }

    #[test]
    fn encode_is_lowercase() {
        assert_eq!(encode(&[0xAB, 0x01]), "ab01");
    }
}
