//! Fixed-width 32-byte blocks: attribute values and node labels.
//!
//! Text is packed left-aligned and zero padded, so `"red"` becomes
//! `72 65 64 00 .. 00`. Packed text is at most 31 bytes, which keeps the
//! last byte zero and makes decoding unambiguous.

use std::fmt;
use std::str::FromStr;

use crate::constants::{BLOCK_LENGTH, MAX_BLOCK_TEXT_LENGTH};
use crate::error::BlockError;
use crate::hex;

fn pack(text: &str) -> Result<[u8; BLOCK_LENGTH], BlockError> {
    if text.len() > MAX_BLOCK_TEXT_LENGTH {
        return Err(BlockError::TooLong {
            max: MAX_BLOCK_TEXT_LENGTH,
            actual: text.len(),
        });
    }
    if let Some(position) = text.bytes().position(|b| b == 0) {
        return Err(BlockError::EmbeddedNul { position });
    }

    let mut bytes = [0u8; BLOCK_LENGTH];
    bytes[..text.len()].copy_from_slice(text.as_bytes());
    Ok(bytes)
}

fn unpack(bytes: &[u8; BLOCK_LENGTH]) -> Option<&str> {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(BLOCK_LENGTH);
    if bytes[end..].iter().any(|b| *b != 0) {
        return None;
    }
    std::str::from_utf8(&bytes[..end]).ok()
}

fn fmt_block(bytes: &[u8; BLOCK_LENGTH], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match unpack(bytes) {
        Some(text) if text.chars().all(|c| !c.is_control()) => f.write_str(text),
        _ => {
            f.write_str("0x")?;
            hex::write_hex(f, bytes)
        }
    }
}

/// A 32-byte attribute value.
///
/// # Examples
///
/// ```
/// use chainattr::AttributeValue;
///
/// let leather = AttributeValue::from_text("leather").unwrap();
/// assert_eq!(leather.to_text().as_deref(), Some("leather"));
/// assert_eq!(leather.as_bytes()[0], b'l');
/// assert_eq!(leather.as_bytes()[31], 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeValue([u8; BLOCK_LENGTH]);

impl AttributeValue {
    /// The all-zero value, what an unset slot reads as.
    pub const ZERO: Self = Self([0u8; BLOCK_LENGTH]);

    /// Creates a value from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; BLOCK_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Packs short text into a value.
    ///
    /// # Errors
    ///
    /// Returns `BlockError` if the text is longer than 31 bytes or contains
    /// a NUL byte.
    pub fn from_text(text: &str) -> Result<Self, BlockError> {
        pack(text).map(Self)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BLOCK_LENGTH] {
        &self.0
    }

    /// Decodes packed text, or `None` if the block is not packed text.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        unpack(&self.0).map(str::to_string)
    }

    /// Returns true if every byte is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_block(&self.0, f)
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeValue({self})")
    }
}

impl FromStr for AttributeValue {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

/// A 32-byte node label, such as `node1`.
///
/// Labels identify neighbors for humans and diagnostics; routing always
/// goes through the [`NodeRef`](crate::NodeRef).
///
/// # Examples
///
/// ```
/// use chainattr::NodeLabel;
///
/// let label = NodeLabel::from_text("node1").unwrap();
/// assert_eq!(label.to_string(), "node1");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeLabel([u8; BLOCK_LENGTH]);

impl NodeLabel {
    /// Creates a label from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; BLOCK_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Packs short text into a label.
    ///
    /// # Errors
    ///
    /// Returns `BlockError` if the text is longer than 31 bytes or contains
    /// a NUL byte.
    pub fn from_text(text: &str) -> Result<Self, BlockError> {
        pack(text).map(Self)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BLOCK_LENGTH] {
        &self.0
    }

    /// Decodes packed text, or `None` if the block is not packed text.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        unpack(&self.0).map(str::to_string)
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_block(&self.0, f)
    }
}

impl fmt::Debug for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeLabel({self})")
    }
}

impl FromStr for NodeLabel {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

#[cfg(feature = "serde")]
fn deserialize_block<'de, D>(deserializer: D) -> Result<[u8; BLOCK_LENGTH], D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Deserialize;
    let s = String::deserialize(deserializer)?;
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| serde::de::Error::custom("block hex string must start with 0x"))?;
    if digits.len() != BLOCK_LENGTH * 2 {
        return Err(serde::de::Error::custom(
            "block hex string must be 64 digits",
        ));
    }
    let mut bytes = [0u8; BLOCK_LENGTH];
    hex::decode_into(digits, &mut bytes).map_err(|(c, i)| {
        serde::de::Error::custom(format!("invalid hex character {c:?} at position {i}"))
    })?;
    Ok(bytes)
}

#[cfg(feature = "serde")]
impl serde::Serialize for AttributeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(&self.0)))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AttributeValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserialize_block(deserializer).map(Self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(&self.0)))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NodeLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserialize_block(deserializer).map(Self)
    }
}
