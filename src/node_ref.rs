//! Opaque node references (network addresses).

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::constants::{NODE_REF_LENGTH, NODE_REF_PREFIX};
use crate::error::NodeRefError;
use crate::hex;

/// Address of a node within its partition.
///
/// A 20-byte opaque reference rendered as `0x` followed by 40 hex digits.
/// The all-zero reference is the *null* reference: it never resolves to a
/// node and is treated as "no address".
///
/// # Examples
///
/// ```
/// use chainattr::NodeRef;
///
/// let node = NodeRef::parse("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
/// assert_eq!(node.to_string(), "0x5fbdb2315678afecb367f032d93f642f64180aa3");
/// assert!(!node.is_null());
///
/// // Simulated deployments derive addresses from a seed
/// assert_eq!(NodeRef::derive("node1"), NodeRef::derive("node1"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef([u8; NODE_REF_LENGTH]);

impl NodeRef {
    /// The null reference.
    pub const NULL: Self = Self([0u8; NODE_REF_LENGTH]);

    /// Creates a reference from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; NODE_REF_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; NODE_REF_LENGTH] {
        &self.0
    }

    /// Parses a `0x`-prefixed hex reference.
    ///
    /// # Errors
    ///
    /// Returns `NodeRefError` if the prefix is missing, the digit count is
    /// not 40, or a non-hex character is present.
    pub fn parse(input: &str) -> Result<Self, NodeRefError> {
        let digits = input
            .strip_prefix(NODE_REF_PREFIX)
            .ok_or(NodeRefError::MissingPrefix)?;

        if digits.len() != NODE_REF_LENGTH * 2 {
            return Err(NodeRefError::InvalidLength {
                expected: NODE_REF_LENGTH * 2,
                actual: digits.len(),
            });
        }

        let mut bytes = [0u8; NODE_REF_LENGTH];
        hex::decode_into(digits, &mut bytes).map_err(|(char, position)| {
            NodeRefError::InvalidHexChar {
                char,
                position: position + NODE_REF_PREFIX.len(),
            }
        })?;
        Ok(Self(bytes))
    }

    /// Derives a deterministic reference from a seed string.
    ///
    /// Takes the first 20 bytes of `SHA256(seed)`.
    #[must_use]
    pub fn derive(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = [0u8; NODE_REF_LENGTH];
        bytes.copy_from_slice(&digest[..NODE_REF_LENGTH]);
        Self(bytes)
    }

    /// Returns true for the all-zero reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NODE_REF_PREFIX)?;
        hex::write_hex(f, &self.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({self})")
    }
}

impl FromStr for NodeRef {
    type Err = NodeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for NodeRef {
    type Error = NodeRefError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for NodeRef {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{NODE_REF_PREFIX}{}", hex::encode(&self.0)))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NodeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Deserialize;
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
