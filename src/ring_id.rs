//! Positions on the consistent-hash ring and modular interval arithmetic.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::constants::RING_BITS;
use crate::hex;
use crate::key::AttributeKey;
use crate::node_ref::NodeRef;

/// A position on the 2^256 identifier ring.
///
/// Keys and nodes are hashed onto the same ring with SHA-256. The bytes are
/// read as a big-endian unsigned integer, so the derived `Ord` is numeric
/// order, and all arithmetic wraps modulo 2^256.
///
/// ```text
/// key position  = SHA256(key)
/// node position = SHA256(node reference bytes)
/// ```
///
/// # Examples
///
/// ```
/// use chainattr::{AttributeKey, RingId};
///
/// let key = AttributeKey::parse("material").unwrap();
/// assert_eq!(RingId::of_key(&key), RingId::of_key(&key));
///
/// // Half-open interval (a, b] wraps past the top of the ring
/// let a = RingId::MAX;
/// let b = RingId::power_of_two(4);
/// assert!(RingId::ZERO.in_half_open(&a, &b));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RingId([u8; 32]);

impl RingId {
    /// Position zero.
    pub const ZERO: Self = Self([0u8; 32]);

    /// The last position before wrapping, 2^256 - 1.
    pub const MAX: Self = Self([0xff; 32]);

    /// Creates a position from big-endian bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the big-endian bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hashes an attribute key onto the ring.
    #[must_use]
    pub fn of_key(key: &AttributeKey) -> Self {
        Self::digest(key.as_str().as_bytes())
    }

    /// Hashes a node reference onto the ring.
    #[must_use]
    pub fn of_node(node: &NodeRef) -> Self {
        Self::digest(node.as_bytes())
    }

    fn digest(input: &[u8]) -> Self {
        let result = Sha256::digest(input);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    /// Returns 2^`exponent`.
    ///
    /// # Panics
    ///
    /// Panics if `exponent` is not below 256.
    #[must_use]
    pub fn power_of_two(exponent: usize) -> Self {
        assert!(exponent < RING_BITS, "ring exponent {exponent} out of range");
        let mut bytes = [0u8; 32];
        bytes[31 - exponent / 8] = 1 << (exponent % 8);
        Self(bytes)
    }

    /// Adds `other`, wrapping at 2^256.
    #[must_use]
    pub fn wrapping_add(&self, other: &Self) -> Self {
        let mut out = [0u8; 32];
        let mut carry = 0u8;
        for i in (0..32).rev() {
            let (partial, c1) = self.0[i].overflowing_add(other.0[i]);
            let (sum, c2) = partial.overflowing_add(carry);
            out[i] = sum;
            carry = u8::from(c1 || c2);
        }
        Self(out)
    }

    /// Subtracts `other`, wrapping at zero.
    #[must_use]
    pub fn wrapping_sub(&self, other: &Self) -> Self {
        let mut out = [0u8; 32];
        let mut borrow = 0u8;
        for i in (0..32).rev() {
            let (partial, b1) = self.0[i].overflowing_sub(other.0[i]);
            let (diff, b2) = partial.overflowing_sub(borrow);
            out[i] = diff;
            borrow = u8::from(b1 || b2);
        }
        Self(out)
    }

    /// Returns `self + 2^exponent`, the start of finger `exponent`.
    ///
    /// # Panics
    ///
    /// Panics if `exponent` is not below 256.
    #[must_use]
    pub fn add_power_of_two(&self, exponent: usize) -> Self {
        self.wrapping_add(&Self::power_of_two(exponent))
    }

    /// Clockwise distance from `self` to `other`.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> Self {
        other.wrapping_sub(self)
    }

    /// Returns true if `self` lies in the open interval `(from, to)`.
    ///
    /// When `from == to` the interval is the whole ring except `from`.
    #[must_use]
    pub fn in_open(&self, from: &Self, to: &Self) -> bool {
        match from.cmp(to) {
            std::cmp::Ordering::Less => from < self && self < to,
            std::cmp::Ordering::Greater => self > from || self < to,
            std::cmp::Ordering::Equal => self != from,
        }
    }

    /// Returns true if `self` lies in the half-open interval `(from, to]`.
    ///
    /// When `from == to` the interval is the whole ring.
    #[must_use]
    pub fn in_half_open(&self, from: &Self, to: &Self) -> bool {
        match from.cmp(to) {
            std::cmp::Ordering::Less => from < self && self <= to,
            std::cmp::Ordering::Greater => self > from || self <= to,
            std::cmp::Ordering::Equal => true,
        }
    }
}

impl fmt::Debug for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RingId({self})")
    }
}

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Truncated for readability
        hex::write_hex(f, &self.0[..8])?;
        write!(f, "...")
    }
}

impl AsRef<[u8]> for RingId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RingId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RingId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Deserialize;
        let s = String::deserialize(deserializer)?;
        if s.len() != 64 {
            return Err(serde::de::Error::custom(
                "RingId hex string must be 64 characters",
            ));
        }
        let mut bytes = [0u8; 32];
        hex::decode_into(&s, &mut bytes).map_err(|(c, i)| {
            serde::de::Error::custom(format!("invalid hex character {c:?} at position {i}"))
        })?;
        Ok(Self(bytes))
    }
}
