//! Attribute key type.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::constants::MAX_KEY_LENGTH;
use crate::error::KeyError;

/// A validated attribute key such as `material` or `color`.
///
/// Keys are short labels of printable ASCII without whitespace, between 1
/// and 64 bytes long. They are compared as text and hashed onto the ring
/// with [`RingId::of_key`](crate::RingId::of_key).
///
/// # Examples
///
/// ```
/// use chainattr::AttributeKey;
///
/// let key = AttributeKey::parse("material").unwrap();
/// assert_eq!(key.as_str(), "material");
///
/// assert!(AttributeKey::parse("").is_err());
/// assert!(AttributeKey::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeKey(String);

impl AttributeKey {
    /// Parses an attribute key.
    ///
    /// # Errors
    ///
    /// Returns `KeyError` if:
    /// - The key is empty
    /// - The key exceeds 64 bytes
    /// - The key contains whitespace, control or non-ASCII characters
    pub fn parse(input: &str) -> Result<Self, KeyError> {
        if input.is_empty() {
            return Err(KeyError::Empty);
        }

        if input.len() > MAX_KEY_LENGTH {
            return Err(KeyError::TooLong {
                max: MAX_KEY_LENGTH,
                actual: input.len(),
            });
        }

        for (i, c) in input.chars().enumerate() {
            if !Self::is_valid_char(c) {
                return Err(KeyError::InvalidChar { char: c, position: i });
            }
        }

        Ok(Self(input.to_string()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the character is valid in a key.
    #[must_use]
    pub const fn is_valid_char(c: char) -> bool {
        c.is_ascii_graphic()
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AttributeKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AttributeKey {
    type Error = KeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for AttributeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AttributeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for AttributeKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AttributeKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AttributeKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Deserialize;
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
