//! Error types for identifier and value parsing.

use std::fmt;

/// Errors for attribute key parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Key is empty
    Empty,
    /// Key exceeds maximum length
    TooLong {
        /// Maximum allowed length
        max: usize,
        /// Actual length
        actual: usize,
    },
    /// Invalid character (whitespace, control or non-ASCII)
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position in the input
        position: usize,
    },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "attribute key cannot be empty"),
            Self::TooLong { max, actual } => {
                write!(f, "attribute key length {actual} exceeds maximum {max}")
            }
            Self::InvalidChar { char, position } => {
                write!(
                    f,
                    "invalid character {char:?} at position {position}; only printable ASCII without spaces allowed"
                )
            }
        }
    }
}

impl std::error::Error for KeyError {}

/// Errors for packing text into a fixed 32-byte block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Text does not fit in a block
    TooLong {
        /// Maximum allowed length in bytes
        max: usize,
        /// Actual length in bytes
        actual: usize,
    },
    /// Text contains a NUL byte, which is reserved as padding
    EmbeddedNul {
        /// Byte position of the NUL
        position: usize,
    },
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { max, actual } => {
                write!(f, "text is {actual} bytes, a block holds at most {max}")
            }
            Self::EmbeddedNul { position } => {
                write!(f, "text contains a NUL byte at position {position}")
            }
        }
    }
}

impl std::error::Error for BlockError {}

/// Errors for node reference parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRefError {
    /// Missing `0x` prefix
    MissingPrefix,
    /// Wrong number of hex digits
    InvalidLength {
        /// Expected number of hex digits
        expected: usize,
        /// Actual number of hex digits
        actual: usize,
    },
    /// Non-hex character
    InvalidHexChar {
        /// The invalid character
        char: char,
        /// Position in the input
        position: usize,
    },
}

impl fmt::Display for NodeRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrefix => write!(f, "node reference must start with '0x'"),
            Self::InvalidLength { expected, actual } => {
                write!(
                    f,
                    "node reference has {actual} hex digits, expected {expected}"
                )
            }
            Self::InvalidHexChar { char, position } => {
                write!(f, "invalid hex character {char:?} at position {position}")
            }
        }
    }
}

impl std::error::Error for NodeRefError {}
