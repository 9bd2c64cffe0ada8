//! Constants for identifier and value validation.

/// Width in bytes of attribute values and node labels.
pub const BLOCK_LENGTH: usize = 32;

/// Maximum UTF-8 length of text packed into a block.
///
/// One byte is reserved so that packed text always ends in a zero byte.
pub const MAX_BLOCK_TEXT_LENGTH: usize = 31;

/// Width in bytes of a node reference (network address).
pub const NODE_REF_LENGTH: usize = 20;

/// Maximum attribute key length in bytes.
pub const MAX_KEY_LENGTH: usize = 64;

/// Number of bits in the ring keyspace, and so the finger table size.
pub const RING_BITS: usize = 256;

/// Prefix used when rendering node references as text.
pub const NODE_REF_PREFIX: &str = "0x";
