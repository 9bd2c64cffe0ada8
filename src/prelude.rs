//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use chainattr::prelude::*;
//!
//! let key = AttributeKey::parse("material").unwrap();
//! let position = RingId::of_key(&key);
//! ```

pub use crate::{
    // Core types
    AttributeKey, AttributeValue, Coordinate, CoordinateResolver, NodeLabel, NodeRef, PartitionId,
    RingId,
    // Errors
    BlockError, KeyError, NodeRefError,
    // Constants
    BLOCK_LENGTH, MAX_BLOCK_TEXT_LENGTH, MAX_KEY_LENGTH, NODE_REF_LENGTH, NODE_REF_PREFIX,
    RING_BITS,
};
