//! Identifiers, values and coordinates for a partition-aware attribute DHT.
//!
//! Nodes of the DHT live in independent partitions (for example, separate
//! chains). This crate holds the value types every node shares:
//!
//! - **Identity**: [`PartitionId`], [`NodeRef`] and [`NodeLabel`]
//! - **Attributes**: [`AttributeKey`] and the fixed 32-byte [`AttributeValue`]
//! - **Location**: [`Coordinate`] and the per-node [`CoordinateResolver`]
//! - **Ring positions**: [`RingId`] with modular interval arithmetic for
//!   Chord-style routing
//!
//! The routing engine itself lives in the `chainattr-dht` crate.
//!
//! # Quick Start
//!
//! ```rust
//! use chainattr::{AttributeKey, AttributeValue, CoordinateResolver, NodeRef, PartitionId};
//!
//! let key = AttributeKey::parse("material").unwrap();
//! let value = AttributeValue::from_text("leather").unwrap();
//!
//! let resolver = CoordinateResolver::new(PartitionId::new(31337));
//! let coordinate = resolver.self_coordinate(NodeRef::derive("node1"));
//!
//! assert!(coordinate.is_local());
//! assert_eq!(value.to_text().as_deref(), Some("leather"));
//! assert_eq!(key.as_str(), "material");
//! ```
//!
//! # Locality
//!
//! A coordinate is local iff its partition equals the evaluating node's
//! partition and its address is resolvable. Locality is relative, so a
//! coordinate travelling between nodes is re-resolved on arrival:
//!
//! ```rust
//! use chainattr::{CoordinateResolver, NodeRef, PartitionId};
//!
//! let chain_a = CoordinateResolver::new(PartitionId::new(31337));
//! let chain_b = CoordinateResolver::new(PartitionId::new(31338));
//!
//! let coordinate = chain_a.self_coordinate(NodeRef::derive("node1"));
//! assert!(!chain_b.localize(&coordinate).is_local());
//! ```
//!
//! # Length Constraints
//!
//! | Component | Size |
//! |-----------|------|
//! | Attribute key | 1..=64 bytes |
//! | Attribute value / node label | 32 bytes (text up to 31) |
//! | Node reference | 20 bytes |
//! | Ring position | 256 bits |

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod block;
mod constants;
mod coordinate;
mod error;
mod hex;
mod key;
mod node_ref;
mod partition;
pub mod prelude;
mod ring_id;

pub use block::{AttributeValue, NodeLabel};
pub use constants::{
    BLOCK_LENGTH, MAX_BLOCK_TEXT_LENGTH, MAX_KEY_LENGTH, NODE_REF_LENGTH, NODE_REF_PREFIX,
    RING_BITS,
};
pub use coordinate::{Coordinate, CoordinateResolver};
pub use error::{BlockError, KeyError, NodeRefError};
pub use key::AttributeKey;
pub use node_ref::NodeRef;
pub use partition::PartitionId;
pub use ring_id::RingId;
