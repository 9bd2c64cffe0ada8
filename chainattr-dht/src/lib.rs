//! Partition-aware attribute DHT with neighbor lookup and Chord routing.
//!
//! Nodes live in independent partitions (for example, separate chains)
//! and hold small named attributes. This crate provides:
//!
//! - **Attribute storage**: [`AttributeStore`] of values and pointers
//! - **Neighbor lookup**: [`DhtNode::get_distributed_attribute`] walks the
//!   neighbor graph, preferring same-partition peers
//! - **Chord ring**: [`DhtNode::join_network`], [`DhtNode::stabilize`],
//!   [`DhtNode::store_data`] and [`DhtNode::get_data`] over a
//!   consistent-hash ring
//! - **Transport seam**: [`Transport`] trait for node-to-node calls
//! - **In-memory simulation**: [`SimulatedNetwork`] for evaluation and
//!   testing, with latency and fault injection
//!
//! # Overview
//!
//! Two lookup mechanisms coexist on every node. The neighbor lookup asks
//! directly known peers and never leaves the node's partition; it can
//! surface a pointer to a foreign partition instead. The ring assigns
//! each key to exactly one owner:
//!
//! ```text
//! owner(key) = first node clockwise from SHA256(key)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use chainattr::{AttributeKey, AttributeValue, NodeRef, PartitionId};
//! use chainattr_dht::{DhtNode, SimulatedNetwork};
//!
//! let network = SimulatedNetwork::with_defaults();
//! let chain = PartitionId::new(31337);
//!
//! let one = network.add_node(DhtNode::builder(chain, NodeRef::derive("node1")).build());
//! let two = network.add_node(DhtNode::builder(chain, NodeRef::derive("node2")).build());
//!
//! one.join_network(&network, one.node_ref()).unwrap();
//! two.join_network(&network, one.node_ref()).unwrap();
//! network.stabilize_all(2);
//!
//! let key = AttributeKey::parse("material").unwrap();
//! one.store_data(&network, key.clone(), AttributeValue::from_text("leather").unwrap()).unwrap();
//!
//! let value = two.get_data(&network, &key).unwrap();
//! assert_eq!(value.to_text().as_deref(), Some("leather"));
//! ```
//!
//! # Cross-Partition Lookup
//!
//! ```rust
//! use chainattr::{AttributeKey, NodeRef, PartitionId};
//! use chainattr_dht::{DhtNode, SimulatedNetwork};
//!
//! let network = SimulatedNetwork::with_defaults();
//! let home = network.add_node(DhtNode::builder(PartitionId::new(31337), NodeRef::derive("a")).build());
//! let away = network.add_node(DhtNode::builder(PartitionId::new(31338), NodeRef::derive("b")).build());
//! home.add_neighbor(away.node_ref(), *away.label(), away.coordinate());
//!
//! // The foreign neighbor is never contacted; it comes back as a pointer.
//! let key = AttributeKey::parse("color").unwrap();
//! let record = home.get_distributed_attribute(&network, &key).unwrap();
//! assert!(record.is_pointer());
//! assert!(!record.coordinate().is_local());
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod chord;
mod config;
mod error;
mod lookup;
mod message;
mod neighbor;
mod network;
mod node;
mod record;
mod ring;
mod stats;
mod store;
mod traits;

pub use builder::NodeBuilder;
pub use config::{CrossPartitionPolicy, NetworkConfig, NodeConfig, SelectionPolicy};
pub use error::DhtError;
pub use message::{LookupRequest, Request, RequestId, Response};
pub use neighbor::{NeighborEntry, NeighborTable};
pub use network::SimulatedNetwork;
pub use node::DhtNode;
pub use record::AttributeRecord;
pub use ring::{RingPeer, RingPhase, RingSnapshot, RingState, RouteStep};
pub use stats::{NetworkStats, NodeStats, RouteOutcome, StabilizeReport};
pub use store::AttributeStore;
pub use traits::Transport;
