//! Simulated network for evaluation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chainattr::NodeRef;
use tracing::{debug, info, trace};

use crate::{DhtError, DhtNode, NetworkConfig, NetworkStats, Request, Response, Transport};

/// In-process network connecting [`DhtNode`]s.
///
/// Single-process transport that delivers each request by calling the
/// target node's handler directly. Suitable for evaluation and testing.
/// Supports simulated latency, a per-call timeout, and cutting nodes off
/// to model failures.
///
/// # Thread Safety
///
/// Uses `RwLock` for interior mutability, allowing concurrent reads
/// and exclusive writes. The registry lock is released before a request
/// is delivered, so handlers may call back into the network.
///
/// # Examples
///
/// ```
/// use chainattr::{AttributeKey, AttributeValue, NodeRef, PartitionId};
/// use chainattr_dht::{DhtNode, SimulatedNetwork};
///
/// let network = SimulatedNetwork::with_defaults();
/// let one = network.add_node(DhtNode::builder(PartitionId::new(31337), NodeRef::derive("node1")).build());
/// let two = network.add_node(DhtNode::builder(PartitionId::new(31337), NodeRef::derive("node2")).build());
/// one.add_neighbor(two.node_ref(), *two.label(), two.coordinate());
///
/// let key = AttributeKey::parse("color").unwrap();
/// two.store_attribute_local(key.clone(), AttributeValue::from_text("red").unwrap());
///
/// let record = one.get_distributed_attribute(&network, &key).unwrap();
/// assert_eq!(record.coordinate().node_ref(), two.node_ref());
/// ```
#[derive(Debug)]
pub struct SimulatedNetwork {
    /// Registered nodes by address.
    nodes: RwLock<HashMap<NodeRef, Arc<DhtNode>>>,

    /// Addresses currently cut off.
    unreachable: RwLock<HashSet<NodeRef>>,

    /// Configuration
    config: NetworkConfig,

    calls: AtomicU64,
    failed_calls: AtomicU64,
}

impl SimulatedNetwork {
    /// Creates a new network with the given configuration.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            unreachable: RwLock::new(HashSet::new()),
            config,
            calls: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
        }
    }

    /// Creates a new network with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(NetworkConfig::default())
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Registers a node and returns a shared handle to it.
    ///
    /// A node already registered at the same address is replaced.
    pub fn add_node(&self, node: DhtNode) -> Arc<DhtNode> {
        let node = Arc::new(node);
        let previous = self
            .nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(node.node_ref(), Arc::clone(&node));
        if previous.is_some() {
            info!(node = %node.node_ref(), "replaced registered node");
        } else {
            debug!(node = %node.node_ref(), partition = %node.partition(), "node registered");
        }
        node
    }

    /// Returns the node at `node_ref`, if registered.
    #[must_use]
    pub fn node(&self, node_ref: &NodeRef) -> Option<Arc<DhtNode>> {
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(node_ref)
            .cloned()
    }

    /// Returns all registered nodes, sorted by address.
    #[must_use]
    pub fn nodes(&self) -> Vec<Arc<DhtNode>> {
        let mut nodes: Vec<_> = self
            .nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        nodes.sort_by_key(|node| node.node_ref());
        nodes
    }

    /// Returns the number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cuts a node off from, or reconnects it to, the network.
    ///
    /// Calls to an unreachable node fail with `NeighborUnreachable`.
    pub fn set_reachable(&self, node_ref: NodeRef, reachable: bool) {
        let mut unreachable = self
            .unreachable
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if reachable {
            unreachable.remove(&node_ref);
        } else {
            unreachable.insert(node_ref);
        }
        info!(node = %node_ref, reachable, "reachability changed");
    }

    /// Returns true if calls to `node_ref` can be delivered.
    #[must_use]
    pub fn is_reachable(&self, node_ref: &NodeRef) -> bool {
        !self
            .unreachable
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(node_ref)
    }

    /// Runs `rounds` stabilization rounds on every joined node.
    pub fn stabilize_all(&self, rounds: usize) {
        let nodes = self.nodes();
        for _ in 0..rounds {
            for node in &nodes {
                node.stabilize(self);
            }
        }
    }

    /// Returns statistics about the network.
    #[must_use]
    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            nodes: self.len(),
            unreachable_nodes: self
                .unreachable
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
            calls: self.calls.load(Ordering::Relaxed),
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
        }
    }

    fn fail(&self, err: DhtError) -> Result<Response, DhtError> {
        self.failed_calls.fetch_add(1, Ordering::Relaxed);
        Err(err)
    }
}

impl Transport for SimulatedNetwork {
    fn call(&self, target: &NodeRef, request: Request) -> Result<Response, DhtError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        trace!(to = %target, kind = request.kind(), "delivering request");

        if !self.is_reachable(target) {
            return self.fail(DhtError::neighbor_unreachable(target.to_string()));
        }

        let Some(node) = self.node(target) else {
            return self.fail(DhtError::unknown_node(target.to_string()));
        };

        if let Some(delay) = self.config.simulated_delay {
            if delay > self.config.call_timeout {
                std::thread::sleep(self.config.call_timeout);
                debug!(to = %target, ?delay, "call timed out");
                return self.fail(DhtError::neighbor_unreachable(target.to_string()));
            }
            std::thread::sleep(delay);
        }

        node.handle(self, request)
    }
}
