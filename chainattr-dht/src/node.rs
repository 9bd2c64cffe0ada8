//! The DHT node: storage, neighbors, and ring state behind one handle.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chainattr::{
    AttributeKey, AttributeValue, Coordinate, CoordinateResolver, NodeLabel, NodeRef,
    PartitionId, RingId,
};
use tracing::{debug, trace};

use crate::{
    AttributeRecord, AttributeStore, DhtError, NeighborEntry, NeighborTable, NodeBuilder,
    NodeConfig, NodeStats, Request, Response, RingPhase, RingSnapshot, RingState, RouteStep,
    Transport,
};

/// One participant in the attribute DHT.
///
/// Owns its attribute store, neighbor table, and Chord ring state. All
/// operations take `&self`; each component sits behind its own `RwLock`
/// and no lock is held while a request is out to another node, so nodes
/// may call back into each other freely.
///
/// Operations that contact other nodes take a [`Transport`] argument.
///
/// # Thread Safety
///
/// Uses `RwLock` for interior mutability, allowing concurrent reads
/// and exclusive writes. A poisoned lock is recovered rather than
/// propagated, since every write leaves its component consistent.
///
/// # Examples
///
/// ```
/// use chainattr::{AttributeKey, AttributeValue, NodeRef, PartitionId};
/// use chainattr_dht::DhtNode;
///
/// let node = DhtNode::builder(PartitionId::new(31337), NodeRef::derive("node1")).build();
///
/// let key = AttributeKey::parse("material").unwrap();
/// node.store_attribute_local(key.clone(), AttributeValue::from_text("leather").unwrap());
///
/// let (value, coordinate) = node.get_attribute_value(&key).unwrap();
/// assert!(coordinate.is_local());
/// assert_eq!(value.and_then(|v| v.to_text()).as_deref(), Some("leather"));
/// ```
#[derive(Debug)]
pub struct DhtNode {
    node_ref: NodeRef,
    label: NodeLabel,
    resolver: CoordinateResolver,
    config: NodeConfig,
    store: RwLock<AttributeStore>,
    neighbors: RwLock<NeighborTable>,
    ring: RwLock<RingState>,
}

impl DhtNode {
    /// Creates a node with an empty store, no neighbors, and no ring.
    #[must_use]
    pub fn new(
        partition: PartitionId,
        node_ref: NodeRef,
        label: NodeLabel,
        config: NodeConfig,
    ) -> Self {
        let resolver = CoordinateResolver::new(partition);
        Self {
            node_ref,
            label,
            resolver,
            config,
            store: RwLock::new(AttributeStore::new(resolver.self_coordinate(node_ref))),
            neighbors: RwLock::new(NeighborTable::new(node_ref)),
            ring: RwLock::new(RingState::new(node_ref)),
        }
    }

    /// Starts building a node.
    #[must_use]
    pub fn builder(partition: PartitionId, node_ref: NodeRef) -> NodeBuilder {
        NodeBuilder::new(partition, node_ref)
    }

    /// Returns this node's address.
    #[must_use]
    pub const fn node_ref(&self) -> NodeRef {
        self.node_ref
    }

    /// Returns this node's display label.
    #[must_use]
    pub const fn label(&self) -> &NodeLabel {
        &self.label
    }

    /// Returns this node's partition.
    #[must_use]
    pub const fn partition(&self) -> PartitionId {
        self.resolver.partition()
    }

    /// Returns this node's coordinate resolver.
    #[must_use]
    pub const fn resolver(&self) -> &CoordinateResolver {
        &self.resolver
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Returns this node's own coordinate.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.resolver.self_coordinate(self.node_ref)
    }

    /// Returns this node's ring position.
    #[must_use]
    pub fn ring_id(&self) -> RingId {
        RingId::of_node(&self.node_ref)
    }

    // ------------------------------------------------------------------
    // Attribute store
    // ------------------------------------------------------------------

    /// Stores a value held by this node, replacing any prior record.
    pub fn store_attribute_local(&self, key: AttributeKey, value: AttributeValue) {
        self.write_store().store_attribute_local(key, value);
    }

    /// Stores a pointer to an attribute held elsewhere.
    pub fn store_attribute_remote(&self, key: AttributeKey, coordinate: Coordinate) {
        self.write_store().store_attribute_remote(key, coordinate);
    }

    /// Returns the value (if held here) and coordinate for `key`.
    ///
    /// Consults only this node.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::NotFound` if no record exists.
    pub fn get_attribute_value(
        &self,
        key: &AttributeKey,
    ) -> Result<(Option<AttributeValue>, Coordinate), DhtError> {
        self.read_store().get_attribute_value(key.as_str())
    }

    /// Returns true if this node holds a record (value or pointer) for `key`.
    #[must_use]
    pub fn has_attribute(&self, key: &AttributeKey) -> bool {
        self.read_store().contains(key.as_str())
    }

    /// Returns a copy of the record for `key`, if any.
    #[must_use]
    pub fn attribute_record(&self, key: &AttributeKey) -> Option<AttributeRecord> {
        self.read_store().record(key.as_str()).cloned()
    }

    /// Returns the stored keys in sorted order.
    #[must_use]
    pub fn attribute_keys(&self) -> Vec<AttributeKey> {
        self.read_store().keys()
    }

    // ------------------------------------------------------------------
    // Neighbor table
    // ------------------------------------------------------------------

    /// Adds or refreshes a neighbor.
    ///
    /// The coordinate's locality is recomputed from this node's point of
    /// view. Adding this node itself is ignored. Returns true if the table
    /// changed.
    pub fn add_neighbor(&self, node_ref: NodeRef, node_id: NodeLabel, coordinate: Coordinate) -> bool {
        let coordinate = self.resolver.localize(&coordinate);
        self.write_neighbors().add_neighbor(node_ref, node_id, coordinate)
    }

    /// Returns active neighbors in insertion order.
    #[must_use]
    pub fn get_active_neighbors(&self) -> Vec<NeighborEntry> {
        self.read_neighbors().get_active_neighbors()
    }

    /// Returns every neighbor entry, inactive ones included, in insertion
    /// order.
    #[must_use]
    pub fn all_neighbors(&self) -> Vec<NeighborEntry> {
        self.read_neighbors().all_neighbors().to_vec()
    }

    /// Returns the neighbor entry for `node_ref`, if known.
    #[must_use]
    pub fn neighbor(&self, node_ref: &NodeRef) -> Option<NeighborEntry> {
        self.read_neighbors().get(node_ref).copied()
    }

    /// Marks a neighbor unreachable. Returns true if it was active.
    pub fn deactivate_neighbor(&self, node_ref: &NodeRef) -> bool {
        self.write_neighbors().deactivate(node_ref)
    }

    // ------------------------------------------------------------------
    // Ring state
    // ------------------------------------------------------------------

    /// Returns the ring membership phase.
    #[must_use]
    pub fn ring_phase(&self) -> RingPhase {
        self.read_ring().phase()
    }

    /// Returns a read-only view of the ring state.
    #[must_use]
    pub fn ring_snapshot(&self) -> RingSnapshot {
        self.read_ring().snapshot()
    }

    /// Decides the next hop of a walk towards `target`.
    pub(crate) fn next_hop(&self, target: &RingId) -> Result<RouteStep, DhtError> {
        self.read_ring()
            .next_hop(target)
            .ok_or_else(|| DhtError::routing_incomplete(target.to_string(), "node has not joined a ring"))
    }

    // ------------------------------------------------------------------
    // Inbound requests
    // ------------------------------------------------------------------

    /// Handles a request from another node.
    ///
    /// `transport` is used for any onward calls the request needs, such as
    /// forwarding a lookup.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::RoutingIncomplete` for a ring step asked of a node
    /// that has not joined a ring.
    pub fn handle(&self, transport: &dyn Transport, request: Request) -> Result<Response, DhtError> {
        trace!(node = %self.node_ref, kind = request.kind(), "handling request");
        match request {
            Request::Lookup(lookup) => Ok(self.serve_lookup(transport, lookup)),
            Request::GetLocal { key } => Ok(self
                .attribute_record(&key)
                .map_or(Response::Absent, Response::Found)),
            Request::StoreLocal { key, value } => {
                self.store_attribute_local(key, value);
                Ok(Response::Ack)
            }
            Request::FindSuccessorStep { target } => self.next_hop(&target).map(Response::Step),
            Request::GetPredecessor => Ok(Response::Predecessor(self.read_ring().predecessor())),
            Request::Notify { candidate } => {
                self.write_ring().notify(candidate);
                Ok(Response::Ack)
            }
            Request::AdoptSuccessor { candidate } => {
                if !self.write_ring().adopt_successor(candidate) {
                    debug!(node = %self.node_ref, candidate = %candidate, "successor suggestion ignored");
                }
                Ok(Response::Ack)
            }
            Request::Ping => Ok(Response::Pong),
        }
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    /// Returns statistics about this node.
    #[must_use]
    pub fn stats(&self) -> NodeStats {
        let (attributes, remote_pointers) = {
            let store = self.read_store();
            (store.len(), store.pointer_count())
        };
        let (active_neighbors, inactive_neighbors) = {
            let neighbors = self.read_neighbors();
            let active = neighbors.active_count();
            (active, neighbors.len() - active)
        };
        let (ring_phase, fingers_populated) = {
            let ring = self.read_ring();
            (ring.phase(), ring.fingers_populated())
        };

        NodeStats {
            attributes,
            remote_pointers,
            active_neighbors,
            inactive_neighbors,
            ring_phase,
            fingers_populated,
        }
    }

    // ------------------------------------------------------------------
    // Lock access
    // ------------------------------------------------------------------

    pub(crate) fn read_store(&self) -> RwLockReadGuard<'_, AttributeStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, AttributeStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn read_neighbors(&self) -> RwLockReadGuard<'_, NeighborTable> {
        self.neighbors.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_neighbors(&self) -> RwLockWriteGuard<'_, NeighborTable> {
        self.neighbors.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn read_ring(&self) -> RwLockReadGuard<'_, RingState> {
        self.ring.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_ring(&self) -> RwLockWriteGuard<'_, RingState> {
        self.ring.write().unwrap_or_else(PoisonError::into_inner)
    }
}
