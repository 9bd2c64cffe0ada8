//! Location descriptors and the per-node coordinate resolver.

use std::fmt;

use crate::node_ref::NodeRef;
use crate::partition::PartitionId;

/// Where an attribute or node lives: partition, address, and whether that
/// place is local to the node holding the coordinate.
///
/// Coordinates are immutable. When ownership changes a new coordinate is
/// resolved instead of mutating the old one, and a coordinate received from
/// a peer is re-resolved with [`CoordinateResolver::localize`] because
/// locality is always relative to the evaluating node.
///
/// # Examples
///
/// ```
/// use chainattr::{Coordinate, CoordinateResolver, NodeRef, PartitionId};
///
/// let resolver = CoordinateResolver::new(PartitionId::new(31337));
/// let here = resolver.resolve(PartitionId::new(31337), NodeRef::derive("node1"));
/// let there = resolver.resolve(PartitionId::new(31338), NodeRef::derive("node2"));
///
/// assert!(here.is_local());
/// assert!(!there.is_local());
/// assert!(!CoordinateResolver::is_same_partition(&here, &there));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    partition: PartitionId,
    node_ref: NodeRef,
    is_local: bool,
}

impl Coordinate {
    /// Creates a coordinate with an explicit locality flag.
    ///
    /// Prefer [`CoordinateResolver::resolve`], which derives the flag. This
    /// constructor exists for coordinates received from outside, such as a
    /// caller-supplied remote pointer.
    #[must_use]
    pub const fn new(partition: PartitionId, node_ref: NodeRef, is_local: bool) -> Self {
        Self {
            partition,
            node_ref,
            is_local,
        }
    }

    /// Creates a non-local coordinate.
    #[must_use]
    pub const fn foreign(partition: PartitionId, node_ref: NodeRef) -> Self {
        Self::new(partition, node_ref, false)
    }

    /// Returns the partition.
    #[must_use]
    pub const fn partition(&self) -> PartitionId {
        self.partition
    }

    /// Returns the node reference.
    #[must_use]
    pub const fn node_ref(&self) -> NodeRef {
        self.node_ref
    }

    /// Returns true if the location is local to the evaluating node.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.is_local
    }

    /// Returns true if this coordinate addresses `node`.
    #[must_use]
    pub fn points_at(&self, node: &NodeRef) -> bool {
        self.node_ref == *node
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = if self.is_local { "local" } else { "remote" };
        write!(f, "{}@{} ({scope})", self.node_ref, self.partition)
    }
}

/// Answers "is this location local?" for one node.
///
/// Holds the node's own partition, fixed at construction. Resolution is a
/// pure function of that partition and its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateResolver {
    partition: PartitionId,
}

impl CoordinateResolver {
    /// Creates a resolver for a node living in `partition`.
    #[must_use]
    pub const fn new(partition: PartitionId) -> Self {
        Self { partition }
    }

    /// Returns the resolver's own partition.
    #[must_use]
    pub const fn partition(&self) -> PartitionId {
        self.partition
    }

    /// Resolves a partition and address into a coordinate.
    ///
    /// The result is local iff `partition` is this resolver's partition and
    /// `node_ref` is resolvable (not null). Never fails.
    #[must_use]
    pub fn resolve(&self, partition: PartitionId, node_ref: NodeRef) -> Coordinate {
        let is_local = partition == self.partition && Self::is_resolvable(&node_ref);
        Coordinate::new(partition, node_ref, is_local)
    }

    /// Re-resolves a coordinate from this resolver's point of view.
    #[must_use]
    pub fn localize(&self, coordinate: &Coordinate) -> Coordinate {
        self.resolve(coordinate.partition(), coordinate.node_ref())
    }

    /// Returns the coordinate of a node in this resolver's partition.
    #[must_use]
    pub fn self_coordinate(&self, node_ref: NodeRef) -> Coordinate {
        self.resolve(self.partition, node_ref)
    }

    /// Returns true if `partition` is this resolver's partition.
    #[must_use]
    pub fn is_own_partition(&self, partition: PartitionId) -> bool {
        partition == self.partition
    }

    /// Returns true if two coordinates share a partition, ignoring address.
    #[must_use]
    pub fn is_same_partition(a: &Coordinate, b: &Coordinate) -> bool {
        a.partition == b.partition
    }

    /// Returns true if `node_ref` can address a node.
    #[must_use]
    pub fn is_resolvable(node_ref: &NodeRef) -> bool {
        !node_ref.is_null()
    }
}
