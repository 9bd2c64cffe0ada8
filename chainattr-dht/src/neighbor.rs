//! Directly known peers and their liveness.

use chainattr::{Coordinate, NodeLabel, NodeRef};
use tracing::{debug, info};

/// A peer known to this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborEntry {
    node_id: NodeLabel,
    node_ref: NodeRef,
    coordinate: Coordinate,
    active: bool,
}

impl NeighborEntry {
    /// Creates an active entry.
    #[must_use]
    pub const fn new(node_ref: NodeRef, node_id: NodeLabel, coordinate: Coordinate) -> Self {
        Self {
            node_id,
            node_ref,
            coordinate,
            active: true,
        }
    }

    /// Returns the peer's display label.
    #[must_use]
    pub const fn node_id(&self) -> &NodeLabel {
        &self.node_id
    }

    /// Returns the peer's address.
    #[must_use]
    pub const fn node_ref(&self) -> NodeRef {
        self.node_ref
    }

    /// Returns the peer's coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Returns true if the peer is considered reachable.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if the peer shares the owner's partition.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.coordinate.is_local()
    }
}

/// Peers of one node, kept in insertion order.
///
/// At most one entry per address. The owner never appears in its own
/// table. Entries are deactivated rather than removed, so a peer that
/// comes back can be reactivated by adding it again.
#[derive(Debug, Clone)]
pub struct NeighborTable {
    owner: NodeRef,
    entries: Vec<NeighborEntry>,
}

impl NeighborTable {
    /// Creates an empty table for `owner`.
    #[must_use]
    pub const fn new(owner: NodeRef) -> Self {
        Self {
            owner,
            entries: Vec::new(),
        }
    }

    /// Adds or refreshes a peer.
    ///
    /// A known peer is updated in place and reactivated, keeping its
    /// position. Adding the owner is ignored.
    ///
    /// Returns true if the table changed.
    pub fn add_neighbor(
        &mut self,
        node_ref: NodeRef,
        node_id: NodeLabel,
        coordinate: Coordinate,
    ) -> bool {
        if node_ref == self.owner {
            debug!(node = %node_ref, "ignoring self as neighbor");
            return false;
        }

        let entry = NeighborEntry::new(node_ref, node_id, coordinate);
        if let Some(existing) = self.entries.iter_mut().find(|e| e.node_ref == node_ref) {
            *existing = entry;
        } else {
            debug!(owner = %self.owner, neighbor = %node_ref, "neighbor added");
            self.entries.push(entry);
        }
        true
    }

    /// Returns active peers in insertion order.
    #[must_use]
    pub fn get_active_neighbors(&self) -> Vec<NeighborEntry> {
        self.entries.iter().filter(|e| e.active).copied().collect()
    }

    /// Returns every peer, active or not, in insertion order.
    #[must_use]
    pub fn all_neighbors(&self) -> &[NeighborEntry] {
        &self.entries
    }

    /// Returns the entry for `node_ref`, if known.
    #[must_use]
    pub fn get(&self, node_ref: &NodeRef) -> Option<&NeighborEntry> {
        self.entries.iter().find(|e| e.node_ref == *node_ref)
    }

    /// Marks a peer inactive.
    ///
    /// Returns true if the peer was active before the call.
    pub fn deactivate(&mut self, node_ref: &NodeRef) -> bool {
        match self.entries.iter_mut().find(|e| e.node_ref == *node_ref) {
            Some(entry) if entry.active => {
                entry.active = false;
                info!(owner = %self.owner, neighbor = %node_ref, "neighbor deactivated");
                true
            }
            _ => false,
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of active entries.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }
}

#[cfg(test)]
mod tests {
    use chainattr::{CoordinateResolver, PartitionId};

    use super::*;

    const HOME: PartitionId = PartitionId::new(31337);

    fn label(text: &str) -> NodeLabel {
        NodeLabel::from_text(text).unwrap()
    }

    fn peer(seed: &str) -> (NodeRef, NodeLabel, Coordinate) {
        let node_ref = NodeRef::derive(seed);
        let coordinate = CoordinateResolver::new(HOME).self_coordinate(node_ref);
        (node_ref, label(seed), coordinate)
    }

    #[test]
    fn neighbors_keep_insertion_order() {
        let mut table = NeighborTable::new(NodeRef::derive("node1"));
        for seed in ["node2", "node3", "node4"] {
            let (node_ref, id, coordinate) = peer(seed);
            assert!(table.add_neighbor(node_ref, id, coordinate));
        }

        let order: Vec<_> = table
            .get_active_neighbors()
            .iter()
            .map(NeighborEntry::node_ref)
            .collect();
        assert_eq!(
            order,
            [
                NodeRef::derive("node2"),
                NodeRef::derive("node3"),
                NodeRef::derive("node4")
            ]
        );
    }

    #[test]
    fn owner_is_never_added() {
        let (node_ref, id, coordinate) = peer("node1");
        let mut table = NeighborTable::new(node_ref);

        assert!(!table.add_neighbor(node_ref, id, coordinate));
        assert!(table.is_empty());
    }

    #[test]
    fn re_adding_updates_in_place() {
        let mut table = NeighborTable::new(NodeRef::derive("node1"));
        let (two, id, coordinate) = peer("node2");
        let (three, id3, coordinate3) = peer("node3");
        table.add_neighbor(two, id, coordinate);
        table.add_neighbor(three, id3, coordinate3);

        table.add_neighbor(two, label("renamed"), coordinate);

        assert_eq!(table.len(), 2);
        assert_eq!(table.all_neighbors()[0].node_ref(), two);
        assert_eq!(
            table.get(&two).unwrap().node_id().to_text().as_deref(),
            Some("renamed")
        );
    }

    #[test]
    fn deactivated_neighbors_are_hidden() {
        let mut table = NeighborTable::new(NodeRef::derive("node1"));
        let (two, id, coordinate) = peer("node2");
        table.add_neighbor(two, id, coordinate);

        assert!(table.deactivate(&two));
        assert!(!table.deactivate(&two));
        assert!(table.get_active_neighbors().is_empty());
        assert_eq!(table.active_count(), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn re_adding_reactivates() {
        let mut table = NeighborTable::new(NodeRef::derive("node1"));
        let (two, id, coordinate) = peer("node2");
        table.add_neighbor(two, id, coordinate);
        table.deactivate(&two);

        table.add_neighbor(two, id, coordinate);

        assert!(table.get(&two).unwrap().is_active());
    }

    #[test]
    fn deactivating_unknown_peer_is_noop() {
        let mut table = NeighborTable::new(NodeRef::derive("node1"));
        assert!(!table.deactivate(&NodeRef::derive("ghost")));
    }
}
