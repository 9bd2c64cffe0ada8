//! Statistics and result types for DHT evaluation.

use crate::{RingPeer, RingPhase};

/// Statistics about one node's state.
///
/// Used for evaluation metrics and monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Records in the attribute store, values and pointers.
    pub attributes: usize,
    /// Records that only point elsewhere.
    pub remote_pointers: usize,
    /// Neighbors currently considered reachable.
    pub active_neighbors: usize,
    /// Neighbors marked unreachable.
    pub inactive_neighbors: usize,
    /// Ring membership phase.
    pub ring_phase: RingPhase,
    /// Finger entries that hold a peer.
    pub fingers_populated: usize,
}

impl NodeStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub const fn attributes(&self) -> usize {
        self.attributes
    }

    /// Returns the number of locally held values.
    #[must_use]
    pub const fn local_values(&self) -> usize {
        self.attributes.saturating_sub(self.remote_pointers)
    }

    /// Returns the number of known neighbors.
    #[must_use]
    pub const fn neighbors(&self) -> usize {
        self.active_neighbors + self.inactive_neighbors
    }
}

/// Statistics about the simulated network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStats {
    /// Registered nodes.
    pub nodes: usize,
    /// Nodes currently cut off by fault injection.
    pub unreachable_nodes: usize,
    /// Calls attempted since creation.
    pub calls: u64,
    /// Calls that failed to reach a handler.
    pub failed_calls: u64,
}

impl NetworkStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of calls that reached a handler.
    #[must_use]
    pub const fn delivered_calls(&self) -> u64 {
        self.calls.saturating_sub(self.failed_calls)
    }
}

/// Result of routing a key to its ring owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOutcome {
    /// The node responsible for the key.
    pub owner: RingPeer,
    /// Remote hops the walk took.
    pub hops: u32,
}

impl RouteOutcome {
    /// Creates an outcome.
    #[must_use]
    pub const fn new(owner: RingPeer, hops: u32) -> Self {
        Self { owner, hops }
    }
}

/// What one `stabilize` call changed.
///
/// Stabilization never fails; peers that could not be reached are
/// counted in `errors` and retried next round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilizeReport {
    /// True if a closer successor was adopted.
    pub successor_changed: bool,
    /// True if the successor was notified of this node.
    pub notified: bool,
    /// Finger entries refreshed.
    pub fingers_refreshed: usize,
    /// Remote calls that failed.
    pub errors: usize,
}

impl StabilizeReport {
    /// Returns true if nothing failed this round.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

#[cfg(test)]
mod tests {
    use chainattr::NodeRef;

    use super::*;

    #[test]
    fn node_stats_derived_counts() {
        let stats = NodeStats {
            attributes: 5,
            remote_pointers: 2,
            active_neighbors: 3,
            inactive_neighbors: 1,
            ..NodeStats::new()
        };

        assert_eq!(stats.local_values(), 3);
        assert_eq!(stats.neighbors(), 4);
        assert_eq!(stats.ring_phase, RingPhase::Uninitialized);
    }

    #[test]
    fn network_stats_delivered() {
        let stats = NetworkStats {
            calls: 10,
            failed_calls: 3,
            ..NetworkStats::new()
        };
        assert_eq!(stats.delivered_calls(), 7);
    }

    #[test]
    fn clean_report() {
        assert!(StabilizeReport::default().is_clean());
        let report = StabilizeReport {
            errors: 1,
            ..StabilizeReport::default()
        };
        assert!(!report.is_clean());
    }

    #[test]
    fn route_outcome_holds_owner() {
        let owner = RingPeer::new(NodeRef::derive("node3"));
        let outcome = RouteOutcome::new(owner, 2);
        assert_eq!(outcome.owner.node_ref(), NodeRef::derive("node3"));
        assert_eq!(outcome.hops, 2);
    }
}
