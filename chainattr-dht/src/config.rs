//! Configuration for nodes and the simulated network.

use std::time::Duration;

/// How `find_closest_node` orders same-partition neighbors.
///
/// Locality always dominates: any same-partition neighbor ranks ahead of
/// every foreign one, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionPolicy {
    /// First same-partition neighbor in insertion order.
    #[default]
    FirstLocal,
    /// Same-partition neighbor with the smallest clockwise ring distance
    /// from the key's position to the neighbor's position.
    ClosestOnRing,
}

/// What a lookup does with foreign-partition neighbors.
///
/// Foreign neighbors are never contacted; this only decides whether one
/// is surfaced as a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossPartitionPolicy {
    /// Return a value-less pointer to the first active foreign neighbor.
    #[default]
    SurfacePointer,
    /// Treat foreign neighbors as having no answer.
    Stop,
}

/// Per-node configuration.
///
/// Controls lookup hop budgets, ring maintenance, and routing policy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConfig {
    /// Maximum forwards a neighbor lookup may take.
    ///
    /// Default: 16
    pub max_hops: u32,

    /// Maximum hops a ring walk may take before `RoutingIncomplete`.
    ///
    /// Default: 64
    pub max_route_hops: u32,

    /// Finger entries refreshed per `stabilize` call.
    ///
    /// Default: 8
    pub fingers_per_stabilize: usize,

    /// Neighbor ranking policy.
    ///
    /// Default: `FirstLocal`
    pub selection_policy: SelectionPolicy,

    /// Foreign-partition handling during lookups.
    ///
    /// Default: `SurfacePointer`
    pub cross_partition_policy: CrossPartitionPolicy,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_hops: 16,
            max_route_hops: 64,
            fingers_per_stabilize: 8,
            selection_policy: SelectionPolicy::FirstLocal,
            cross_partition_policy: CrossPartitionPolicy::SurfacePointer,
        }
    }
}

impl NodeConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lookup hop budget.
    #[must_use]
    pub const fn with_max_hops(mut self, max_hops: u32) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Sets the ring walk hop budget.
    #[must_use]
    pub const fn with_max_route_hops(mut self, max_route_hops: u32) -> Self {
        self.max_route_hops = max_route_hops;
        self
    }

    /// Sets how many fingers each `stabilize` refreshes.
    #[must_use]
    pub const fn with_fingers_per_stabilize(mut self, count: usize) -> Self {
        self.fingers_per_stabilize = count;
        self
    }

    /// Sets the neighbor ranking policy.
    #[must_use]
    pub const fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Sets the foreign-partition policy.
    #[must_use]
    pub const fn with_cross_partition_policy(mut self, policy: CrossPartitionPolicy) -> Self {
        self.cross_partition_policy = policy;
        self
    }
}

/// Configuration for the simulated network.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Simulated latency per call.
    ///
    /// Used for latency experiments. None means no delay.
    /// Default: None
    pub simulated_delay: Option<Duration>,

    /// Calls slower than this fail with `NeighborUnreachable`.
    ///
    /// Default: 5 seconds
    pub call_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            simulated_delay: None,
            call_timeout: Duration::from_secs(5),
        }
    }
}

impl NetworkConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated latency.
    #[must_use]
    pub const fn with_simulated_delay(mut self, delay: Duration) -> Self {
        self.simulated_delay = Some(delay);
        self
    }

    /// Sets the call timeout.
    #[must_use]
    pub const fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}
