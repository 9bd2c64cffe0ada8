//! Chord ring state: successor, predecessor, and finger table.
//!
//! A node's position is the SHA-256 of its address. The owner of a key
//! is the first node at or clockwise after the key's position:
//!
//! ```text
//! owner(k) = successor(SHA256(k))
//! ```
//!
//! Finger `i` caches `successor(id + 2^i)` so a walk halves the remaining
//! distance per hop once the table is refreshed.

use std::fmt;

use chainattr::{NodeRef, RING_BITS, RingId};
use tracing::{debug, info};

/// A ring member: its address and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingPeer {
    id: RingId,
    node_ref: NodeRef,
}

impl RingPeer {
    /// Creates a peer, deriving its position from `node_ref`.
    #[must_use]
    pub fn new(node_ref: NodeRef) -> Self {
        Self {
            id: RingId::of_node(&node_ref),
            node_ref,
        }
    }

    /// Returns the ring position.
    #[must_use]
    pub const fn id(&self) -> RingId {
        self.id
    }

    /// Returns the address.
    #[must_use]
    pub const fn node_ref(&self) -> NodeRef {
        self.node_ref
    }
}

impl fmt::Display for RingPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.node_ref, self.id)
    }
}

/// Lifecycle of a node's ring membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RingPhase {
    /// Not part of any ring; ring operations fail.
    #[default]
    Uninitialized,
    /// Spliced in; fingers not yet refreshed.
    Joined,
    /// At least one stabilization round has completed.
    Stable,
}

/// One step of an iterative ring walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteStep {
    /// The target is owned by this peer.
    Owner(RingPeer),
    /// Ask this peer next.
    Forward(RingPeer),
}

/// Read-only view of a node's ring state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingSnapshot {
    /// This node.
    pub peer: RingPeer,
    /// Membership phase.
    pub phase: RingPhase,
    /// Next node clockwise.
    pub successor: RingPeer,
    /// Previous node, if known.
    pub predecessor: Option<RingPeer>,
    /// Number of finger entries that hold a peer.
    pub fingers_populated: usize,
}

/// Mutable ring state of one node.
///
/// Purely local bookkeeping: deciding the next hop or adopting a peer
/// never performs I/O. [`DhtNode`](crate::DhtNode) holds this behind a
/// lock and releases it before contacting other nodes.
#[derive(Debug, Clone)]
pub struct RingState {
    me: RingPeer,
    phase: RingPhase,
    successor: RingPeer,
    predecessor: Option<RingPeer>,
    fingers: Vec<Option<RingPeer>>,
    next_finger: usize,
}

impl RingState {
    /// Creates uninitialized state for `node_ref`.
    #[must_use]
    pub fn new(node_ref: NodeRef) -> Self {
        let me = RingPeer::new(node_ref);
        Self {
            me,
            phase: RingPhase::Uninitialized,
            successor: me,
            predecessor: None,
            fingers: vec![None; RING_BITS],
            next_finger: 0,
        }
    }

    /// Returns this node as a ring peer.
    #[must_use]
    pub const fn me(&self) -> RingPeer {
        self.me
    }

    /// Returns the membership phase.
    #[must_use]
    pub const fn phase(&self) -> RingPhase {
        self.phase
    }

    /// Returns the successor.
    #[must_use]
    pub const fn successor(&self) -> RingPeer {
        self.successor
    }

    /// Returns the predecessor, if known.
    #[must_use]
    pub const fn predecessor(&self) -> Option<RingPeer> {
        self.predecessor
    }

    /// Returns finger `index`.
    #[must_use]
    pub fn finger(&self, index: usize) -> Option<RingPeer> {
        self.fingers.get(index).copied().flatten()
    }

    /// Returns true if ring operations may run.
    #[must_use]
    pub fn is_joined(&self) -> bool {
        self.phase != RingPhase::Uninitialized
    }

    /// Forms a ring containing only this node.
    pub fn bootstrap(&mut self) {
        self.successor = self.me;
        self.predecessor = Some(self.me);
        self.fingers.fill(Some(self.me));
        self.phase = RingPhase::Joined;
        info!(node = %self.me, "formed singleton ring");
    }

    /// Splices this node in front of `successor`.
    ///
    /// Finger 0 is the successor; the rest fill in as `stabilize` runs.
    pub fn splice(&mut self, successor: RingPeer, predecessor: Option<RingPeer>) {
        self.successor = successor;
        self.predecessor = predecessor;
        self.fingers.fill(None);
        self.fingers[0] = Some(successor);
        self.next_finger = 0;
        self.phase = RingPhase::Joined;
        info!(node = %self.me, successor = %successor, "joined ring");
    }

    /// Marks a completed stabilization round.
    pub fn mark_stable(&mut self) {
        if self.phase == RingPhase::Joined {
            debug!(node = %self.me, "ring state stable");
            self.phase = RingPhase::Stable;
        }
    }

    /// Decides where a walk for `target` goes next.
    ///
    /// Returns `None` if this node has not joined a ring.
    #[must_use]
    pub fn next_hop(&self, target: &RingId) -> Option<RouteStep> {
        if !self.is_joined() {
            return None;
        }
        if target.in_half_open(&self.me.id, &self.successor.id) {
            return Some(RouteStep::Owner(self.successor));
        }
        let next = self
            .closest_preceding(target)
            .unwrap_or(self.successor);
        Some(RouteStep::Forward(next))
    }

    /// Returns the known peer closest before `target`, if any beats self.
    #[must_use]
    pub fn closest_preceding(&self, target: &RingId) -> Option<RingPeer> {
        self.fingers
            .iter()
            .rev()
            .flatten()
            .chain(std::iter::once(&self.successor))
            .find(|peer| peer.id.in_open(&self.me.id, target))
            .copied()
    }

    /// Considers `candidate` as predecessor.
    ///
    /// Adopted if no predecessor is known or the candidate lies strictly
    /// between the current predecessor and this node. Ignored before the
    /// node has joined. Returns true if adopted.
    pub fn notify(&mut self, candidate: RingPeer) -> bool {
        if candidate == self.me || !self.is_joined() {
            return false;
        }
        let adopt = match self.predecessor {
            None => true,
            Some(current) => candidate.id.in_open(&current.id, &self.me.id),
        };
        if adopt {
            debug!(node = %self.me, predecessor = %candidate, "predecessor updated");
            self.predecessor = Some(candidate);
        }
        adopt
    }

    /// Considers `candidate` as successor.
    ///
    /// Adopted if it lies strictly between this node and the current
    /// successor. Returns true if adopted.
    pub fn adopt_successor(&mut self, candidate: RingPeer) -> bool {
        if candidate == self.me || !self.is_joined() {
            return false;
        }
        let adopt = candidate.id.in_open(&self.me.id, &self.successor.id);
        if adopt {
            info!(node = %self.me, successor = %candidate, "successor updated");
            self.successor = candidate;
            self.fingers[0] = Some(candidate);
        }
        adopt
    }

    /// Returns the ring position finger `index` is responsible for.
    #[must_use]
    pub fn finger_start(&self, index: usize) -> RingId {
        self.me.id.add_power_of_two(index)
    }

    /// Records the owner of finger `index`.
    pub fn set_finger(&mut self, index: usize, peer: RingPeer) {
        if let Some(slot) = self.fingers.get_mut(index) {
            *slot = Some(peer);
        }
    }

    /// Returns the next `count` finger indices, round-robin.
    pub fn next_finger_indices(&mut self, count: usize) -> Vec<usize> {
        let count = count.min(RING_BITS);
        let indices = (0..count)
            .map(|offset| (self.next_finger + offset) % RING_BITS)
            .collect();
        self.next_finger = (self.next_finger + count) % RING_BITS;
        indices
    }

    /// Returns the number of populated fingers.
    #[must_use]
    pub fn fingers_populated(&self) -> usize {
        self.fingers.iter().flatten().count()
    }

    /// Returns a read-only snapshot.
    #[must_use]
    pub fn snapshot(&self) -> RingSnapshot {
        RingSnapshot {
            peer: self.me,
            phase: self.phase,
            successor: self.successor,
            predecessor: self.predecessor,
            fingers_populated: self.fingers_populated(),
        }
    }
}
