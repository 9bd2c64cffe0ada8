//! Node-to-node requests and responses.

use std::collections::BTreeSet;
use std::fmt;

use chainattr::{AttributeKey, AttributeValue, NodeRef, RingId};
use uuid::Uuid;

use crate::{AttributeRecord, RingPeer, RouteStep};

/// Correlates every hop of one distributed lookup in the logs.
///
/// Time-ordered (`UUIDv7`), so ids sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A neighbor lookup travelling between nodes.
///
/// Carries the set of nodes that already handled the search and the
/// number of forwards still allowed. Both only grow or shrink
/// monotonically, which bounds every search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupRequest {
    request_id: RequestId,
    key: AttributeKey,
    visited: BTreeSet<NodeRef>,
    hops_remaining: u32,
}

impl LookupRequest {
    /// Starts a new search.
    #[must_use]
    pub fn new(key: AttributeKey, max_hops: u32) -> Self {
        Self {
            request_id: RequestId::new(),
            key,
            visited: BTreeSet::new(),
            hops_remaining: max_hops,
        }
    }

    /// Returns the request id.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the key being searched.
    #[must_use]
    pub const fn key(&self) -> &AttributeKey {
        &self.key
    }

    /// Returns the remaining forward budget.
    #[must_use]
    pub const fn hops_remaining(&self) -> u32 {
        self.hops_remaining
    }

    /// Returns the nodes that already handled this search.
    #[must_use]
    pub const fn visited(&self) -> &BTreeSet<NodeRef> {
        &self.visited
    }

    /// Returns true if `node` already handled this search.
    #[must_use]
    pub fn has_visited(&self, node: &NodeRef) -> bool {
        self.visited.contains(node)
    }

    /// Records `node` as visited.
    pub fn visit(&mut self, node: NodeRef) {
        self.visited.insert(node);
    }

    /// Folds in nodes visited by a finished branch.
    pub fn merge_visited(&mut self, visited: impl IntoIterator<Item = NodeRef>) {
        self.visited.extend(visited);
    }

    /// Consumes the request, returning the visited set.
    #[must_use]
    pub fn into_visited(self) -> BTreeSet<NodeRef> {
        self.visited
    }

    /// Returns the copy sent one hop further, or `None` if the budget is
    /// spent.
    #[must_use]
    pub fn forwarded(&self) -> Option<Self> {
        let hops_remaining = self.hops_remaining.checked_sub(1)?;
        Some(Self {
            hops_remaining,
            ..self.clone()
        })
    }
}

/// A request one node sends another.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Request {
    /// Continue a neighbor lookup.
    Lookup(LookupRequest),
    /// Read a record from the receiver's own store.
    GetLocal {
        /// The key to read
        key: AttributeKey,
    },
    /// Write a value into the receiver's own store.
    StoreLocal {
        /// The key to write
        key: AttributeKey,
        /// The value to write
        value: AttributeValue,
    },
    /// Ask for one step of a ring walk.
    FindSuccessorStep {
        /// The ring position being routed to
        target: RingId,
    },
    /// Ask for the receiver's predecessor.
    GetPredecessor,
    /// Suggest the sender as the receiver's predecessor.
    Notify {
        /// The suggested predecessor
        candidate: RingPeer,
    },
    /// Suggest a newly joined node as the receiver's successor.
    AdoptSuccessor {
        /// The suggested successor
        candidate: RingPeer,
    },
    /// Liveness probe.
    Ping,
}

impl Request {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Lookup(_) => "lookup",
            Self::GetLocal { .. } => "get_local",
            Self::StoreLocal { .. } => "store_local",
            Self::FindSuccessorStep { .. } => "find_successor_step",
            Self::GetPredecessor => "get_predecessor",
            Self::Notify { .. } => "notify",
            Self::AdoptSuccessor { .. } => "adopt_successor",
            Self::Ping => "ping",
        }
    }
}

/// The answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Response {
    /// A value or pointer for the requested key.
    Found(AttributeRecord),
    /// A lookup branch ended on a pointer; carries every node it visited
    /// so the caller does not search them again.
    Pointer {
        /// The value-less record
        record: AttributeRecord,
        /// Nodes that handled the branch
        visited: BTreeSet<NodeRef>,
    },
    /// A lookup branch finished empty; carries every node it visited.
    Miss {
        /// Nodes that handled the branch
        visited: BTreeSet<NodeRef>,
    },
    /// The receiver holds no record for the key.
    Absent,
    /// One step of a ring walk.
    Step(RouteStep),
    /// The receiver's predecessor.
    Predecessor(Option<RingPeer>),
    /// The request was applied.
    Ack,
    /// Answer to `Ping`.
    Pong,
}
