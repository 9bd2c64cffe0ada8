//! Error types for DHT operations.

use std::fmt;

/// Errors that can occur during DHT operations.
///
/// None of these leave node state partially modified. The single
/// documented side effect is that a neighbor which answers with
/// [`DhtError::NeighborUnreachable`] during a lookup is deactivated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtError {
    /// The key has no record on this node (strictly local lookup).
    NotFound {
        /// The key that was not found
        key: String,
    },
    /// A distributed search finished without a result.
    AttributeNotFound {
        /// The key that was searched for
        key: String,
        /// Number of nodes that handled the search
        consulted: usize,
    },
    /// The ring walk could not reach the owner of a position.
    ///
    /// Usually transient: retry after `stabilize`.
    RoutingIncomplete {
        /// The ring position or key being routed to
        target: String,
        /// Why routing stopped
        reason: String,
    },
    /// The owner of a key holds no value for it.
    DataNotFound {
        /// The key that was not found
        key: String,
    },
    /// A peer did not answer in time or is partitioned away.
    NeighborUnreachable {
        /// The unreachable node
        node: String,
    },
    /// No node is registered under the address.
    UnknownNode {
        /// The unknown node address
        node: String,
    },
    /// Internal error (should not happen in production).
    Internal {
        /// Error message
        message: String,
    },
}

impl fmt::Display for DhtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { key } => {
                write!(f, "attribute '{key}' not found on this node")
            }
            Self::AttributeNotFound { key, consulted } => {
                write!(
                    f,
                    "attribute '{key}' not found after consulting {consulted} node(s)"
                )
            }
            Self::RoutingIncomplete { target, reason } => {
                write!(
                    f,
                    "routing to {target} incomplete: {reason}; retry after stabilization"
                )
            }
            Self::DataNotFound { key } => {
                write!(f, "data for '{key}' not found at its ring owner")
            }
            Self::NeighborUnreachable { node } => {
                write!(f, "node {node} is unreachable")
            }
            Self::UnknownNode { node } => {
                write!(f, "no node registered at {node}")
            }
            Self::Internal { message } => {
                write!(f, "internal DHT error: {message}")
            }
        }
    }
}

impl std::error::Error for DhtError {}

impl DhtError {
    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates an `AttributeNotFound` error.
    #[must_use]
    pub fn attribute_not_found(key: impl Into<String>, consulted: usize) -> Self {
        Self::AttributeNotFound {
            key: key.into(),
            consulted,
        }
    }

    /// Creates a `RoutingIncomplete` error.
    #[must_use]
    pub fn routing_incomplete(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RoutingIncomplete {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `DataNotFound` error.
    #[must_use]
    pub fn data_not_found(key: impl Into<String>) -> Self {
        Self::DataNotFound { key: key.into() }
    }

    /// Creates a `NeighborUnreachable` error.
    #[must_use]
    pub fn neighbor_unreachable(node: impl Into<String>) -> Self {
        Self::NeighborUnreachable { node: node.into() }
    }

    /// Creates an `UnknownNode` error.
    #[must_use]
    pub fn unknown_node(node: impl Into<String>) -> Self {
        Self::UnknownNode { node: node.into() }
    }

    /// Creates an `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true for a strictly local miss.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the peer could not be reached at all.
    ///
    /// Lookups treat this exactly like "this neighbor has no answer".
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::NeighborUnreachable { .. } | Self::UnknownNode { .. }
        )
    }

    /// Returns true if retrying later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RoutingIncomplete { .. } | Self::NeighborUnreachable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error_display() {
        let err = DhtError::not_found("material");
        assert!(err.to_string().contains("'material' not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn attribute_not_found_counts_nodes() {
        let err = DhtError::attribute_not_found("color", 2);
        assert!(err.to_string().contains("2 node(s)"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn routing_incomplete_is_retryable() {
        let err = DhtError::routing_incomplete("abcd...", "hop budget exhausted");
        assert!(err.is_retryable());
        assert!(err.to_string().contains("hop budget exhausted"));
    }

    #[test]
    fn data_not_found_is_not_retryable() {
        assert!(!DhtError::data_not_found("name").is_retryable());
    }

    #[test]
    fn unreachable_and_unknown_nodes_count_as_unreachable() {
        assert!(DhtError::neighbor_unreachable("0x01").is_unreachable());
        assert!(DhtError::unknown_node("0x01").is_unreachable());
        assert!(!DhtError::internal("boom").is_unreachable());
    }
}
