//! Transport trait definition for node-to-node calls.

use chainattr::NodeRef;

use crate::{DhtError, Request, Response};

/// Delivers requests between nodes.
///
/// Implementations may be in-process (for testing/evaluation) or carried
/// over a real network. Node operations take the transport as an
/// argument rather than owning it, so a transport may itself own the
/// nodes it delivers to.
///
/// # Async Considerations
///
/// This trait uses synchronous methods for simplicity in the simulated
/// implementation. For async/distributed implementations, wrap in a
/// runtime-specific async layer.
pub trait Transport: Send + Sync {
    /// Sends `request` to `target` and waits for its answer.
    ///
    /// # Errors
    ///
    /// Returns `DhtError` if:
    /// - The target does not answer in time or is cut off (`NeighborUnreachable`)
    /// - No node exists at the address (`UnknownNode`)
    /// - The target failed to handle the request (any error it returns)
    fn call(&self, target: &NodeRef, request: Request) -> Result<Response, DhtError>;
}
