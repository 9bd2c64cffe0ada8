//! Neighbor lookup: choosing whom to ask and walking the neighbor graph.
//!
//! A lookup answers from the local store when it can. Otherwise it asks
//! same-partition neighbors one at a time, each of which runs the same
//! procedure with the shared visited set and one hop less to spend.
//! Foreign-partition neighbors are never contacted; at most one of them
//! is surfaced as a pointer when nothing better turns up.

use chainattr::{AttributeKey, NodeRef, RingId};
use tracing::{debug, debug_span, trace, warn};

use crate::{
    AttributeRecord, CrossPartitionPolicy, DhtError, DhtNode, LookupRequest, NeighborEntry,
    Request, Response, SelectionPolicy, Transport,
};

/// Orders neighbors by preference for `key`.
///
/// Same-partition neighbors come first, ordered by `policy`; foreign
/// neighbors follow in insertion order.
pub(crate) fn rank_neighbors(
    neighbors: &[NeighborEntry],
    key: &AttributeKey,
    policy: SelectionPolicy,
) -> Vec<NeighborEntry> {
    let (mut local, foreign): (Vec<_>, Vec<_>) =
        neighbors.iter().copied().partition(NeighborEntry::is_local);

    if policy == SelectionPolicy::ClosestOnRing {
        let position = RingId::of_key(key);
        local.sort_by_key(|n| position.distance_to(&RingId::of_node(&n.node_ref())));
    }

    local.extend(foreign);
    local
}

impl DhtNode {
    /// Picks the neighbor to ask about `key`.
    ///
    /// A same-partition neighbor is always preferred; a foreign one is
    /// chosen only when no local neighbor is active. Returns `None` when
    /// there are no active neighbors. Never performs I/O.
    #[must_use]
    pub fn find_closest_node(&self, key: &AttributeKey) -> Option<NodeRef> {
        rank_neighbors(&self.get_active_neighbors(), key, self.config().selection_policy)
            .first()
            .map(NeighborEntry::node_ref)
    }

    /// Finds `key` anywhere reachable through the neighbor graph.
    ///
    /// Returns the first record carrying a value. Failing that, the first
    /// pointer found (a stored pointer, or a foreign neighbor surfaced
    /// under [`CrossPartitionPolicy::SurfacePointer`]). Each node handles
    /// the search at most once and forwards are bounded by
    /// [`NodeConfig::max_hops`](crate::NodeConfig::max_hops), so the search
    /// terminates on any topology.
    ///
    /// An unreachable neighbor is deactivated and the search moves on.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::AttributeNotFound` if no node produced a value
    /// or pointer.
    pub fn get_distributed_attribute(
        &self,
        transport: &dyn Transport,
        key: &AttributeKey,
    ) -> Result<AttributeRecord, DhtError> {
        let mut request = LookupRequest::new(key.clone(), self.config().max_hops);
        let span = debug_span!(
            "lookup",
            request_id = %request.request_id(),
            origin = %self.node_ref(),
            key = %key,
        );
        let _entered = span.enter();

        if let Some(record) = self.walk(transport, &mut request) {
            debug!(
                coordinate = %record.coordinate(),
                has_value = !record.is_pointer(),
                consulted = request.visited().len(),
                "lookup resolved"
            );
            return Ok(record);
        }

        let consulted = request.visited().len();
        debug!(consulted, "lookup exhausted");
        Err(DhtError::attribute_not_found(key.as_str(), consulted))
    }

    /// Handles a lookup forwarded by another node.
    pub(crate) fn serve_lookup(&self, transport: &dyn Transport, mut request: LookupRequest) -> Response {
        if request.has_visited(&self.node_ref()) {
            trace!(node = %self.node_ref(), request_id = %request.request_id(), "already visited");
            return Response::Miss {
                visited: request.into_visited(),
            };
        }

        match self.walk(transport, &mut request) {
            Some(record) if record.is_pointer() => Response::Pointer {
                record,
                visited: request.into_visited(),
            },
            Some(record) => Response::Found(record),
            None => Response::Miss {
                visited: request.into_visited(),
            },
        }
    }

    fn walk(&self, transport: &dyn Transport, request: &mut LookupRequest) -> Option<AttributeRecord> {
        let me = self.node_ref();
        request.visit(me);

        if let Some(record) = self.attribute_record(request.key()) {
            trace!(node = %me, request_id = %request.request_id(), "answered from local store");
            return Some(record);
        }

        let ranked = rank_neighbors(
            &self.get_active_neighbors(),
            request.key(),
            self.config().selection_policy,
        );
        let (local, foreign): (Vec<_>, Vec<_>) =
            ranked.into_iter().partition(NeighborEntry::is_local);

        let mut fallback: Option<AttributeRecord> = None;
        for neighbor in local {
            let target = neighbor.node_ref();
            if request.has_visited(&target) {
                continue;
            }
            let Some(forwarded) = request.forwarded() else {
                debug!(node = %me, request_id = %request.request_id(), "hop budget exhausted");
                break;
            };

            debug!(
                request_id = %request.request_id(),
                from = %me,
                to = %target,
                hops_remaining = forwarded.hops_remaining(),
                "forwarding lookup"
            );
            match transport.call(&target, Request::Lookup(forwarded)) {
                Ok(Response::Found(record)) => {
                    let record = record.localized(self.resolver());
                    if !record.is_pointer() {
                        return Some(record);
                    }
                    request.visit(target);
                    fallback.get_or_insert(record);
                }
                Ok(Response::Pointer { record, visited }) => {
                    request.merge_visited(visited);
                    request.visit(target);
                    fallback.get_or_insert(record.localized(self.resolver()));
                }
                Ok(Response::Miss { visited }) => request.merge_visited(visited),
                Ok(other) => {
                    warn!(to = %target, response = ?other, "unexpected lookup response");
                    request.visit(target);
                }
                Err(err) if err.is_unreachable() => {
                    warn!(to = %target, error = %err, "neighbor unreachable, deactivating");
                    self.deactivate_neighbor(&target);
                    request.visit(target);
                }
                Err(err) => {
                    warn!(to = %target, error = %err, "lookup forward failed");
                    request.visit(target);
                }
            }
        }

        if fallback.is_some() {
            return fallback;
        }

        match self.config().cross_partition_policy {
            CrossPartitionPolicy::SurfacePointer => foreign.first().map(|neighbor| {
                debug!(
                    node = %me,
                    pointer = %neighbor.coordinate(),
                    "surfacing foreign neighbor"
                );
                AttributeRecord::pointer(request.key().clone(), *neighbor.coordinate())
            }),
            CrossPartitionPolicy::Stop => None,
        }
    }
}
