//! Chord ring operations: joining, stabilization, and keyed storage.
//!
//! Routing is iterative: the originating node asks one peer at a time
//! for the next step and keeps the hop count itself, so a broken or
//! looping ring surfaces as `RoutingIncomplete` instead of a hang.

use chainattr::{AttributeKey, AttributeValue, NodeRef, RingId};
use tracing::{debug, info, info_span, trace, warn};

use crate::{
    DhtError, DhtNode, Request, Response, RingPeer, RouteOutcome, RouteStep, StabilizeReport,
    Transport,
};

impl DhtNode {
    /// Joins the ring through `introducer`.
    ///
    /// Joining through this node's own address forms a singleton ring; doing
    /// so again is a no-op. Otherwise the walk finds the owner of this
    /// node's position, which becomes the successor, and its former
    /// predecessor becomes this node's predecessor. Both neighbors are told
    /// about the new node. Keys are not handed over: values stored before
    /// the join stay where they are until written again.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::RoutingIncomplete` if the introducer or the walk
    /// cannot be completed. The node is then left uninitialized.
    pub fn join_network(&self, transport: &dyn Transport, introducer: NodeRef) -> Result<(), DhtError> {
        let span = info_span!("join", node = %self.node_ref(), introducer = %introducer);
        let _entered = span.enter();

        if self.read_ring().is_joined() {
            debug!("already part of a ring");
            return Ok(());
        }

        if introducer == self.node_ref() {
            self.write_ring().bootstrap();
            return Ok(());
        }

        let me = RingPeer::new(self.node_ref());
        let outcome = self.route(transport, introducer, me.id())?;
        let successor = outcome.owner;
        if successor == me {
            return Err(DhtError::routing_incomplete(
                me.id().to_string(),
                "ring already claims this node's position",
            ));
        }

        let predecessor = match transport.call(&successor.node_ref(), Request::GetPredecessor) {
            Ok(Response::Predecessor(predecessor)) => predecessor,
            Ok(other) => {
                return Err(DhtError::internal(format!(
                    "unexpected predecessor response: {other:?}"
                )));
            }
            Err(err) => {
                return Err(DhtError::routing_incomplete(
                    me.id().to_string(),
                    format!("successor {successor} did not answer: {err}"),
                ));
            }
        };

        self.write_ring().splice(successor, predecessor);

        if let Err(err) = transport.call(&successor.node_ref(), Request::Notify { candidate: me }) {
            warn!(successor = %successor, error = %err, "could not notify successor");
        }
        if let Some(predecessor) = predecessor.filter(|p| *p != me) {
            let request = Request::AdoptSuccessor { candidate: me };
            if let Err(err) = transport.call(&predecessor.node_ref(), request) {
                warn!(predecessor = %predecessor, error = %err, "could not update predecessor");
            }
        }

        info!(successor = %successor, hops = outcome.hops, "joined network");
        Ok(())
    }

    /// Runs one round of ring maintenance.
    ///
    /// Adopts the successor's predecessor as successor when it sits between
    /// the two nodes, notifies the successor, and refreshes
    /// [`NodeConfig::fingers_per_stabilize`](crate::NodeConfig::fingers_per_stabilize)
    /// finger entries round-robin. Never fails: unreachable peers are
    /// counted in the report and retried next round. Does nothing before
    /// the node has joined.
    pub fn stabilize(&self, transport: &dyn Transport) -> StabilizeReport {
        let mut report = StabilizeReport::default();
        let (me, successor) = {
            let ring = self.read_ring();
            if !ring.is_joined() {
                return report;
            }
            (ring.me(), ring.successor())
        };

        let candidate = if successor == me {
            self.read_ring().predecessor()
        } else {
            match transport.call(&successor.node_ref(), Request::GetPredecessor) {
                Ok(Response::Predecessor(predecessor)) => predecessor,
                Ok(other) => {
                    warn!(successor = %successor, response = ?other, "unexpected predecessor response");
                    report.errors += 1;
                    None
                }
                Err(err) => {
                    warn!(successor = %successor, error = %err, "successor unreachable during stabilize");
                    report.errors += 1;
                    None
                }
            }
        };

        if let Some(candidate) = candidate {
            report.successor_changed = self.write_ring().adopt_successor(candidate);
        }

        let successor = self.read_ring().successor();
        if successor != me {
            match transport.call(&successor.node_ref(), Request::Notify { candidate: me }) {
                Ok(_) => report.notified = true,
                Err(err) => {
                    warn!(successor = %successor, error = %err, "could not notify successor");
                    report.errors += 1;
                }
            }
        }

        let indices = self
            .write_ring()
            .next_finger_indices(self.config().fingers_per_stabilize);
        for index in indices {
            let start = self.read_ring().finger_start(index);
            match self.route(transport, self.node_ref(), start) {
                Ok(outcome) => {
                    trace!(index, finger = %outcome.owner, "finger refreshed");
                    self.write_ring().set_finger(index, outcome.owner);
                    report.fingers_refreshed += 1;
                }
                Err(err) => {
                    debug!(index, error = %err, "finger refresh failed");
                    report.errors += 1;
                }
            }
        }

        self.write_ring().mark_stable();
        debug!(
            node = %self.node_ref(),
            successor_changed = report.successor_changed,
            fingers_refreshed = report.fingers_refreshed,
            errors = report.errors,
            "stabilized"
        );
        report
    }

    /// Finds the ring owner of `key`.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::RoutingIncomplete` if this node has not joined,
    /// a hop is unreachable, or the walk exceeds
    /// [`NodeConfig::max_route_hops`](crate::NodeConfig::max_route_hops).
    pub fn find_owner(&self, transport: &dyn Transport, key: &AttributeKey) -> Result<RouteOutcome, DhtError> {
        self.route(transport, self.node_ref(), RingId::of_key(key))
    }

    /// Stores `value` at the ring owner of `key`.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::RoutingIncomplete` if the owner cannot be found
    /// or does not accept the write.
    pub fn store_data(
        &self,
        transport: &dyn Transport,
        key: AttributeKey,
        value: AttributeValue,
    ) -> Result<RouteOutcome, DhtError> {
        let outcome = self.find_owner(transport, &key)?;
        let owner = outcome.owner.node_ref();

        if owner == self.node_ref() {
            self.store_attribute_local(key, value);
        } else {
            debug!(key = %key, owner = %owner, "storing at ring owner");
            let target = key.to_string();
            match transport.call(&owner, Request::StoreLocal { key, value }) {
                Ok(Response::Ack) => {}
                Ok(other) => {
                    return Err(DhtError::internal(format!(
                        "unexpected store response: {other:?}"
                    )));
                }
                Err(err) => {
                    return Err(DhtError::routing_incomplete(
                        target,
                        format!("owner {owner} rejected the write: {err}"),
                    ));
                }
            }
        }
        Ok(outcome)
    }

    /// Reads the value of `key` from its ring owner.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::DataNotFound` if the owner holds no value for the
    /// key, or `DhtError::RoutingIncomplete` if the owner cannot be reached.
    pub fn get_data(&self, transport: &dyn Transport, key: &AttributeKey) -> Result<AttributeValue, DhtError> {
        let owner = self.find_owner(transport, key)?.owner.node_ref();

        let record = if owner == self.node_ref() {
            self.attribute_record(key)
        } else {
            match transport.call(&owner, Request::GetLocal { key: key.clone() }) {
                Ok(Response::Found(record)) => Some(record),
                Ok(Response::Absent) => None,
                Ok(other) => {
                    return Err(DhtError::internal(format!(
                        "unexpected read response: {other:?}"
                    )));
                }
                Err(err) => {
                    return Err(DhtError::routing_incomplete(
                        key.as_str(),
                        format!("owner {owner} did not answer: {err}"),
                    ));
                }
            }
        };

        record
            .and_then(|record| record.value().copied())
            .ok_or_else(|| DhtError::data_not_found(key.as_str()))
    }

    /// Walks the ring from `start` to the owner of `target`.
    pub(crate) fn route(
        &self,
        transport: &dyn Transport,
        start: NodeRef,
        target: RingId,
    ) -> Result<RouteOutcome, DhtError> {
        let max_hops = self.config().max_route_hops;
        let mut current = start;
        let mut hops = 0;

        loop {
            let step = if current == self.node_ref() {
                self.next_hop(&target)?
            } else {
                match transport.call(&current, Request::FindSuccessorStep { target }) {
                    Ok(Response::Step(step)) => step,
                    Ok(other) => {
                        return Err(DhtError::internal(format!(
                            "unexpected routing response: {other:?}"
                        )));
                    }
                    Err(err) => {
                        return Err(DhtError::routing_incomplete(
                            target.to_string(),
                            format!("hop {current} failed: {err}"),
                        ));
                    }
                }
            };

            match step {
                RouteStep::Owner(owner) => return Ok(RouteOutcome::new(owner, hops)),
                RouteStep::Forward(next) => {
                    if next.node_ref() == current {
                        return Err(DhtError::routing_incomplete(
                            target.to_string(),
                            format!("{current} forwarded to itself"),
                        ));
                    }
                    hops += 1;
                    debug!(target_id = %target, from = %current, to = %next, hops, "routing step");
                    if hops > max_hops {
                        return Err(DhtError::routing_incomplete(
                            target.to_string(),
                            format!("exceeded {max_hops} hops"),
                        ));
                    }
                    current = next.node_ref();
                }
            }
        }
    }
}
