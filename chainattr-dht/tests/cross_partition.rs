//! Lookups that meet neighbors living on another chain.

mod common;

use chainattr::{Coordinate, NodeRef};
use chainattr_dht::{CrossPartitionPolicy, DhtError, NodeConfig, SimulatedNetwork};

use common::{CHAIN_A, CHAIN_B, init_tracing, key, link, node, node_with, value};

#[test]
fn closest_node_prefers_same_chain() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let origin = network.add_node(node(CHAIN_A, "node1"));
    let remote = network.add_node(node(CHAIN_B, "nodeRemote"));
    let local = network.add_node(node(CHAIN_A, "nodeLocal"));

    link(&origin, &remote);
    link(&origin, &local);

    assert_eq!(
        origin.find_closest_node(&key("material")),
        Some(local.node_ref())
    );
    assert!(!origin.neighbor(&remote.node_ref()).unwrap().is_local());
    assert!(origin.neighbor(&local.node_ref()).unwrap().is_local());
}

#[test]
fn foreign_neighbor_is_surfaced_not_contacted() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let origin = network.add_node(node(CHAIN_A, "node1"));
    let local = network.add_node(node(CHAIN_A, "nodeLocal"));
    let remote = network.add_node(node(CHAIN_B, "nodeRemote"));
    remote.store_attribute_local(key("material"), value("leather"));

    link(&origin, &remote);
    link(&origin, &local);

    let record = origin
        .get_distributed_attribute(&network, &key("material"))
        .unwrap();

    assert!(record.is_pointer());
    assert_eq!(record.coordinate().partition(), CHAIN_B);
    assert_eq!(record.coordinate().node_ref(), remote.node_ref());
    assert!(!record.coordinate().is_local());
    // Only nodeLocal was asked
    assert_eq!(network.stats().calls, 1);
}

#[test]
fn stop_policy_ignores_foreign_neighbors() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let config = NodeConfig::new().with_cross_partition_policy(CrossPartitionPolicy::Stop);
    let origin = network.add_node(node_with(CHAIN_A, "node1", config));
    let remote = network.add_node(node(CHAIN_B, "nodeRemote"));
    link(&origin, &remote);

    let err = origin
        .get_distributed_attribute(&network, &key("material"))
        .unwrap_err();

    assert_eq!(err, DhtError::attribute_not_found("material", 1));
    assert_eq!(network.stats().calls, 0);
}

#[test]
fn value_beats_pointer() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let origin = network.add_node(node(CHAIN_A, "node1"));
    let pointing = network.add_node(node(CHAIN_A, "node2"));
    let holding = network.add_node(node(CHAIN_A, "node3"));

    pointing.store_attribute_remote(
        key("color"),
        Coordinate::foreign(CHAIN_B, NodeRef::derive("elsewhere")),
    );
    holding.store_attribute_local(key("color"), value("red"));
    link(&origin, &pointing);
    link(&origin, &holding);

    let record = origin
        .get_distributed_attribute(&network, &key("color"))
        .unwrap();

    assert_eq!(record.value(), Some(&value("red")));
    assert_eq!(record.coordinate().node_ref(), holding.node_ref());
}

#[test]
fn peer_pointer_beats_foreign_neighbor() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let origin = network.add_node(node(CHAIN_A, "node1"));
    let pointing = network.add_node(node(CHAIN_A, "node2"));
    let remote = network.add_node(node(CHAIN_B, "nodeRemote"));

    let target = Coordinate::foreign(CHAIN_B, NodeRef::derive("holder"));
    pointing.store_attribute_remote(key("color"), target);
    link(&origin, &remote);
    link(&origin, &pointing);

    let record = origin
        .get_distributed_attribute(&network, &key("color"))
        .unwrap();

    assert!(record.is_pointer());
    assert_eq!(record.coordinate().node_ref(), NodeRef::derive("holder"));
}

#[test]
fn own_pointer_is_returned_as_is() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let origin = network.add_node(node(CHAIN_A, "node1"));
    let holding = network.add_node(node(CHAIN_A, "node2"));
    holding.store_attribute_local(key("color"), value("red"));
    link(&origin, &holding);

    let target = Coordinate::foreign(CHAIN_B, NodeRef::derive("holder"));
    origin.store_attribute_remote(key("color"), target);

    let record = origin
        .get_distributed_attribute(&network, &key("color"))
        .unwrap();

    assert!(record.is_pointer());
    assert_eq!(*record.coordinate(), target);
    assert_eq!(network.stats().calls, 0);
}

#[test]
fn remote_pointer_reads_back_without_value() {
    init_tracing();
    let origin = node(CHAIN_A, "node1");
    let target = Coordinate::foreign(CHAIN_B, NodeRef::derive("nodeRemote"));

    origin.store_attribute_remote(key("material"), target);

    let (stored, coordinate) = origin.get_attribute_value(&key("material")).unwrap();
    assert!(stored.is_none());
    assert_eq!(coordinate, target);
}

#[test]
fn foreign_only_topology_yields_pointer_for_any_key() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let origin = network.add_node(node(CHAIN_A, "node1"));
    let first = network.add_node(node(CHAIN_B, "b1"));
    let second = network.add_node(node(CHAIN_B, "b2"));
    link(&origin, &first);
    link(&origin, &second);

    for name in ["material", "color", "anything"] {
        let record = origin.get_distributed_attribute(&network, &key(name)).unwrap();
        assert_eq!(record.coordinate().node_ref(), first.node_ref());
    }
}
