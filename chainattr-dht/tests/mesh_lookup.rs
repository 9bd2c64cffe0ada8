//! Neighbor lookups across a five-node mesh on one chain.

mod common;

use chainattr::NodeRef;
use chainattr_dht::{DhtError, NodeConfig, SimulatedNetwork};

use common::{init_tracing, key, mesh, mesh_with, value};

#[test]
fn local_attribute_is_answered_without_forwarding() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh(&network);

    let record = nodes[0]
        .get_distributed_attribute(&network, &key("material"))
        .unwrap();

    assert_eq!(record.value(), Some(&value("leather")));
    assert_eq!(record.coordinate().node_ref(), NodeRef::derive("node1"));
    assert!(record.coordinate().is_local());
    assert_eq!(network.stats().calls, 0);
}

#[test]
fn neighbor_attribute_is_found() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh(&network);

    let record = nodes[0]
        .get_distributed_attribute(&network, &key("color"))
        .unwrap();

    assert_eq!(record.value(), Some(&value("red")));
    assert_eq!(record.coordinate().node_ref(), NodeRef::derive("node2"));
    assert!(record.coordinate().is_local());
}

#[test]
fn seeded_attribute_two_hops_away_is_found() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh(&network);

    // node1 has no direct edge to node5
    let record = nodes[0]
        .get_distributed_attribute(&network, &key("description"))
        .unwrap();

    assert_eq!(record.value(), Some(&value("This is a dnmt description")));
    assert_eq!(record.coordinate().node_ref(), NodeRef::derive("node5"));
}

#[test]
fn every_node_finds_every_attribute() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh(&network);

    let expected = [
        ("protection", "100", "node1"),
        ("material", "leather", "node1"),
        ("name", "NMT on DHTnode2", "node2"),
        ("color", "red", "node2"),
        ("description", "This is a dnmt description", "node5"),
    ];

    for node in &nodes {
        for (name, text, holder) in expected {
            let record = node.get_distributed_attribute(&network, &key(name)).unwrap();
            assert_eq!(record.value(), Some(&value(text)), "{name} from {}", node.label());
            assert_eq!(record.coordinate().node_ref(), NodeRef::derive(holder));
        }
    }
}

#[test]
fn missing_attribute_consults_every_node_once() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh(&network);

    let err = nodes[0]
        .get_distributed_attribute(&network, &key("weight"))
        .unwrap_err();

    assert_eq!(err, DhtError::attribute_not_found("weight", 5));
    // One forward per node other than the origin
    assert_eq!(network.stats().calls, 4);
}

#[test]
fn zero_hop_budget_stays_local() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh_with(&network, &NodeConfig::new().with_max_hops(0));

    let err = nodes[0]
        .get_distributed_attribute(&network, &key("color"))
        .unwrap_err();

    assert_eq!(err, DhtError::attribute_not_found("color", 1));
    assert_eq!(network.stats().calls, 0);
}

#[test]
fn one_hop_budget_reaches_direct_neighbors_only() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh_with(&network, &NodeConfig::new().with_max_hops(1));

    let color = nodes[0].get_distributed_attribute(&network, &key("color"));
    let description = nodes[0].get_distributed_attribute(&network, &key("description"));

    assert!(color.is_ok());
    assert!(matches!(description, Err(DhtError::AttributeNotFound { .. })));
}

#[test]
fn local_lookup_does_not_search() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh(&network);

    let err = nodes[0].get_attribute_value(&key("color")).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(network.stats().calls, 0);
}

#[test]
fn overwritten_value_is_returned() {
    init_tracing();
    let network = SimulatedNetwork::with_defaults();
    let nodes = mesh(&network);

    nodes[1].store_attribute_local(key("color"), value("blue"));

    let record = nodes[3]
        .get_distributed_attribute(&network, &key("color"))
        .unwrap();
    assert_eq!(record.value(), Some(&value("blue")));
}
