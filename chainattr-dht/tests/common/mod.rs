//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chainattr::{AttributeKey, AttributeValue, NodeLabel, NodeRef, PartitionId};
use chainattr_dht::{DhtNode, NodeConfig, SimulatedNetwork};
use tracing_subscriber::EnvFilter;

pub const CHAIN_A: PartitionId = PartitionId::new(31337);
pub const CHAIN_B: PartitionId = PartitionId::new(31338);

/// Routes `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn key(name: &str) -> AttributeKey {
    AttributeKey::parse(name).unwrap()
}

pub fn value(text: &str) -> AttributeValue {
    AttributeValue::from_text(text).unwrap()
}

pub fn label(text: &str) -> NodeLabel {
    NodeLabel::from_text(text).unwrap()
}

pub fn node(partition: PartitionId, seed: &str) -> DhtNode {
    node_with(partition, seed, NodeConfig::default())
}

pub fn node_with(partition: PartitionId, seed: &str, config: NodeConfig) -> DhtNode {
    DhtNode::builder(partition, NodeRef::derive(seed))
        .label(label(seed))
        .config(config)
        .build()
}

/// Makes `to` a neighbor of `from` (one direction only).
pub fn link(from: &DhtNode, to: &DhtNode) {
    from.add_neighbor(to.node_ref(), *to.label(), to.coordinate());
}

/// Five nodes on one chain, linked as:
///
/// ```text
/// node1 -> 2, 3, 4
/// node2 -> 1, 3, 5
/// node3 -> 1, 2, 4, 5
/// node4 -> 1, 3, 5
/// node5 -> 2, 3, 4
/// ```
///
/// Seeded with `protection` on node1, `name` on node2 and `description`
/// on node5, then `material` stored on node1 and `color` on node2.
pub fn mesh(network: &SimulatedNetwork) -> Vec<Arc<DhtNode>> {
    mesh_with(network, &NodeConfig::default())
}

pub fn mesh_with(network: &SimulatedNetwork, config: &NodeConfig) -> Vec<Arc<DhtNode>> {
    let seeded = |seed: &str, attributes: &[(&str, &str)]| {
        let builder = DhtNode::builder(CHAIN_A, NodeRef::derive(seed))
            .label(label(&format!("DHT{seed}")))
            .config(config.clone());
        let builder = attributes
            .iter()
            .fold(builder, |b, (k, v)| b.attribute(key(k), value(v)));
        network.add_node(builder.build())
    };

    let nodes = vec![
        seeded("node1", &[("protection", "100")]),
        seeded("node2", &[("name", "NMT on DHTnode2")]),
        seeded("node3", &[]),
        seeded("node4", &[]),
        seeded("node5", &[("description", "This is a dnmt description")]),
    ];

    let edges: [&[usize]; 5] = [&[2, 3, 4], &[1, 3, 5], &[1, 2, 4, 5], &[1, 3, 5], &[2, 3, 4]];
    for (from, targets) in edges.iter().enumerate() {
        for to in *targets {
            link(&nodes[from], &nodes[to - 1]);
        }
    }

    nodes[0].store_attribute_local(key("material"), value("leather"));
    nodes[1].store_attribute_local(key("color"), value("red"));
    nodes
}

/// Builds `count` nodes on one chain and joins them into a ring in the
/// order 1 (alone), 2 via 1, 3 via 1, then each later node via the node
/// two places before it.
pub fn ring(network: &SimulatedNetwork, count: usize) -> Vec<Arc<DhtNode>> {
    let nodes: Vec<_> = (1..=count)
        .map(|i| network.add_node(node(CHAIN_A, &format!("node{i}"))))
        .collect();

    for (i, joining) in nodes.iter().enumerate() {
        let introducer = match i {
            0..=2 => &nodes[0],
            _ => &nodes[i - 2],
        };
        joining
            .join_network(network, introducer.node_ref())
            .unwrap();
    }
    nodes
}

/// The node whose ring position is the first at or after `key`'s.
pub fn expected_owner(nodes: &[Arc<DhtNode>], key: &AttributeKey) -> NodeRef {
    let position = chainattr::RingId::of_key(key);
    let mut sorted: Vec<_> = nodes.iter().map(|n| (n.ring_id(), n.node_ref())).collect();
    sorted.sort();
    sorted
        .iter()
        .find(|(id, _)| *id >= position)
        .or_else(|| sorted.first())
        .map(|(_, node_ref)| *node_ref)
        .unwrap()
}
