//! Property-based tests for neighbor lookups and ring ownership.
//!
//! Topologies are generated at random: a directed cycle through every node
//! (so each node can reach every other) plus arbitrary extra edges.

mod common;

use std::sync::Arc;

use proptest::prelude::*;

use chainattr_dht::{DhtError, DhtNode, SimulatedNetwork};

use common::{CHAIN_A, CHAIN_B, expected_owner, key, link, node, ring, value};

/// Strategies for generating topologies.
mod strategies {
    use super::*;

    /// Node count plus extra directed edges between existing nodes.
    pub fn topology() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (2..=10usize).prop_flat_map(|n| {
            let edges = prop::collection::vec((0..n, 0..n), 0..n * 2);
            (Just(n), edges)
        })
    }

    /// A lowercase attribute name.
    pub fn attribute_name() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[a-z]{1,16}").expect("valid regex")
    }
}

fn build(network: &SimulatedNetwork, n: usize, extra: &[(usize, usize)]) -> Vec<Arc<DhtNode>> {
    let nodes: Vec<_> = (0..n)
        .map(|i| network.add_node(node(CHAIN_A, &format!("peer{i}"))))
        .collect();
    for i in 0..n {
        link(&nodes[i], &nodes[(i + 1) % n]);
    }
    for (from, to) in extra {
        link(&nodes[*from], &nodes[*to]);
    }
    nodes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stored_value_is_always_found(
        (n, extra) in strategies::topology(),
        holder in any::<prop::sample::Index>(),
        origin in any::<prop::sample::Index>(),
    ) {
        let network = SimulatedNetwork::with_defaults();
        let nodes = build(&network, n, &extra);
        let holder = &nodes[holder.index(n)];
        holder.store_attribute_local(key("color"), value("red"));

        let record = nodes[origin.index(n)]
            .get_distributed_attribute(&network, &key("color"))
            .unwrap();

        prop_assert_eq!(record.value(), Some(&value("red")));
        prop_assert_eq!(record.coordinate().node_ref(), holder.node_ref());
    }

    #[test]
    fn missing_key_consults_each_node_once(
        (n, extra) in strategies::topology(),
        origin in any::<prop::sample::Index>(),
    ) {
        let network = SimulatedNetwork::with_defaults();
        let nodes = build(&network, n, &extra);

        let err = nodes[origin.index(n)]
            .get_distributed_attribute(&network, &key("weight"))
            .unwrap_err();

        prop_assert_eq!(err, DhtError::attribute_not_found("weight", n));
        prop_assert_eq!(network.stats().calls, (n - 1) as u64);
    }
}

proptest! {
    #[test]
    fn closest_node_is_local_when_any_local_is_active(
        chains in prop::collection::vec(any::<bool>(), 1..12),
        name in strategies::attribute_name(),
    ) {
        let origin = node(CHAIN_A, "origin");
        for (i, same_chain) in chains.iter().enumerate() {
            let partition = if *same_chain { CHAIN_A } else { CHAIN_B };
            link(&origin, &node(partition, &format!("peer{i}")));
        }

        let chosen = origin.find_closest_node(&key(&name)).unwrap();
        let entry = origin.neighbor(&chosen).unwrap();

        prop_assert_eq!(entry.is_local(), chains.contains(&true));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_node_finds_the_true_owner(
        count in 1..=8usize,
        name in strategies::attribute_name(),
        origin in any::<prop::sample::Index>(),
    ) {
        let network = SimulatedNetwork::with_defaults();
        let nodes = ring(&network, count);
        let key = key(&name);

        let outcome = nodes[origin.index(count)].find_owner(&network, &key).unwrap();

        prop_assert_eq!(outcome.owner.node_ref(), expected_owner(&nodes, &key));
    }
}
