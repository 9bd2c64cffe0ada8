//! Builder for [`DhtNode`] instances with seeded state.

use chainattr::{
    AttributeKey, AttributeValue, BlockError, Coordinate, NodeLabel, NodeRef, PartitionId,
};

use crate::{DhtNode, NodeConfig};

/// Builds a [`DhtNode`], optionally pre-loaded with attributes and
/// neighbors.
///
/// Partition and address are fixed when the builder is created; every
/// other component has a default.
///
/// # Examples
///
/// ```
/// use chainattr::{AttributeKey, AttributeValue, NodeRef, PartitionId};
/// use chainattr_dht::{DhtNode, NodeConfig};
///
/// let node = DhtNode::builder(PartitionId::new(31337), NodeRef::derive("node1"))
///     .try_label("DHTnode1")
///     .unwrap()
///     .config(NodeConfig::new().with_max_hops(8))
///     .attribute(
///         AttributeKey::parse("protection").unwrap(),
///         AttributeValue::from_text("100").unwrap(),
///     )
///     .build();
///
/// assert_eq!(node.config().max_hops, 8);
/// assert_eq!(node.attribute_keys().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    partition: PartitionId,
    node_ref: NodeRef,
    label: NodeLabel,
    config: NodeConfig,
    attributes: Vec<(AttributeKey, AttributeValue)>,
    neighbors: Vec<(NodeRef, NodeLabel, Coordinate)>,
}

impl NodeBuilder {
    /// Creates a builder for the node at `node_ref` in `partition`.
    #[must_use]
    pub fn new(partition: PartitionId, node_ref: NodeRef) -> Self {
        Self {
            partition,
            node_ref,
            label: NodeLabel::from_bytes([0u8; chainattr::BLOCK_LENGTH]),
            config: NodeConfig::default(),
            attributes: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn label(mut self, label: NodeLabel) -> Self {
        self.label = label;
        self
    }

    /// Sets the display label from text.
    ///
    /// # Errors
    ///
    /// Returns `BlockError` if the text does not fit a label.
    pub fn try_label(self, text: &str) -> Result<Self, BlockError> {
        Ok(self.label(NodeLabel::from_text(text)?))
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds a locally held attribute.
    #[must_use]
    pub fn attribute(mut self, key: AttributeKey, value: AttributeValue) -> Self {
        self.attributes.push((key, value));
        self
    }

    /// Seeds a neighbor.
    #[must_use]
    pub fn neighbor(mut self, node_ref: NodeRef, label: NodeLabel, coordinate: Coordinate) -> Self {
        self.neighbors.push((node_ref, label, coordinate));
        self
    }

    /// Builds the node.
    #[must_use]
    pub fn build(self) -> DhtNode {
        let node = DhtNode::new(self.partition, self.node_ref, self.label, self.config);
        for (key, value) in self.attributes {
            node.store_attribute_local(key, value);
        }
        for (node_ref, label, coordinate) in self.neighbors {
            node.add_neighbor(node_ref, label, coordinate);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: PartitionId = PartitionId::new(31337);

    #[test]
    fn defaults() {
        let node = NodeBuilder::new(HOME, NodeRef::derive("node1")).build();

        assert_eq!(node.partition(), HOME);
        assert_eq!(node.node_ref(), NodeRef::derive("node1"));
        assert_eq!(node.config(), &NodeConfig::default());
        assert!(node.attribute_keys().is_empty());
    }

    #[test]
    fn seeds_attributes_and_neighbors() {
        let two = NodeRef::derive("node2");
        let node = NodeBuilder::new(HOME, NodeRef::derive("node2"))
            .try_label("DHTnode2")
            .unwrap()
            .attribute(
                AttributeKey::parse("name").unwrap(),
                AttributeValue::from_text("NMT on DHTnode2").unwrap(),
            )
            .neighbor(
                NodeRef::derive("node1"),
                NodeLabel::from_text("DHTnode1").unwrap(),
                Coordinate::foreign(HOME, NodeRef::derive("node1")),
            )
            .neighbor(two, NodeLabel::from_text("self").unwrap(), Coordinate::foreign(HOME, two))
            .build();

        assert_eq!(node.label().to_text().as_deref(), Some("DHTnode2"));
        assert_eq!(node.attribute_keys().len(), 1);
        assert_eq!(node.get_active_neighbors().len(), 1);
    }

    #[test]
    fn oversized_label_is_rejected() {
        let result = NodeBuilder::new(HOME, NodeRef::derive("node1")).try_label(&"x".repeat(40));
        assert!(result.is_err());
    }
}
