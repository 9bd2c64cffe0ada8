//! Per-node attribute storage.

use std::collections::HashMap;

use chainattr::{AttributeKey, AttributeValue, Coordinate};
use tracing::{debug, warn};

use crate::{AttributeRecord, DhtError};

/// Keyed attribute records owned by one node.
///
/// Holds at most one record per key; a later store replaces the earlier
/// record whether it was a value or a pointer. The store itself is not
/// synchronized: [`DhtNode`](crate::DhtNode) keeps it behind a lock.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    /// Coordinate of the owning node, used for local values.
    home: Coordinate,
    records: HashMap<AttributeKey, AttributeRecord>,
}

impl AttributeStore {
    /// Creates an empty store for the node at `home`.
    #[must_use]
    pub fn new(home: Coordinate) -> Self {
        Self {
            home,
            records: HashMap::new(),
        }
    }

    /// Returns the owning node's coordinate.
    #[must_use]
    pub const fn home(&self) -> &Coordinate {
        &self.home
    }

    /// Stores a value held by this node, replacing any prior record.
    pub fn store_attribute_local(&mut self, key: AttributeKey, value: AttributeValue) {
        debug!(key = %key, node = %self.home.node_ref(), "storing local attribute");
        let record = AttributeRecord::local(key.clone(), value, self.home);
        self.records.insert(key, record);
    }

    /// Stores a pointer to an attribute held elsewhere.
    ///
    /// A coordinate marked local, or one addressing this node, is accepted
    /// as given and logged; it still produces a value-less record.
    pub fn store_attribute_remote(&mut self, key: AttributeKey, coordinate: Coordinate) {
        if coordinate.is_local() || coordinate.points_at(&self.home.node_ref()) {
            warn!(
                key = %key,
                coordinate = %coordinate,
                "remote pointer addresses a local location"
            );
        } else {
            debug!(key = %key, coordinate = %coordinate, "storing remote pointer");
        }
        let record = AttributeRecord::pointer(key.clone(), coordinate);
        self.records.insert(key, record);
    }

    /// Returns the value (if held here) and coordinate for `key`.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::NotFound` if no record exists.
    pub fn get_attribute_value(
        &self,
        key: &str,
    ) -> Result<(Option<AttributeValue>, Coordinate), DhtError> {
        self.records
            .get(key)
            .map(|record| (record.value().copied(), *record.coordinate()))
            .ok_or_else(|| DhtError::not_found(key))
    }

    /// Returns the record for `key`, if any.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<&AttributeRecord> {
        self.records.get(key)
    }

    /// Returns true if a record exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of pointer records.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.records.values().filter(|r| r.is_pointer()).count()
    }

    /// Returns all keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<AttributeKey> {
        let mut keys: Vec<_> = self.records.keys().cloned().collect();
        keys.sort();
        keys
    }
}
