//! Attribute records held in a node's store.

use std::time::SystemTime;

use chainattr::{AttributeKey, AttributeValue, Coordinate, CoordinateResolver};

/// A stored attribute: either a value held here or a pointer elsewhere.
///
/// A record whose coordinate is not local never carries a value. The
/// constructors enforce this, and [`AttributeRecord::localized`] keeps it
/// true when a record crosses to a node in another partition.
///
/// # Examples
///
/// ```
/// use chainattr::{AttributeKey, AttributeValue, CoordinateResolver, NodeRef, PartitionId};
/// use chainattr_dht::AttributeRecord;
///
/// let resolver = CoordinateResolver::new(PartitionId::new(31337));
/// let here = resolver.self_coordinate(NodeRef::derive("node1"));
///
/// let record = AttributeRecord::local(
///     AttributeKey::parse("material").unwrap(),
///     AttributeValue::from_text("leather").unwrap(),
///     here,
/// );
///
/// assert!(!record.is_pointer());
/// assert_eq!(record.value().and_then(|v| v.to_text()).as_deref(), Some("leather"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeRecord {
    /// The attribute name.
    key: AttributeKey,
    /// Present only when the coordinate is local.
    value: Option<AttributeValue>,
    /// Where the attribute lives.
    coordinate: Coordinate,
    /// When this record was written.
    stored_at: SystemTime,
}

impl AttributeRecord {
    /// Creates a value-bearing record.
    ///
    /// A value paired with a non-local coordinate is dropped and the record
    /// becomes a pointer.
    #[must_use]
    pub fn local(key: AttributeKey, value: AttributeValue, coordinate: Coordinate) -> Self {
        Self {
            key,
            value: coordinate.is_local().then_some(value),
            coordinate,
            stored_at: SystemTime::now(),
        }
    }

    /// Creates a pointer record with no value.
    #[must_use]
    pub fn pointer(key: AttributeKey, coordinate: Coordinate) -> Self {
        Self {
            key,
            value: None,
            coordinate,
            stored_at: SystemTime::now(),
        }
    }

    /// Sets the write time (for testing/simulation).
    #[must_use]
    pub fn with_stored_at(mut self, stored_at: SystemTime) -> Self {
        self.stored_at = stored_at;
        self
    }

    /// Re-resolves the coordinate from `resolver`'s point of view.
    ///
    /// The value is kept only if the coordinate is still local there.
    #[must_use]
    pub fn localized(self, resolver: &CoordinateResolver) -> Self {
        let coordinate = resolver.localize(&self.coordinate);
        Self {
            value: self.value.filter(|_| coordinate.is_local()),
            coordinate,
            ..self
        }
    }

    /// Returns the attribute key.
    #[must_use]
    pub fn key(&self) -> &AttributeKey {
        &self.key
    }

    /// Returns the value, if held locally.
    #[must_use]
    pub const fn value(&self) -> Option<&AttributeValue> {
        self.value.as_ref()
    }

    /// Returns the coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Returns the write time.
    #[must_use]
    pub const fn stored_at(&self) -> SystemTime {
        self.stored_at
    }

    /// Returns true if this record only points elsewhere.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        self.value.is_none()
    }

    /// Splits the record into value and coordinate.
    #[must_use]
    pub fn into_parts(self) -> (Option<AttributeValue>, Coordinate) {
        (self.value, self.coordinate)
    }
}
