//! Partition ("chain") identifiers.

use std::fmt;

/// Identifier of an independent address space, such as a chain id.
///
/// # Examples
///
/// ```
/// use chainattr::PartitionId;
///
/// let partition = PartitionId::new(31337);
/// assert_eq!(partition.get(), 31337);
/// assert_eq!(partition.to_string(), "31337");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PartitionId(u64);

impl PartitionId {
    /// Creates a partition identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for PartitionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
