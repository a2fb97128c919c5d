//! Error type for the fallible growth path of [`HashTable`](crate::HashTable)

use std::collections::TryReserveError;

use thiserror::Error;

/// Result alias used by the fallible operations of the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that can only happen while growing the slot array.
///
/// Absent keys are never reported through this type, lookups and deletes
/// express absence with `Option` and `bool`.
#[derive(Debug, Error)]
pub enum Error {
    /// The allocator refused to provide the grown slot array
    #[error("failed to allocate a slot array of {capacity} slots")]
    Allocation {
        /// Number of slots that was requested
        capacity: usize,
        /// Underlying reservation failure
        #[source]
        source: TryReserveError,
    },
    /// Doubling the capacity would overflow `usize`
    #[error("capacity cannot grow beyond {current} slots")]
    CapacityOverflow {
        /// Capacity at the time of the failed growth
        current: usize,
    },
}
