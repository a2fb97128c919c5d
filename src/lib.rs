//! # Open-Addressing Hash Table
//!
//! A Rust implementation of a hash table with open addressing, linear probing and
//! lazy (tombstone) deletion.
//!
//! [`HashTable`] keeps every entry inline in a power-of-two array of slots. Each
//! slot is Empty, Occupied or a tombstone. Lookups walk the slots one by one from
//! the key's home slot until they meet the key or an Empty slot. Deleting a key
//! leaves a tombstone behind unless the next slot is Empty, and the array doubles
//! as soon as more than half of its slots are live. Tombstones are purged by that
//! rehash.
//!
//! Hashing and key equality are supplied by the caller, so any `Sized` key type
//! can be stored without implementing `Hash` or `Eq`. Tables built with
//! [`HashTable::new`] use `Hash` and `Eq` instead and can be queried with any
//! borrowed form of the key, such as `&str` for `String` keys.
//!
//! ## Basic Usage
//!
//! ```rust
//! use openmap::HashTable;
//!
//! // Create a table hashing keys with `DefaultHasher`
//! let mut table = HashTable::new();
//!
//! // Insert values
//! table.put("apple".to_string(), 1);
//! table.put("banana".to_string(), 2);
//!
//! // Retrieve copies of values, looking up `String` keys by `&str`
//! assert_eq!(table.get("apple"), Some(1));
//!
//! // Update values
//! table.put("apple".to_string(), 10);
//! assert_eq!(table.get("apple"), Some(10));
//! assert_eq!(table.len(), 2);
//!
//! // Remove values, moving them out of the table
//! assert_eq!(table.delete("apple"), Some(10));
//! assert!(!table.has_key("apple"));
//! ```
//!
//! ## Caller-Supplied Key Functions
//!
//! ```rust
//! use openmap::HashTable;
//!
//! fn hash_code(key: &i32) -> u64 {
//!     u64::from(key.unsigned_abs())
//! }
//!
//! fn equals(left: &i32, right: &i32) -> bool {
//!     left == right
//! }
//!
//! let mut table = HashTable::with_fns(hash_code, equals);
//! table.put(5, "prueba");
//! table.put(23, "gerardo");
//!
//! // Values are compared with their own equality function
//! assert!(table.has_value(&"gerardo", |a, b| a == b));
//! assert!(!table.has_value(&"tobias", |a, b| a == b));
//! ```

/// Slot-by-slot diagnostic rendering
mod dump;
/// Error type of the fallible insert path
mod error;
/// The open-addressing hash table
mod hash_table;
/// Key hashing and equality
mod utils;

pub use dump::Dump;
pub use error::{Error, Result};
pub use hash_table::{HashTable, INITIAL_CAPACITY, MAX_LOAD_FACTOR};
pub use utils::{
    DefaultEquals, DefaultHash, EqualsFn, HashFn, KeyEquality, KeyHasher, hash_key, keys_equal,
};
