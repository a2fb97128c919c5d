//! Key hashing and equality used by [`HashTable`](crate::HashTable)
//!
//! Tables are generic over a hasher and an equality, expressed by
//! [`KeyHasher`] and [`KeyEquality`]. Plain functions and closures implement
//! both traits for the table's own key type. [`DefaultHash`] and
//! [`DefaultEquals`] go through `Hash` and `Eq` and accept any borrowed form
//! of the key, so a `HashTable<String, _>` can be queried with a `&str`.

use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Function pointer form of a key hash
pub type HashFn<K> = fn(&K) -> u64;

/// Function pointer form of a key equality
pub type EqualsFn<K> = fn(&K, &K) -> bool;

/// Hashes keys, or borrowed forms `Q` of them, to 64 bits
pub trait KeyHasher<Q: ?Sized> {
    /// Hash of `key`; keys that compare equal must hash equal
    fn hash_of(&self, key: &Q) -> u64;
}

/// Compares a stored key `K` with a lookup key `Q`
pub trait KeyEquality<K, Q: ?Sized> {
    /// Returns true if `stored` and `key` denote the same key
    fn equals(&self, stored: &K, key: &Q) -> bool;
}

impl<Q: ?Sized, F> KeyHasher<Q> for F
where
    F: Fn(&Q) -> u64,
{
    fn hash_of(&self, key: &Q) -> u64 {
        self(key)
    }
}

impl<K, F> KeyEquality<K, K> for F
where
    F: Fn(&K, &K) -> bool,
{
    fn equals(&self, stored: &K, key: &K) -> bool {
        self(stored, key)
    }
}

/// Hashes with `Hash` and the standard library's `DefaultHasher`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHash;

impl<Q: Hash + ?Sized> KeyHasher<Q> for DefaultHash {
    fn hash_of(&self, key: &Q) -> u64 {
        hash_key(key)
    }
}

/// Compares with `Eq` through `Borrow`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquals;

impl<K, Q> KeyEquality<K, Q> for DefaultEquals
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    fn equals(&self, stored: &K, key: &Q) -> bool {
        keys_equal(stored.borrow(), key)
    }
}

/// Hashes a key with the standard library's `DefaultHasher`
pub fn hash_key<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Compares two keys with `Eq`
pub fn keys_equal<K: Eq + ?Sized>(left: &K, right: &K) -> bool {
    left == right
}
