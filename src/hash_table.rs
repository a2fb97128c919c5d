use std::{borrow::Borrow, fmt, hash::Hash, iter, mem, process};

use log::{debug, error, trace, warn};

use crate::{
    dump::Dump,
    error::{Error, Result},
    utils::{DefaultEquals, DefaultHash, KeyEquality, KeyHasher},
};

/// Number of slots a table starts with when no capacity is requested
pub const INITIAL_CAPACITY: usize = 8;

/// Largest ratio of live entries to slots tolerated after an insert completes
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// Smallest capacity a table is ever built with
const MIN_CAPACITY: usize = 2;

/// A key and, while the entry is live, its value, stored inline in a slot
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    /// The key in the key-value pair
    pub(crate) key: K,
    /// The value associated with the key, taken out when the entry becomes a tombstone
    pub(crate) value: Option<V>,
}

impl<K, V> Bucket<K, V> {
    /// Returns false for a tombstone
    pub(crate) fn is_active(&self) -> bool {
        self.value.is_some()
    }
}

/// A slot is `None` while Empty, otherwise it holds an Occupied or tombstoned bucket
type Slot<K, V> = Option<Bucket<K, V>>;

/// Outcome of walking a probe chain for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// The key lives at this position
    Found(usize),
    /// The key is absent; a new entry for it belongs at this position
    Vacant(usize),
}

/// A hash table with open addressing, linear probing and tombstone deletion.
///
/// Keys and values are moved into the table on insert and copied out on lookup.
/// Hashing and key equality are supplied by the caller as plain functions or
/// closures. `H` and `E` default to [`DefaultHash`] and [`DefaultEquals`],
/// which go through `Hash` and `Eq` and accept borrowed forms of the key.
///
/// The table doubles its capacity as soon as more than half of its slots hold
/// live entries, so a probe chain always ends at an Empty slot.
///
/// Note: mutation needs `&mut self`. Share a table between threads only behind
/// a lock.
///
/// # Examples
///
/// ```
/// use openmap::HashTable;
///
/// let mut table = HashTable::with_fns(|key: &u32| u64::from(*key), |a: &u32, b: &u32| a == b);
///
/// table.put(5, "prueba");
/// table.put(70, "tobias");
/// assert_eq!(table.delete(&70), Some("tobias"));
///
/// assert!(table.has_key(&5));
/// assert!(!table.has_key(&70));
/// assert_eq!(table.get(&5), Some("prueba"));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct HashTable<K, V, H = DefaultHash, E = DefaultEquals> {
    /// The slots, always a power of two in number
    buckets: Vec<Slot<K, V>>,
    /// Number of Occupied slots
    count: usize,
    /// Caller-supplied key hash
    hash_fn: H,
    /// Caller-supplied key equality, consistent with `hash_fn`
    equals_fn: E,
}

impl<K, V, H, E> fmt::Debug for HashTable<K, V, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.count)
            .field("capacity", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V>
where
    K: Hash + Eq,
{
    /// Creates an empty table with `INITIAL_CAPACITY` slots, hashing keys with `DefaultHasher`
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` slots, hashing keys with `DefaultHasher`
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(capacity, DefaultHash, DefaultEquals)
    }
}

impl<K, V, H, E> HashTable<K, V, H, E>
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    /// Creates an empty table with `INITIAL_CAPACITY` slots and the given key functions.
    ///
    /// `equals_fn` must agree with `hash_fn`: keys that compare equal must hash equal.
    #[must_use]
    pub fn with_fns(hash_fn: H, equals_fn: E) -> Self {
        Self::from_parts(INITIAL_CAPACITY, hash_fn, equals_fn)
    }

    /// Creates an empty table with the given key functions.
    ///
    /// The capacity is rounded up to a power of two and is at least 2.
    #[must_use]
    pub fn with_capacity_and_fns(capacity: usize, hash_fn: H, equals_fn: E) -> Self {
        Self::from_parts(capacity, hash_fn, equals_fn)
    }
}

impl<K, V, H, E> HashTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquality<K, K>,
{
    /// Inserts a key-value pair, or replaces the value of an existing key.
    ///
    /// Returns the previous value when the key was already present; the stored
    /// key is left untouched in that case. Grows the table once more than half
    /// of the slots are live.
    ///
    /// Allocation failure while growing aborts the process. Use
    /// [`try_put`](Self::try_put) to handle it instead.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.insert_with(key, value, |capacity| Ok(empty_buckets(capacity))) {
            Ok(previous) => previous,
            Err(err) => {
                error!("hash table growth failed: {err}");
                process::abort()
            }
        }
    }

    /// Inserts a key-value pair like [`put`](Self::put), reporting allocation failure.
    ///
    /// The grown slot array is reserved before anything is written, so on error
    /// the table is left exactly as it was before the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if the grown slot array cannot be allocated
    /// and [`Error::CapacityOverflow`] if doubling the capacity overflows.
    pub fn try_put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.insert_with(key, value, try_empty_buckets)
    }

    /// Shared insert path; `allocate` provides the grown slot array when one is needed
    fn insert_with<A>(&mut self, key: K, value: V, allocate: A) -> Result<Option<V>>
    where
        A: FnOnce(usize) -> Result<Vec<Slot<K, V>>>,
    {
        let landing = match self.resolve(&key).0 {
            Resolution::Found(position) => {
                let previous = self
                    .buckets
                    .get_mut(position)
                    .and_then(Option::as_mut)
                    .and_then(|bucket| bucket.value.replace(value));
                return Ok(previous);
            }
            Resolution::Vacant(position) => position,
        };

        let count = self.count.saturating_add(1);
        let grown = if exceeds_load_factor(count, self.buckets.len()) {
            let capacity = self
                .buckets
                .len()
                .checked_mul(2)
                .ok_or(Error::CapacityOverflow { current: self.buckets.len() })?;
            Some(allocate(capacity)?)
        } else {
            None
        };

        if let Some(slot) = self.buckets.get_mut(landing) {
            match slot {
                Some(bucket) => {
                    bucket.key = key;
                    bucket.value = Some(value);
                }
                None => *slot = Some(Bucket { key, value: Some(value) }),
            }
            self.count = count;
        }

        if let Some(buckets) = grown {
            self.rehash_into(buckets);
        }

        Ok(None)
    }

    /// Moves every live entry into `buckets` and drops the tombstones
    fn rehash_into(&mut self, buckets: Vec<Slot<K, V>>) {
        let old = mem::replace(&mut self.buckets, buckets);
        let old_capacity = old.len();
        let mut purged: usize = 0;

        for bucket in old.into_iter().flatten() {
            if !bucket.is_active() {
                purged = purged.saturating_add(1);
                continue;
            }

            match self.resolve(&bucket.key).0 {
                Resolution::Vacant(position) => {
                    if let Some(slot) = self.buckets.get_mut(position) {
                        *slot = Some(bucket);
                    }
                }
                Resolution::Found(position) => {
                    // Only reachable when the equality function disagrees with the hash.
                    warn!("duplicate key met while rehashing, slot {position} keeps the last entry");
                    if let Some(slot) = self.buckets.get_mut(position) {
                        *slot = Some(bucket);
                    }
                    self.count = self.count.saturating_sub(1);
                }
            }
        }

        debug!(
            "resized hash table from {old_capacity} to {} slots, {} live entries, {purged} tombstones purged",
            self.buckets.len(),
            self.count,
        );
    }
}

impl<K, V, H, E> HashTable<K, V, H, E> {
    /// Builds an empty table; the capacity is rounded up to a power of two, at least 2
    fn from_parts(capacity: usize, hash_fn: H, equals_fn: E) -> Self {
        let capacity = capacity.max(MIN_CAPACITY).next_power_of_two();

        Self { buckets: empty_buckets(capacity), count: 0, hash_fn, equals_fn }
    }

    /// Mask turning any hash or position into a slot index
    fn mask(&self) -> usize {
        self.buckets.len().saturating_sub(1)
    }

    /// Initial probe position for a key
    #[allow(clippy::cast_possible_truncation)]
    fn home<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        (self.hash_fn.hash_of(key) as usize) & self.mask()
    }

    /// Walks the probe chain of `key` and reports where it is or where it should go
    fn resolve<Q>(&self, key: &Q) -> (Resolution, usize)
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquality<K, Q>,
    {
        resolve(&self.buckets, self.home(key), key, &self.equals_fn)
    }

    /// Returns a copy of the value stored for `key`.
    ///
    /// The key may be any borrowed form of the key type, as long as the table's
    /// key functions accept it.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquality<K, Q>,
        V: Clone,
    {
        self.get_ref(key).cloned()
    }

    /// Returns a reference to the value stored for `key`
    #[must_use]
    pub fn get_ref<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquality<K, Q>,
    {
        match self.resolve(key).0 {
            Resolution::Found(position) => self
                .buckets
                .get(position)
                .and_then(Option::as_ref)
                .and_then(|bucket| bucket.value.as_ref()),
            Resolution::Vacant(_) => None,
        }
    }

    /// Removes `key` from the table, returning its value if it was present.
    ///
    /// The slot goes straight back to Empty when the next slot in probe order is
    /// Empty, otherwise it stays behind as a tombstone holding only the key, so
    /// that longer probe chains running through it keep working. Removing an
    /// absent key does nothing.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquality<K, Q>,
    {
        let Resolution::Found(position) = self.resolve(key).0 else {
            return None;
        };

        let next = position.wrapping_add(1) & self.mask();
        let next_is_empty = matches!(self.buckets.get(next), Some(None));
        let slot = self.buckets.get_mut(position)?;
        self.count = self.count.saturating_sub(1);

        if next_is_empty {
            trace!("reclaimed slot {position}");
            slot.take().and_then(|bucket| bucket.value)
        } else {
            trace!("left a tombstone in slot {position}");
            slot.as_mut().and_then(|bucket| bucket.value.take())
        }
    }

    /// Returns true if the table holds `key`
    #[must_use]
    pub fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquality<K, Q>,
    {
        matches!(self.resolve(key).0, Resolution::Found(_))
    }

    /// Returns true if any live entry holds a value equal to `value` under `value_equals`.
    ///
    /// Values are compared with their own equality function, independent of the
    /// key equality of the table. The scan stops after the last live entry.
    #[must_use]
    pub fn has_value<F>(&self, value: &V, value_equals: F) -> bool
    where
        F: Fn(&V, &V) -> bool,
    {
        self.buckets
            .iter()
            .flatten()
            .filter_map(|bucket| bucket.value.as_ref())
            .take(self.count)
            .any(|stored| value_equals(stored, value))
    }

    /// Number of slots visited while resolving `key`, whether or not it is present
    #[must_use]
    pub fn probe_count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquality<K, Q>,
    {
        self.resolve(key).1
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the table holds no live entry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of live entries to slots
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.buckets.len() as f64
    }

    /// Returns the number of tombstoned slots
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.buckets.iter().flatten().filter(|bucket| !bucket.is_active()).count()
    }

    /// Empties every slot, keeping the current capacity
    pub fn clear(&mut self) {
        for slot in &mut self.buckets {
            *slot = None;
        }
        self.count = 0;
    }

    /// Returns a printable snapshot of every slot and its state
    #[must_use]
    pub fn dump(&self) -> Dump<'_, K, V> {
        Dump::new(&self.buckets, self.count)
    }
}

impl<K, V, H, E> Extend<(K, V)> for HashTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquality<K, K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

/// Walks the linear probe sequence of `key` starting at `home`.
///
/// Stops at the first live bucket holding the key, or at the first Empty slot.
/// In the latter case the landing position is the first tombstone met on the
/// way, falling back to the Empty slot itself. Also returns the number of
/// slots visited.
fn resolve<K, V, Q, E>(
    buckets: &[Slot<K, V>],
    home: usize,
    key: &Q,
    equals_fn: &E,
) -> (Resolution, usize)
where
    Q: ?Sized,
    E: KeyEquality<K, Q>,
{
    let mask = buckets.len().saturating_sub(1);
    let mut position = home & mask;
    let mut first_tombstone = None;
    let mut visited: usize = 0;

    for _ in 0..buckets.len() {
        visited = visited.saturating_add(1);
        match buckets.get(position) {
            None | Some(None) => {
                return (Resolution::Vacant(first_tombstone.unwrap_or(position)), visited);
            }
            Some(Some(bucket)) if bucket.is_active() => {
                if equals_fn.equals(&bucket.key, key) {
                    return (Resolution::Found(position), visited);
                }
            }
            Some(Some(_)) => {
                if first_tombstone.is_none() {
                    first_tombstone = Some(position);
                }
            }
        }
        position = position.wrapping_add(1) & mask;
    }

    // No Empty slot anywhere: live entries never fill the table, so a tombstone was seen.
    (Resolution::Vacant(first_tombstone.unwrap_or(home & mask)), visited)
}

/// Returns true when `count` live entries in `capacity` slots is over `MAX_LOAD_FACTOR`
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
fn exceeds_load_factor(count: usize, capacity: usize) -> bool {
    count as f64 / capacity as f64 > MAX_LOAD_FACTOR
}

/// Allocates `capacity` Empty slots
fn empty_buckets<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    iter::repeat_with(|| None).take(capacity).collect()
}

/// Allocates `capacity` Empty slots, reporting allocation failure
fn try_empty_buckets<K, V>(capacity: usize) -> Result<Vec<Slot<K, V>>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|source| Error::Allocation { capacity, source })?;
    buckets.resize_with(capacity, || None);
    Ok(buckets)
}
