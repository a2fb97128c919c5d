//! Slot-by-slot diagnostic rendering of a [`HashTable`](crate::HashTable)

use std::fmt;

use crate::hash_table::Bucket;

/// A printable snapshot of every slot of a table, returned by
/// [`HashTable::dump`](crate::HashTable::dump).
///
/// Each slot is printed on its own line as `NULL` when Empty, as `ACTIVE`
/// followed by its key and value, or as `INACTIVE` followed by the key a
/// tombstone keeps. Keys and values are rendered in `Debug` form.
///
/// ```
/// use openmap::HashTable;
///
/// let mut table = HashTable::with_fns(|key: &u32| u64::from(*key), |a: &u32, b: &u32| a == b);
/// table.put(1, "one");
///
/// let dump = table.dump().to_string();
/// assert!(dump.contains("Bucket 1: ACTIVE, 1 => \"one\""));
/// assert!(dump.contains("Bucket 2: NULL"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dump<'a, K, V> {
    /// The slots of the table
    buckets: &'a [Option<Bucket<K, V>>],
    /// Live entry count of the table
    len: usize,
}

impl<'a, K, V> Dump<'a, K, V> {
    /// Wraps the slots of a table holding `len` live entries
    pub(crate) fn new(buckets: &'a [Option<Bucket<K, V>>], len: usize) -> Self {
        Self { buckets, len }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for Dump<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------ Hash Table Dump -------")?;

        for (index, slot) in self.buckets.iter().enumerate() {
            match slot {
                None => writeln!(f, "Bucket {index}: NULL")?,
                Some(Bucket { key, value: Some(value) }) => {
                    writeln!(f, "Bucket {index}: ACTIVE, {key:?} => {value:?}")?;
                }
                Some(Bucket { key, value: None }) => {
                    writeln!(f, "Bucket {index}: INACTIVE, {key:?}")?;
                }
            }
        }

        write!(f, "----- Size: {}, AllocSize: {} ------", self.len, self.buckets.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::HashTable;

    fn identity(key: &u32) -> u64 {
        u64::from(*key)
    }

    fn same(left: &u32, right: &u32) -> bool {
        left == right
    }

    #[test]
    fn test_dump_shows_every_state() {
        let mut table = HashTable::with_fns(identity, same);
        table.put(5, "prueba");
        table.put(70, "tobias");
        table.put(40, "malena");
        table.put(23, "gerardo");
        table.delete(&70);

        let expected = [
            "------ Hash Table Dump -------",
            "Bucket 0: ACTIVE, 40 => \"malena\"",
            "Bucket 1: NULL",
            "Bucket 2: NULL",
            "Bucket 3: NULL",
            "Bucket 4: NULL",
            "Bucket 5: ACTIVE, 5 => \"prueba\"",
            "Bucket 6: INACTIVE, 70",
            "Bucket 7: ACTIVE, 23 => \"gerardo\"",
            "----- Size: 3, AllocSize: 8 ------",
        ]
        .join("\n");

        assert_eq!(table.dump().to_string(), expected);
    }

    #[test]
    fn test_dump_of_empty_table() {
        let table: HashTable<u32, u32> = HashTable::with_capacity(2);
        assert_eq!(
            table.dump().to_string(),
            "------ Hash Table Dump -------\nBucket 0: NULL\nBucket 1: NULL\n----- Size: 0, AllocSize: 2 ------"
        );
    }
}
