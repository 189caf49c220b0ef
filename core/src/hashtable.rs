//! Chained hash table from string keys to a generic value type.
//!
//! Collision strategy is separate chaining (one `Vec` of key-value pairs per
//! bucket); growth policy is rehash-on-threshold. Both are deliberately
//! explicit: this module is the seam where an alternate backing strategy
//! (e.g. open addressing) could be swapped in without touching the index.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::mem;

use crate::error::{GerpError, Result};

const MAX_LOAD_FACTOR: f64 = 0.75;
const DEFAULT_BUCKETS: usize = 1024;

#[derive(Debug)]
struct KeyValue<V> {
    key: String,
    val: V,
}

/// Hash map keyed by strings, parameterized over the value type and the
/// hashing strategy (default [`RandomState`]; per-table state, never global).
///
/// The load factor stays at or below 0.75: when an insertion would push it
/// past the threshold, the bucket array grows to `2n + 1` slots first and
/// every entry is rehoused.
#[derive(Debug)]
pub struct Hashtable<V, S = RandomState> {
    buckets: Vec<Vec<KeyValue<V>>>,
    len: usize,
    hash_builder: S,
}

impl<V> Hashtable<V> {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_buckets_and_hasher(buckets, RandomState::new())
    }
}

impl<V> Default for Hashtable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S: BuildHasher> Hashtable<V, S> {
    pub fn with_buckets_and_hasher(buckets: usize, hash_builder: S) -> Self {
        Hashtable {
            buckets: (0..buckets.max(1)).map(|_| Vec::new()).collect(),
            len: 0,
            hash_builder,
        }
    }

    /// Insert `value` under `key`, replacing any existing value.
    ///
    /// The returned reference is usable until the next mutation of the table.
    pub fn insert(&mut self, key: &str, value: V) -> &mut V {
        let bucket = self.bucket_of(key);
        match self.buckets[bucket].iter().position(|kv| kv.key == key) {
            Some(i) => {
                let slot = &mut self.buckets[bucket][i];
                slot.val = value;
                &mut slot.val
            }
            None => self.push_new(key, value),
        }
    }

    /// Non-mutating lookup; `None` is the not-found sentinel.
    pub fn find(&self, key: &str) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| &kv.val)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let bucket = self.bucket_of(key);
        self.buckets[bucket]
            .iter_mut()
            .find(|kv| kv.key == key)
            .map(|kv| &mut kv.val)
    }

    /// Fail-fast lookup: [`GerpError::KeyNotFound`] when the key is absent.
    pub fn at(&self, key: &str) -> Result<&V> {
        self.find(key)
            .ok_or_else(|| GerpError::KeyNotFound(key.to_owned()))
    }

    /// The value under `key`, inserting `V::default()` first if absent.
    ///
    /// The bucket is located and scanned once; the scan position doubles as
    /// the insertion hint.
    pub fn get_or_default(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        let bucket = self.bucket_of(key);
        match self.buckets[bucket].iter().position(|kv| kv.key == key) {
            Some(i) => &mut self.buckets[bucket][i].val,
            None => self.push_new(key, V::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stored entries per bucket.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    fn bucket_of(&self, key: &str) -> usize {
        (self.hash_builder.hash_one(key) % self.buckets.len() as u64) as usize
    }

    fn push_new(&mut self, key: &str, value: V) -> &mut V {
        if (self.len + 1) as f64 > MAX_LOAD_FACTOR * self.buckets.len() as f64 {
            self.expand();
        }
        let bucket = self.bucket_of(key);
        self.buckets[bucket].push(KeyValue {
            key: key.to_owned(),
            val: value,
        });
        self.len += 1;
        let last = self.buckets[bucket].len() - 1;
        &mut self.buckets[bucket][last].val
    }

    /// Rehouse every entry into a bucket array of `2n + 1` slots. The odd
    /// count keeps the new modulus from sharing small factors with the old
    /// one, so rehashed entries spread instead of colliding in lockstep.
    fn expand(&mut self) {
        let grown = self.buckets.len() * 2 + 1;
        let old = mem::replace(&mut self.buckets, (0..grown).map(|_| Vec::new()).collect());
        for kv in old.into_iter().flatten() {
            let bucket = self.bucket_of(&kv.key);
            self.buckets[bucket].push(kv);
        }
    }
}
