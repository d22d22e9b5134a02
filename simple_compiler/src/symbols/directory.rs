//! Symbol directory
//!
//! Flat hash table from decorated symbol names to their entry nodes in the
//! arena. Open addressing with linear probing over a power-of-two bucket
//! array; removals leave tombstones so later entries in the same probe run
//! stay reachable. Lookups probe until they hit an empty bucket, insertions
//! reuse the first tombstone they pass.
//!
//! The table grows when the live count crosses the 4/7 load threshold.
//! Rehashing copies only live entries, so tombstones are dropped.

use super::error::SymbolError;
use crate::config::compile_time;
use crate::tree::NodeId;
use crate::{log_error, log_warning};

/// FNV-1a, the hash the directory probes with
pub fn fnv1a(key: &str) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for byte in key.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

#[derive(Debug, Clone, PartialEq)]
enum Bucket {
    Empty,
    Occupied { key: String, node: NodeId },
    Tombstone,
}

/// Open-addressing map from qualified symbol names to nodes
#[derive(Debug, Clone)]
pub struct SymbolDirectory {
    buckets: Vec<Bucket>,
    live: usize,
    tombstones: usize,
}

impl Default for SymbolDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self::with_capacity(compile_time::symbols::DIRECTORY_INITIAL_CAPACITY)
    }

    /// Capacity is rounded up to a power of two so probing can mask instead
    /// of dividing
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        Self {
            buckets: vec![Bucket::Empty; capacity],
            live: 0,
            tombstones: 0,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of buckets
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn mask(&self) -> usize {
        self.buckets.len() - 1
    }

    fn needs_resize(&self) -> bool {
        (self.live + 1) * compile_time::symbols::DIRECTORY_LOAD_NUMERATOR
            > self.buckets.len() * compile_time::symbols::DIRECTORY_LOAD_DENOMINATOR
    }

    /// Insert a key, failing when it is already present
    pub fn insert(&mut self, key: &str, node: NodeId) -> Result<(), SymbolError> {
        if self.needs_resize() {
            self.resize();
        }

        let mask = self.mask();
        let mut idx = fnv1a(key) as usize & mask;
        let mut reuse: Option<usize> = None;
        for _ in 0..self.buckets.len() {
            match &self.buckets[idx] {
                Bucket::Empty => {
                    let slot = reuse.unwrap_or(idx);
                    if matches!(self.buckets[slot], Bucket::Tombstone) {
                        self.tombstones -= 1;
                    }
                    self.buckets[slot] = Bucket::Occupied {
                        key: key.to_string(),
                        node,
                    };
                    self.live += 1;
                    return Ok(());
                }
                Bucket::Occupied { key: existing, .. } if existing == key => {
                    log_warning!("symbol already in directory", "key" => key);
                    return Err(SymbolError::duplicate_key(key));
                }
                Bucket::Occupied { .. } => {}
                Bucket::Tombstone => {
                    if reuse.is_none() {
                        reuse = Some(idx);
                    }
                }
            }
            idx = (idx + 1) & mask;
        }

        // Full probe cycle with no empty bucket. The load threshold keeps
        // this from happening unless a tombstone accounting bug exists.
        if let Some(slot) = reuse {
            self.buckets[slot] = Bucket::Occupied {
                key: key.to_string(),
                node,
            };
            self.tombstones -= 1;
            self.live += 1;
            return Ok(());
        }
        let err = SymbolError::probe_exhausted(key, self.buckets.len());
        log_error!(err.error_code(), "directory probe exhausted", "key" => key);
        Err(err)
    }

    /// Look a key up
    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        let mask = self.mask();
        let mut idx = fnv1a(key) as usize & mask;
        for _ in 0..self.buckets.len() {
            match &self.buckets[idx] {
                Bucket::Empty => return None,
                Bucket::Occupied { key: existing, node } if existing == key => {
                    return Some(*node);
                }
                _ => {}
            }
            idx = (idx + 1) & mask;
        }
        None
    }

    /// Remove a key, returning its node
    pub fn remove(&mut self, key: &str) -> Result<NodeId, SymbolError> {
        let mask = self.mask();
        let mut idx = fnv1a(key) as usize & mask;
        for _ in 0..self.buckets.len() {
            match &self.buckets[idx] {
                Bucket::Empty => break,
                Bucket::Occupied { key: existing, node } if existing == key => {
                    let node = *node;
                    self.buckets[idx] = Bucket::Tombstone;
                    self.live -= 1;
                    self.tombstones += 1;
                    return Ok(node);
                }
                _ => {}
            }
            idx = (idx + 1) & mask;
        }
        Err(SymbolError::key_not_found(key))
    }

    /// Live entries in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.buckets.iter().filter_map(|bucket| match bucket {
            Bucket::Occupied { key, node } => Some((key.as_str(), *node)),
            _ => None,
        })
    }

    fn resize(&mut self) {
        let new_capacity = self.buckets.len() * 2;
        let old = std::mem::replace(&mut self.buckets, vec![Bucket::Empty; new_capacity]);
        self.tombstones = 0;

        let mask = self.mask();
        for bucket in old {
            if let Bucket::Occupied { key, node } = bucket {
                let mut idx = fnv1a(&key) as usize & mask;
                while !matches!(self.buckets[idx], Bucket::Empty) {
                    idx = (idx + 1) & mask;
                }
                self.buckets[idx] = Bucket::Occupied { key, node };
            }
        }
    }
}
