//! Fingerprint-bucketed index
//!
//! One `Index` exists per declared key set. It maps a value fingerprint
//! (the digest of a record's values on that key set's fields) to the bucket
//! of record handles carrying those values. Buckets hold handles, never
//! record copies; the table's record store is the single owner of record
//! data.

use crate::fingerprint::Fingerprint;
use crate::record::RecordId;
use std::collections::HashMap;

/// Bucketed map from value fingerprints to record handles
#[derive(Debug, Clone, Default)]
pub struct Index {
    buckets: HashMap<Fingerprint, Vec<RecordId>>,
}

impl Index {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record handle to the bucket for `fingerprint`.
    ///
    /// Handles within a bucket keep insertion order, so scans return
    /// records oldest-first.
    pub(crate) fn insert(&mut self, fingerprint: Fingerprint, id: RecordId) {
        self.buckets.entry(fingerprint).or_default().push(id);
    }

    /// Remove a record handle from the bucket for `fingerprint`.
    ///
    /// Buckets left empty are pruned so the map never accumulates dead
    /// fingerprints. Returns whether the handle was present.
    pub(crate) fn remove(&mut self, fingerprint: Fingerprint, id: RecordId) -> bool {
        if let Some(bucket) = self.buckets.get_mut(&fingerprint) {
            let before = bucket.len();
            bucket.retain(|entry| *entry != id);
            let removed = bucket.len() < before;
            if bucket.is_empty() {
                self.buckets.remove(&fingerprint);
            }
            removed
        } else {
            false
        }
    }

    /// Get the bucket for `fingerprint`, empty if none exists
    pub fn bucket(&self, fingerprint: Fingerprint) -> &[RecordId] {
        self.buckets
            .get(&fingerprint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of record handles across all buckets
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check if the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
