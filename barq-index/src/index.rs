use fxhash::FxHashMap;

use barq_core::errors::BarqError;

use crate::library::BarcodeLibrary;

/// One entry of the merged lookup: a nucleotide key and the target it
/// identifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: Vec<u8>,
    pub target: String,
}

pub trait TargetLookup {
    fn target_for_key(&self, key: &[u8]) -> Option<&str>;
}

///
/// The merged forward/reverse-complement lookup built from a
/// [`BarcodeLibrary`].
///
/// Entry order is the construction order: every forward barcode in source-row
/// order, then every reverse complement in source-row order. Classification
/// resolves multi-barcode reads by this order, so it is part of the
/// observable contract, not an implementation detail.
///
#[derive(Debug, Clone)]
pub struct BarcodeIndex {
    entries: Vec<IndexEntry>,
    by_key: FxHashMap<Vec<u8>, usize>,
}

impl BarcodeIndex {
    /// Merge the forward and reverse-complement mappings in two phases.
    /// A key seen twice keeps its original slot but takes the later target
    /// (last writer wins), so a reverse complement colliding with a forward
    /// barcode overwrites it in place.
    pub fn from_library(library: &BarcodeLibrary) -> Result<Self, BarqError> {
        if library.is_empty() {
            return Err(BarqError::EmptyReference("library with no records".to_string()));
        }

        let mut index = Self {
            entries: Vec::with_capacity(library.len() * 2),
            by_key: FxHashMap::default(),
        };

        for record in library.records() {
            index.insert(record.barcode.as_bytes(), &record.target);
        }
        for record in library.records() {
            index.insert(record.revcomp.as_bytes(), &record.target);
        }

        Ok(index)
    }

    fn insert(&mut self, key: &[u8], target: &str) {
        match self.by_key.get(key) {
            Some(&slot) => {
                self.entries[slot].target = target.to_string();
            }
            None => {
                self.entries.push(IndexEntry {
                    key: key.to_vec(),
                    target: target.to_string(),
                });
                self.by_key.insert(key.to_vec(), self.entries.len() - 1);
            }
        }
    }

    /// Entries in construction order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Target name for an entry slot.
    pub fn target_at(&self, slot: usize) -> Option<&str> {
        self.entries.get(slot).map(|e| e.target.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TargetLookup for BarcodeIndex {
    fn target_for_key(&self, key: &[u8]) -> Option<&str> {
        self.by_key
            .get(key)
            .map(|&slot| self.entries[slot].target.as_str())
    }
}
