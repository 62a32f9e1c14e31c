use std::slice;

use crate::error::{Error, Result};

/// A single non-zero coordinate of a sparse vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseEntry {
    pub index: usize,
    pub value: f64,
}

/// An ordered sequence of `(index, value)` pairs.
///
/// Indices are expected to be unique within a vector, this isn't checked.
/// Used both for dataset samples and as the per-thread gradient scratch buffer,
/// in which case it's cleared and refilled on every update without reallocating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<SparseEntry>,
}

impl SparseVector {
    /// Creates a new empty `SparseVector`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty `SparseVector` able to hold `capacity` entries without reallocating.
    ///
    /// # Arguments
    /// * `capacity` - The amount of entries to reserve.
    ///
    /// # Returns
    /// An `Allocation` error if the entries can't be reserved.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(Error::alloc("sparse vector"))?;

        Ok(Self { entries })
    }

    /// Creates a new `SparseVector` from `(index, value)` pairs, keeping their order.
    ///
    /// # Arguments
    /// * `pairs` - The non-zero coordinates.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(index, value)| SparseEntry { index, value })
            .collect();

        Self { entries }
    }

    #[inline]
    pub fn push(&mut self, index: usize, value: f64) {
        self.entries.push(SparseEntry { index, value });
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, SparseEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[SparseEntry] {
        &self.entries
    }

    /// Returns the largest index stored, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.entries.iter().map(|e| e.index).max()
    }

    /// Computes the dot product against a dense vector.
    ///
    /// # Arguments
    /// * `dense` - A dense vector at least as long as the largest index plus one.
    ///
    /// # Panics
    /// If any index is out of `dense`'s bounds.
    #[inline]
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries.iter().map(|e| e.value * dense[e.index]).sum()
    }
}

impl<'a> IntoIterator for &'a SparseVector {
    type Item = &'a SparseEntry;
    type IntoIter = slice::Iter<'a, SparseEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
