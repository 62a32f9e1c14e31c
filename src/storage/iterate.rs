use std::sync::atomic::{AtomicU64, Ordering};

use super::CollisionCounter;
use crate::{
    data::SparseVector,
    error::{Error, Result},
    initialization::ParamGen,
};

/// How many values are requested from a `ParamGen` at a time.
const GEN_CHUNK: usize = 4096;

/// The dense weight vector every worker reads and writes concurrently, without locks.
///
/// It embraces race conditions: each coordinate is an individually atomic `f64`
/// (stored as its bit pattern) but no two coordinates are ever coordinated with
/// each other, so a reader may see any mix of pre and post update values across
/// coordinates.
///
/// Every constructor reserves the whole buffer up front and reports a failed
/// reservation as an `Allocation` error.
#[derive(Debug)]
pub struct SharedIterate {
    coords: Vec<AtomicU64>,
    collisions: CollisionCounter,
}

impl SharedIterate {
    /// Creates a new `SharedIterate` starting at `values`.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        let mut coords = reserve(values.len())?;
        coords.extend(values.into_iter().map(|v| AtomicU64::new(v.to_bits())));

        Ok(Self::from_coords(coords))
    }

    /// Creates a new zero-initialized `SharedIterate` of `len` coordinates.
    pub fn zeros(len: usize) -> Result<Self> {
        let mut coords = reserve(len)?;
        coords.extend((0..len).map(|_| AtomicU64::new(0.0f64.to_bits())));

        Ok(Self::from_coords(coords))
    }

    /// Creates a new `SharedIterate` draining a parameter generator.
    ///
    /// # Arguments
    /// * `param_gen` - A parameter generator, its length defines the length of the iterate.
    pub fn from_param_gen<PG: ParamGen>(mut param_gen: PG) -> Result<Self> {
        let mut coords = reserve(param_gen.remaining())?;
        let mut chunk = [0.; GEN_CHUNK];

        loop {
            let n = param_gen.fill(&mut chunk);
            if n == 0 {
                break;
            }

            coords.extend(chunk[..n].iter().map(|v| AtomicU64::new(v.to_bits())));
        }

        Ok(Self::from_coords(coords))
    }

    fn from_coords(coords: Vec<AtomicU64>) -> Self {
        Self {
            coords,
            collisions: CollisionCounter::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Reads a single coordinate, it may be concurrently being written.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        f64::from_bits(self.coords[index].load(Ordering::Relaxed))
    }

    /// Overwrites a single coordinate, unconditionally.
    #[inline]
    pub fn store(&self, index: usize, value: f64) {
        self.coords[index].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Decrements the coordinate at `index` by `delta` without losing concurrent updates.
    ///
    /// Reads the coordinate, then swaps in the decremented value only if the coordinate
    /// still holds what was read, retrying with the fresh value otherwise. Every retry is
    /// recorded in the collision counter. There is no bound on the amount of retries.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    #[inline]
    pub fn apply(&self, index: usize, delta: f64) {
        let coord = &self.coords[index];
        let mut current = coord.load(Ordering::Relaxed);

        loop {
            let next = (f64::from_bits(current) - delta).to_bits();

            match coord.compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return,
                Err(actual) => {
                    self.collisions.record();
                    current = actual;
                }
            }
        }
    }

    /// Computes the dot product against a sparse vector, one relaxed read per entry.
    #[inline]
    pub fn dot(&self, x: &SparseVector) -> f64 {
        x.iter().map(|e| e.value * self.get(e.index)).sum()
    }

    /// Copies the current weights into the provided destination buffer.
    ///
    /// Writers aren't stopped, so the copy may be torn across coordinates.
    ///
    /// # Arguments
    /// * `out` - A mutable slice where the weights will be copied.
    ///
    /// # Returns
    /// A `DimensionMismatch` if `out` isn't the same size as the iterate.
    pub fn snapshot_into(&self, out: &mut [f64]) -> Result<()> {
        if self.len() != out.len() {
            return Err(Error::DimensionMismatch {
                expected: self.len(),
                got: out.len(),
            });
        }

        for (o, c) in out.iter_mut().zip(self.coords.iter()) {
            *o = f64::from_bits(c.load(Ordering::Relaxed));
        }

        Ok(())
    }

    /// Returns a dense, possibly torn, copy of the weights.
    ///
    /// # Returns
    /// An `Allocation` error if the copy can't be allocated.
    pub fn to_vec(&self) -> Result<Vec<f64>> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.len())
            .map_err(Error::alloc("iterate copy"))?;

        out.extend(
            self.coords
                .iter()
                .map(|c| f64::from_bits(c.load(Ordering::Relaxed))),
        );

        Ok(out)
    }

    /// A lower bound on the amount of lost compare-and-swap attempts so far.
    pub fn collisions(&self) -> u64 {
        self.collisions.get()
    }
}

fn reserve(len: usize) -> Result<Vec<AtomicU64>> {
    let mut coords = Vec::new();
    coords
        .try_reserve_exact(len)
        .map_err(Error::alloc("iterate"))?;

    Ok(coords)
}
