//! Injectable randomness for picking one response out of a [`ResponseSet`](crate::rules::ResponseSet).
//!
//! Production code uses [`ThreadRngChooser`]. [`SeededChooser`] gives a
//! reproducible sequence and [`FixedChooser`] always picks the same index,
//! which is what tests want when they assert exact output.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed indices.
pub trait ResponseChooser: Send + Sync {
    /// Return an index in `0..len`. Callers guarantee `len > 0`.
    fn choose_index(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngChooser;

impl ResponseChooser for ThreadRngChooser {
    fn choose_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Uniform choice from a seeded RNG, reproducible across runs.
#[derive(Debug)]
pub struct SeededChooser {
    rng: Mutex<StdRng>,
}

impl SeededChooser {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ResponseChooser for SeededChooser {
    fn choose_index(&self, len: usize) -> usize {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        rng.gen_range(0..len)
    }
}

/// Always returns the same index (clamped by the caller).
#[derive(Debug)]
pub struct FixedChooser {
    index: AtomicUsize,
}

impl FixedChooser {
    pub fn new(index: usize) -> Self {
        Self {
            index: AtomicUsize::new(index),
        }
    }

    /// Change the index returned from now on.
    pub fn set(&self, index: usize) {
        self.index.store(index, Ordering::Relaxed);
    }
}

impl ResponseChooser for FixedChooser {
    fn choose_index(&self, _len: usize) -> usize {
        self.index.load(Ordering::Relaxed)
    }
}
