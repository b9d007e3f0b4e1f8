// src/work_pool.rs

//! The counter that hands out units of work within one render pass.

use std::sync::atomic::{AtomicIsize, Ordering};

/// Remaining units of work, shared by every worker of a pass.
///
/// `claim` is a single `fetch_sub`: workers never block on it and no index is
/// handed out twice between two calls to `size`. Units are issued from
/// `n - 1` down to `0`.
#[derive(Debug, Default)]
pub struct WorkPool {
    remaining: AtomicIsize,
}

impl WorkPool {
    pub fn new(units: usize) -> Self {
        let pool = Self::default();
        pool.size(units);
        pool
    }

    /// Reset the pool to `units` unclaimed units.
    pub fn size(&self, units: usize) {
        let units = isize::try_from(units).unwrap_or(isize::MAX);
        self.remaining.store(units, Ordering::Release);
    }

    /// Claim one unit. `None` once the pool is exhausted.
    #[inline]
    pub fn claim(&self) -> Option<usize> {
        let unit = self.remaining.fetch_sub(1, Ordering::AcqRel) - 1;
        // Negative means exhausted; the counter keeps drifting below zero,
        // which is harmless until the next `size`.
        usize::try_from(unit).ok()
    }

    /// Units not yet claimed.
    pub fn remaining(&self) -> usize {
        usize::try_from(self.remaining.load(Ordering::Acquire)).unwrap_or(0)
    }
}
