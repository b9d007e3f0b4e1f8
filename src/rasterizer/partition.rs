// src/rasterizer/partition.rs

//! Disjoint row slices handed out to workers.

use crate::color::Argb;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

/// The canvas viewed as rows that can each be taken once.
///
/// A worker that claims row `y` from the work pool takes row `y` here and
/// owns those pixels for the rest of the pass. The taken flag is the only
/// per-row state; no lock is involved.
pub(crate) struct RowPartition<'a> {
    base: *mut Argb,
    width: usize,
    taken: Box<[AtomicBool]>,
    _pixels: PhantomData<&'a mut [Argb]>,
}

// SAFETY: `take` hands each row out at most once and rows never overlap, so
// sharing the partition only ever gives out disjoint `&mut [Argb]`, which are
// `Send` because `Argb` is.
unsafe impl Sync for RowPartition<'_> {}

impl<'a> RowPartition<'a> {
    /// A trailing partial row, if any, is never handed out.
    pub(crate) fn new(pixels: &'a mut [Argb], width: usize) -> Self {
        let rows = pixels.len().checked_div(width).unwrap_or(0);
        Self {
            base: pixels.as_mut_ptr(),
            width,
            taken: (0..rows).map(|_| AtomicBool::new(false)).collect(),
            _pixels: PhantomData,
        }
    }

    /// Take ownership of row `y`. `None` if the row is out of range or was
    /// already taken.
    pub(crate) fn take(&self, y: usize) -> Option<&'a mut [Argb]> {
        if self.taken.get(y)?.swap(true, Ordering::Relaxed) {
            return None;
        }
        // SAFETY: `y < rows`, so `y * width .. (y + 1) * width` lies inside the
        // buffer borrowed for `'a`. The swap above lets exactly one caller
        // reach this point for each `y`, and distinct rows do not overlap.
        Some(unsafe { std::slice::from_raw_parts_mut(self.base.add(y * self.width), self.width) })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.taken.len()
    }
}
