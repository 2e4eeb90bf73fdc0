//! Host execution strategy and operand validation shared by all
//! operations.
//!
//! The host strategy is a directly parallelizable loop over the logical
//! item range: iterations carry no dependency on one another, so the range
//! is partitioned across rayon workers when the `rayon` feature is enabled
//! and degrades to a sequential loop (identical results) without it.

use crate::array::indexable::IndexableMut;
use crate::array::indexer::ArrayIndexer;
use crate::exec_error::MeshExecError;

/// Invoke `body` once per logical item in `[0, n_items)`.
///
/// No iteration-order guarantee. Correctness requires that output
/// locations written by distinct logical items never alias; that
/// decomposition is the calling operation's contract with its caller.
pub fn for_each_item<F>(n_items: usize, body: F)
where
    F: Fn(usize) + Sync,
{
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        (0..n_items).into_par_iter().for_each(|i| body(i));
    }
    #[cfg(not(feature = "rayon"))]
    {
        for i in 0..n_items {
            body(i);
        }
    }
}

/// Validate that a densely indexed operand buffer covers every offset its
/// indexer can produce over `[0, n_items)`.
///
/// Data-dependent accesses (scatter destinations, sparse gathers) cannot
/// be validated here; those are bounds-checked at the write site.
pub(crate) fn check_operand(
    op: &'static str,
    what: &'static str,
    indexer: &ArrayIndexer,
    buffer_len: usize,
    n_items: usize,
) -> Result<(), MeshExecError> {
    if let Some(max) = indexer.max_offset(n_items) {
        if max >= buffer_len {
            return Err(MeshExecError::ItemCountMismatch {
                op,
                what,
                expected: max + 1,
                found: buffer_len,
            });
        }
    }
    Ok(())
}

/// Shared write handle over one output view, used inside the parallel
/// item loop.
///
/// Wraps the raw buffer pointer so the loop body can write through a
/// shared borrow; soundness rests on the disjoint-output decomposition
/// stated on [`for_each_item`].
pub(crate) struct SharedOutput<V> {
    ptr: *mut V,
    len: usize,
    indexer: ArrayIndexer,
}

unsafe impl<V: Send> Sync for SharedOutput<V> {}
unsafe impl<V: Send> Send for SharedOutput<V> {}

impl<V: Copy> SharedOutput<V> {
    pub(crate) fn new(view: &mut IndexableMut<'_, V>) -> Self {
        SharedOutput {
            ptr: view.values.as_mut_ptr(),
            len: view.values.len(),
            indexer: view.indexer,
        }
    }

    /// Write `value` at logical index `i`.
    ///
    /// Operations validate every data-dependent offset before dispatch;
    /// the bounds assert here is a backstop only.
    ///
    /// # Safety
    /// Distinct concurrent callers must target distinct physical offsets.
    #[inline(always)]
    pub(crate) unsafe fn set(&self, i: usize, value: V) {
        let off = self.indexer.index(i);
        assert!(off < self.len, "output offset {off} out of bounds (len {len})", len = self.len);
        unsafe { *self.ptr.add(off) = value };
    }

    /// Write `value` at logical index `i`, tolerating concurrent writers
    /// at the same offset.
    ///
    /// The store goes through relaxed atomic words (bytes for value types
    /// narrower than a word), so colliding writers leave one unspecified
    /// word-wise mix of the written values instead of a data race.
    #[inline(always)]
    pub(crate) fn set_relaxed(&self, i: usize, value: V)
    where
        V: bytemuck::Pod,
    {
        use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

        let off = self.indexer.index(i);
        assert!(off < self.len, "output offset {off} out of bounds (len {len})", len = self.len);
        let dst = unsafe { self.ptr.add(off) };
        let bytes = bytemuck::bytes_of(&value);
        if std::mem::size_of::<V>() % 4 == 0 && std::mem::align_of::<V>() >= 4 {
            let words: &[u32] = bytemuck::cast_slice(bytes);
            let dst = dst.cast::<AtomicU32>();
            for (w, &word) in words.iter().enumerate() {
                unsafe { (*dst.add(w)).store(word, Ordering::Relaxed) };
            }
        } else {
            let dst = dst.cast::<AtomicU8>();
            for (b, &byte) in bytes.iter().enumerate() {
                unsafe { (*dst.add(b)).store(byte, Ordering::Relaxed) };
            }
        }
    }
}
