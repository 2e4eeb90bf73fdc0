//! `Indexable` / `IndexableMut`: non-owning array views paired with an
//! [`ArrayIndexer`].
//!
//! Every operation operand is one of these views, giving a uniform
//! "array + access pattern" shape regardless of the underlying storage
//! layout. The buffers themselves are owned externally (by the surrounding
//! dataset); several views may alias one buffer with different indexers,
//! e.g. one view per component of an interleaved vector array.

use crate::array::indexer::ArrayIndexer;

/// Read-only view of a flat value buffer through an indexer.
///
/// Lightweight value type created at call sites; lives for the duration of
/// one operation invocation.
#[derive(Copy, Clone, Debug)]
pub struct Indexable<'a, V> {
    /// The underlying flat buffer, owned externally.
    pub values: &'a [V],
    /// Logical-to-physical offset map applied on every access.
    pub indexer: ArrayIndexer,
}

impl<'a, V> Indexable<'a, V> {
    /// Identity single-component view.
    pub fn new(values: &'a [V]) -> Self {
        Indexable {
            values,
            indexer: ArrayIndexer::default(),
        }
    }

    /// View through an explicit indexer.
    pub fn with_indexer(values: &'a [V], indexer: ArrayIndexer) -> Self {
        Indexable { values, indexer }
    }

    /// View of component `component` of an array interleaved with
    /// `n_components` values per tuple.
    pub fn component(values: &'a [V], n_components: usize, component: usize) -> Self {
        Indexable {
            values,
            indexer: ArrayIndexer::strided(n_components, component),
        }
    }

    /// Value at logical index `i`.
    ///
    /// Panics if the physical offset falls outside the buffer; operations
    /// validate dense operand lengths up front, so a panic here indicates a
    /// caller-supplied out-of-range data-dependent index.
    #[inline(always)]
    pub fn get(&self, i: usize) -> V
    where
        V: Copy,
    {
        self.values[self.indexer.index(i)]
    }
}

/// Mutable view of a flat value buffer through an indexer.
#[derive(Debug)]
pub struct IndexableMut<'a, V> {
    /// The underlying flat buffer, owned externally.
    pub values: &'a mut [V],
    /// Logical-to-physical offset map applied on every access.
    pub indexer: ArrayIndexer,
}

impl<'a, V> IndexableMut<'a, V> {
    /// Identity single-component view.
    pub fn new(values: &'a mut [V]) -> Self {
        IndexableMut {
            values,
            indexer: ArrayIndexer::default(),
        }
    }

    /// View through an explicit indexer.
    pub fn with_indexer(values: &'a mut [V], indexer: ArrayIndexer) -> Self {
        IndexableMut { values, indexer }
    }

    /// View of component `component` of an array interleaved with
    /// `n_components` values per tuple.
    pub fn component(values: &'a mut [V], n_components: usize, component: usize) -> Self {
        IndexableMut {
            values,
            indexer: ArrayIndexer::strided(n_components, component),
        }
    }

    /// Write `value` at logical index `i`.
    #[inline(always)]
    pub fn set(&mut self, i: usize, value: V) {
        let off = self.indexer.index(i);
        self.values[off] = value;
    }

    /// Read-only view of the same buffer and indexer.
    pub fn as_indexable(&self) -> Indexable<'_, V> {
        Indexable {
            values: self.values,
            indexer: self.indexer,
        }
    }
}

/// Gather one value per input view at logical index `i`.
#[inline(always)]
pub(crate) fn gather<V: Copy, const N: usize>(inputs: &[Indexable<'_, V>; N], i: usize) -> [V; N] {
    core::array::from_fn(|a| inputs[a].get(i))
}
