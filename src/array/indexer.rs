//! `ArrayIndexer`: a pure arithmetic map from logical element index to
//! physical offset in a flat value buffer.
//!
//! The indexer is the innermost-loop primitive of every operation: it is
//! invoked once per element per array, so it must stay an inlinable leaf
//! computation with no dynamic dispatch and no bounds checking. Callers
//! guarantee the logical index is within the declared item count.

use crate::exec_error::MeshExecError;

/// Default `modulus` for indexers that never wrap: large enough that the
/// `% modulus` term is a no-op for any realistic element count.
pub const DEFAULT_MODULUS: usize = 1_000_000_000;

/// Maps a logical index `i` to the physical offset
/// `((i / divisor) % modulus) * multiplier + offset`.
///
/// Three access patterns fall out of the same formula:
/// - identity single-component access (the [`Default`] value),
/// - `(stride, offset)` access picking one component of an interleaved
///   multi-component array ([`ArrayIndexer::strided`]),
/// - derived/broadcast access, e.g. treating a lower-dimensional array as
///   constant across an extra dimension via `multiplier = 0` or a
///   `divisor`/`modulus` pair ([`ArrayIndexer::new`]).
///
/// # Invariants
/// `divisor >= 1` and `modulus >= 1`. The checked constructor enforces
/// them; the unchecked forms cannot violate them. Immutable once built,
/// `Copy`, and freely duplicated at call sites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArrayIndexer {
    divisor: usize,
    modulus: usize,
    multiplier: usize,
    offset: usize,
}

impl Default for ArrayIndexer {
    /// Identity access over a single component: `index(i) == i`.
    fn default() -> Self {
        ArrayIndexer {
            divisor: 1,
            modulus: DEFAULT_MODULUS,
            multiplier: 1,
            offset: 0,
        }
    }
}

impl ArrayIndexer {
    /// Strided access: `index(i) = i * multiplier + offset`.
    ///
    /// Picks component `offset` out of an array interleaved with
    /// `multiplier` components per tuple. `multiplier = 0` broadcasts a
    /// single value across every logical index.
    pub fn strided(multiplier: usize, offset: usize) -> Self {
        ArrayIndexer {
            divisor: 1,
            modulus: DEFAULT_MODULUS,
            multiplier,
            offset,
        }
    }

    /// Full form for derived/broadcast access patterns.
    ///
    /// # Errors
    /// Returns `Err(InvalidIndexer)` if `divisor` or `modulus` is zero.
    pub fn new(
        divisor: usize,
        modulus: usize,
        multiplier: usize,
        offset: usize,
    ) -> Result<Self, MeshExecError> {
        if divisor == 0 {
            return Err(MeshExecError::InvalidIndexer { field: "divisor" });
        }
        if modulus == 0 {
            return Err(MeshExecError::InvalidIndexer { field: "modulus" });
        }
        Ok(ArrayIndexer {
            divisor,
            modulus,
            multiplier,
            offset,
        })
    }

    /// Physical offset for logical index `i`.
    ///
    /// Pure and side-effect free; no bounds checking is performed here.
    #[inline(always)]
    pub fn index(&self, i: usize) -> usize {
        ((i / self.divisor) % self.modulus) * self.multiplier + self.offset
    }

    /// Largest offset `index` can produce over `[0, n_items)`, or `None`
    /// for an empty range.
    ///
    /// Exact: `i / divisor` sweeps every quotient in `[0, (n_items-1)/divisor]`,
    /// so the post-modulus factor attains `min(q_max, modulus - 1)`.
    /// Used by operations to validate operand lengths up front.
    pub fn max_offset(&self, n_items: usize) -> Option<usize> {
        if n_items == 0 {
            return None;
        }
        let q_max = (n_items - 1) / self.divisor;
        Some(q_max.min(self.modulus - 1) * self.multiplier + self.offset)
    }

    /// `divisor` field.
    #[inline]
    pub fn divisor(&self) -> usize {
        self.divisor
    }

    /// `modulus` field.
    #[inline]
    pub fn modulus(&self) -> usize {
        self.modulus
    }

    /// `multiplier` field.
    #[inline]
    pub fn multiplier(&self) -> usize {
        self.multiplier
    }

    /// `offset` field.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        let ix = ArrayIndexer::default();
        for i in [0usize, 1, 5, 1000, 999_999] {
            assert_eq!(ix.index(i), i);
        }
    }

    #[test]
    fn strided_picks_components() {
        // y component of an interleaved xyz array
        let ix = ArrayIndexer::strided(3, 1);
        assert_eq!(ix.index(0), 1);
        assert_eq!(ix.index(1), 4);
        assert_eq!(ix.index(7), 22);
    }

    #[test]
    fn broadcast_is_constant() {
        let ix = ArrayIndexer::strided(0, 5);
        for i in 0..100 {
            assert_eq!(ix.index(i), 5);
        }
    }

    #[test]
    fn linear_form_matches_hand_computed() {
        // divisor = 1, modulus = 1e9 => index(i) = i*multiplier + offset
        for &(mul, add, i) in &[(1usize, 0usize, 7usize), (3, 1, 4), (2, 10, 0), (0, 9, 123)] {
            let ix = ArrayIndexer::new(1, DEFAULT_MODULUS, mul, add).unwrap();
            assert_eq!(ix.index(i), i * mul + add);
        }
    }

    #[test]
    fn divisor_and_modulus_wrap() {
        // Repeat each of 3 values twice, cycling: useful for treating a
        // per-row array as constant across columns.
        let ix = ArrayIndexer::new(2, 3, 1, 0).unwrap();
        let offsets: Vec<usize> = (0..8).map(|i| ix.index(i)).collect();
        assert_eq!(offsets, vec![0, 0, 1, 1, 2, 2, 0, 0]);
    }

    #[test]
    fn zero_fields_rejected() {
        assert_eq!(
            ArrayIndexer::new(0, 1, 1, 0).unwrap_err(),
            MeshExecError::InvalidIndexer { field: "divisor" }
        );
        assert_eq!(
            ArrayIndexer::new(1, 0, 1, 0).unwrap_err(),
            MeshExecError::InvalidIndexer { field: "modulus" }
        );
    }

    #[test]
    fn max_offset_is_exact() {
        let ix = ArrayIndexer::strided(3, 1);
        assert_eq!(ix.max_offset(0), None);
        assert_eq!(ix.max_offset(1), Some(1));
        assert_eq!(ix.max_offset(8), Some(22));
        let wrap = ArrayIndexer::new(2, 3, 1, 0).unwrap();
        assert_eq!(wrap.max_offset(8), Some(2));
        let broadcast = ArrayIndexer::strided(0, 4);
        assert_eq!(broadcast.max_offset(1000), Some(4));
    }

    #[test]
    fn serde_roundtrip() {
        let ix = ArrayIndexer::new(2, 5, 3, 7).unwrap();
        let s = serde_json::to_string(&ix).unwrap();
        let back: ArrayIndexer = serde_json::from_str(&s).unwrap();
        assert_eq!(back, ix);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// `index` is referentially transparent: same input, same output,
        /// no observable side effects between calls.
        #[test]
        fn index_is_pure(
            divisor in 1usize..64,
            modulus in 1usize..1_000_000,
            multiplier in 0usize..64,
            offset in 0usize..1024,
            i in 0usize..1_000_000,
        ) {
            let ix = ArrayIndexer::new(divisor, modulus, multiplier, offset).unwrap();
            let first = ix.index(i);
            prop_assert_eq!(ix.index(i), first);
            prop_assert_eq!(ix.index(i), ((i / divisor) % modulus) * multiplier + offset);
        }

        /// `max_offset` bounds every offset actually produced.
        #[test]
        fn max_offset_bounds_all_offsets(
            divisor in 1usize..8,
            modulus in 1usize..64,
            multiplier in 0usize..8,
            offset in 0usize..16,
            n in 1usize..512,
        ) {
            let ix = ArrayIndexer::new(divisor, modulus, multiplier, offset).unwrap();
            let max = ix.max_offset(n).unwrap();
            let observed = (0..n).map(|i| ix.index(i)).max().unwrap();
            prop_assert_eq!(observed, max);
        }
    }
}
