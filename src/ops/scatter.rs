//! Scatter: copy each input tuple to the destination position named by an
//! index array.
//!
//! For output initialized to `[0,0,0,0,0]`, input `[8,5,9]`, and indices
//! `[2,1,4]`, the result is `[0,5,8,0,9]`: position `s` of the input lands
//! at position `indices[s]` of the output. Locations not targeted by any
//! source position keep their prior value; scatter never zero-initializes.

use crate::array::indexable::{Indexable, IndexableMut, gather};
use crate::exec_error::MeshExecError;
use crate::ops::dispatch::{self, SharedOutput};

const OP_NAME: &str = "scatter";

/// A pure index-scatter over `N` parallel input/output array pairs.
///
/// Destination indices need not be contiguous, unique, or sorted. If two
/// source positions name the same destination, the surviving value is
/// backend-dependent, and for value types wider than one 32-bit word the
/// surviving words may come from different colliding sources; callers
/// needing determinism must supply collision-free indices. Constructed per
/// invocation and executed exactly once via one of the two entry points.
pub struct ScatterOp<'a, V, const N: usize> {
    inputs: [Indexable<'a, V>; N],
    outputs: [IndexableMut<'a, V>; N],
    indices: Indexable<'a, u32>,
    n_items: usize,
}

impl<'a, V, const N: usize> ScatterOp<'a, V, N>
where
    V: bytemuck::Pod + Send + Sync,
{
    /// Build a scatter over `n_items` logical source positions.
    pub fn new(
        inputs: [Indexable<'a, V>; N],
        outputs: [IndexableMut<'a, V>; N],
        indices: Indexable<'a, u32>,
        n_items: usize,
    ) -> Self {
        ScatterOp {
            inputs,
            outputs,
            indices,
            n_items,
        }
    }

    fn validate(&self) -> Result<(), MeshExecError> {
        dispatch::check_operand(
            OP_NAME,
            "index array",
            &self.indices.indexer,
            self.indices.values.len(),
            self.n_items,
        )?;
        for input in &self.inputs {
            dispatch::check_operand(
                OP_NAME,
                "input array",
                &input.indexer,
                input.values.len(),
                self.n_items,
            )?;
        }
        // The destination offsets are data-dependent, so the index array
        // itself is scanned before any output is touched.
        for s in 0..self.n_items {
            let d = self.indices.get(s) as usize;
            for output in &self.outputs {
                let off = output.indexer.index(d);
                if off >= output.values.len() {
                    return Err(MeshExecError::ItemCountMismatch {
                        op: OP_NAME,
                        what: "output array",
                        expected: off + 1,
                        found: output.values.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Execute on the multi-core host.
    ///
    /// # Errors
    /// `ItemCountMismatch` when an input or the index array is too short
    /// for `n_items` under its indexer, or when some destination index
    /// falls outside an output array; nothing is written on failure.
    pub fn run_host(mut self) -> Result<(), MeshExecError> {
        self.validate()?;
        log::debug!(
            "{OP_NAME}: n_items={} arity={N} backend=host",
            self.n_items
        );
        let inputs = self.inputs;
        let indices = self.indices;
        let outputs: [SharedOutput<V>; N] = self.outputs.each_mut().map(SharedOutput::new);
        dispatch::for_each_item(self.n_items, |s| {
            let d = indices.get(s) as usize;
            let values = gather(&inputs, s);
            for a in 0..N {
                // Collisions on `d` are tolerated; the relaxed store
                // leaves one unspecified winner per word.
                outputs[a].set_relaxed(d, values[a]);
            }
        });
        Ok(())
    }

    /// Execute on the accelerator.
    ///
    /// # Errors
    /// `AcceleratorUnsupported` in builds without the `wgpu-support`
    /// feature (never a silent host fallback), `AcceleratorDevice` /
    /// `GpuMappingFailed` on device failures, and the same precondition
    /// errors as [`run_host`](Self::run_host).
    pub fn run_accelerator(self) -> Result<(), MeshExecError> {
        self.validate()?;
        #[cfg(feature = "wgpu-support")]
        {
            log::debug!(
                "{OP_NAME}: n_items={} arity={N} backend=accelerator",
                self.n_items
            );
            let mut op = self;
            crate::backend::gpu::scatter(&op.inputs, &mut op.outputs, op.indices, op.n_items)
        }
        #[cfg(not(feature = "wgpu-support"))]
        {
            Err(MeshExecError::AcceleratorUnsupported { op: OP_NAME })
        }
    }
}
