//! Combined-topology sparse map: per-element functor application over a
//! sparse subset of elements, with the element's full topological
//! neighborhood in view.
//!
//! This is the mechanism for computations that need all components of an
//! element (e.g. every node of a cell) while processing only a
//! pre-selected subset (e.g. cells passing a threshold test): inputs live
//! on the source topology (gathered per component id by the functor) or on
//! the destination topology (gathered at the sparse index), and outputs
//! land on the destination topology at the sparse index.

use crate::array::indexable::{Indexable, IndexableMut, gather};
use crate::exec_error::MeshExecError;
use crate::ops::dispatch::{self, SharedOutput};
use crate::topology::cell_set::CellSet;
use crate::topology::connectivity::{Connectivity, ElementConnectivity};
use crate::topology::regular::TopologyRelation;
use crate::topology::shape::ShapeType;

const OP_NAME: &str = "combined-topology sparse map";

/// Per-item computation invoked by the sparse map.
///
/// `apply` receives the element's shape tag, its component indices, the
/// source-topology input views (so it can gather per component id), and
/// the destination-topology values gathered at the element. It must be
/// pure with respect to the operation's aliasing assumptions: it reads
/// only through the views it is handed and returns the output tuple by
/// value.
pub trait TopologyFunctor<V, const NS: usize, const ND: usize, const NO: usize>: Sync {
    /// Compute the output tuple for one element.
    fn apply(
        &self,
        shape: ShapeType,
        component_ids: &[u32],
        source_inputs: &[Indexable<'_, V>; NS],
        dest_values: [V; ND],
    ) -> [V; NO];
}

/// Map from one topological element kind to another over a sparse subset.
///
/// For every dense position `k` in `[0, n_items)`: look up
/// `sparse = sparse_indices[k]`, query the connectivity at `sparse`,
/// gather the destination-topology inputs at `sparse`, invoke the functor,
/// and write its result to the outputs at `sparse`. The connectivity kind
/// (explicit vs. regular) is resolved once, before dispatch; each arm of
/// the resolution is monomorphized for its connectivity type.
pub struct CombinedTopologySparseMapOp<'a, V, F, const NS: usize, const ND: usize, const NO: usize>
{
    cells: &'a CellSet,
    relation: TopologyRelation,
    source_inputs: [Indexable<'a, V>; NS],
    dest_inputs: [Indexable<'a, V>; ND],
    outputs: [IndexableMut<'a, V>; NO],
    sparse_indices: Indexable<'a, u32>,
    n_items: usize,
    functor: F,
}

impl<'a, V, F, const NS: usize, const ND: usize, const NO: usize>
    CombinedTopologySparseMapOp<'a, V, F, NS, ND, NO>
where
    V: Copy + Send + Sync,
    F: TopologyFunctor<V, NS, ND, NO>,
{
    /// Build a sparse map over `n_items` dense positions (the number of
    /// selected output elements).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cells: &'a CellSet,
        relation: TopologyRelation,
        source_inputs: [Indexable<'a, V>; NS],
        dest_inputs: [Indexable<'a, V>; ND],
        outputs: [IndexableMut<'a, V>; NO],
        sparse_indices: Indexable<'a, u32>,
        n_items: usize,
        functor: F,
    ) -> Self {
        CombinedTopologySparseMapOp {
            cells,
            relation,
            source_inputs,
            dest_inputs,
            outputs,
            sparse_indices,
            n_items,
            functor,
        }
    }

    fn validate(&self) -> Result<(), MeshExecError> {
        dispatch::check_operand(
            OP_NAME,
            "sparse index array",
            &self.sparse_indices.indexer,
            self.sparse_indices.values.len(),
            self.n_items,
        )?;
        // Sparse indices are data-dependent: scan them before any output
        // is touched, and reject repeats (per-element outputs would
        // collide across parallel items).
        let mut seen = std::collections::HashSet::with_capacity(self.n_items);
        for k in 0..self.n_items {
            let sparse = self.sparse_indices.get(k);
            if !seen.insert(sparse) {
                return Err(MeshExecError::DuplicateSparseIndex {
                    op: OP_NAME,
                    index: sparse,
                });
            }
            let e = sparse as usize;
            for input in &self.dest_inputs {
                let off = input.indexer.index(e);
                if off >= input.values.len() {
                    return Err(MeshExecError::ItemCountMismatch {
                        op: OP_NAME,
                        what: "destination input array",
                        expected: off + 1,
                        found: input.values.len(),
                    });
                }
            }
            for output in &self.outputs {
                let off = output.indexer.index(e);
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
    /// `ItemCountMismatch` when the sparse index array is too short for
    /// `n_items` or when a sparse index lands outside a destination input
    /// or output array or past the connectivity's element range;
    /// `DuplicateSparseIndex` when an element is selected
    /// twice; `MissingConnectivity` when the cell set has no table for the
    /// requested relation. Nothing is written on failure.
    pub fn run_host(self) -> Result<(), MeshExecError> {
        self.validate()?;
        log::debug!(
            "{OP_NAME}: n_items={} relation={} explicit={} backend=host",
            self.n_items,
            self.relation.name(),
            self.cells.is_explicit()
        );
        // Resolve the connectivity kind exactly once; the execution loop
        // below is monomorphized per kind.
        let conn = self.cells.connectivity(self.relation)?;
        match conn {
            Connectivity::Explicit(c) => self.execute(c),
            Connectivity::Regular(c) => self.execute(&c),
        }
    }

    fn execute<C>(mut self, conn: &C) -> Result<(), MeshExecError>
    where
        C: ElementConnectivity + Sync,
    {
        // Element range depends on the resolved relation, so this check
        // happens after resolution, still before any output is touched.
        for k in 0..self.n_items {
            let e = self.sparse_indices.get(k) as usize;
            if e >= conn.len() {
                return Err(MeshExecError::ItemCountMismatch {
                    op: OP_NAME,
                    what: "connectivity",
                    expected: e + 1,
                    found: conn.len(),
                });
            }
        }
        let source_inputs = self.source_inputs;
        let dest_inputs = self.dest_inputs;
        let sparse_indices = self.sparse_indices;
        let functor = &self.functor;
        let outputs: [SharedOutput<V>; NO] = self.outputs.each_mut().map(SharedOutput::new);
        dispatch::for_each_item(self.n_items, |k| {
            let sparse = sparse_indices.get(k);
            let components = conn.element_components(sparse);
            let dest_values = gather(&dest_inputs, sparse as usize);
            let result = functor.apply(
                components.shape,
                components.ids(),
                &source_inputs,
                dest_values,
            );
            for a in 0..NO {
                // Validation rejected repeated sparse indices, so no two
                // items write the same offset.
                unsafe { outputs[a].set(sparse as usize, result[a]) };
            }
        });
        Ok(())
    }

    /// Execute on the accelerator.
    ///
    /// The device kernel for this operation family is not implemented;
    /// this entry point fails loudly rather than compute wrong results.
    ///
    /// # Errors
    /// `AcceleratorKernelMissing` in `wgpu-support` builds,
    /// `AcceleratorUnsupported` otherwise.
    pub fn run_accelerator(self) -> Result<(), MeshExecError> {
        #[cfg(feature = "wgpu-support")]
        {
            Err(MeshExecError::AcceleratorKernelMissing { op: OP_NAME })
        }
        #[cfg(not(feature = "wgpu-support"))]
        {
            Err(MeshExecError::AcceleratorUnsupported { op: OP_NAME })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::cell_set::ExplicitCells;
    use crate::topology::explicit::ExplicitConnectivity;
    use crate::topology::regular::RegularStructure;

    /// Average of the element's source-topology (per-node) values.
    struct NodeAverage;

    impl TopologyFunctor<f64, 1, 0, 1> for NodeAverage {
        fn apply(
            &self,
            _shape: ShapeType,
            component_ids: &[u32],
            source_inputs: &[Indexable<'_, f64>; 1],
            _dest_values: [f64; 0],
        ) -> [f64; 1] {
            let sum: f64 = component_ids
                .iter()
                .map(|&id| source_inputs[0].get(id as usize))
                .sum();
            [sum / component_ids.len() as f64]
        }
    }

    #[test]
    fn averages_cell_nodes_over_sparse_subset() {
        // 3x2 nodes, 2x1 cells; node values are their x coordinate
        let cells = CellSet::Structured(RegularStructure::new_2d(3, 2));
        let node_values = [0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let sparse = [1u32]; // only the right-hand cell
        let mut output = [0.0f64; 2];
        CombinedTopologySparseMapOp::new(
            &cells,
            TopologyRelation::CellToNode,
            [Indexable::new(&node_values)],
            [],
            [IndexableMut::new(&mut output)],
            Indexable::new(&sparse),
            1,
            NodeAverage,
        )
        .run_host()
        .unwrap();
        // cell 1 spans nodes {1,2,4,5} with values {1,2,1,2}
        assert_eq!(output, [0.0, 1.5]);
    }

    #[test]
    fn dest_inputs_are_gathered_at_the_sparse_index() {
        struct AddCellBias;
        impl TopologyFunctor<f64, 1, 1, 1> for AddCellBias {
            fn apply(
                &self,
                _shape: ShapeType,
                component_ids: &[u32],
                source_inputs: &[Indexable<'_, f64>; 1],
                dest_values: [f64; 1],
            ) -> [f64; 1] {
                let sum: f64 = component_ids
                    .iter()
                    .map(|&id| source_inputs[0].get(id as usize))
                    .sum();
                [sum + dest_values[0]]
            }
        }

        let mut table = ExplicitConnectivity::new();
        table.push_element(ShapeType::Segment, &[0, 1]).unwrap();
        table.push_element(ShapeType::Segment, &[1, 2]).unwrap();
        let cells = CellSet::Explicit(ExplicitCells::new(table));

        let node_values = [1.0, 2.0, 4.0];
        let cell_bias = [100.0, 200.0];
        let sparse = [0u32, 1];
        let mut output = [0.0f64; 2];
        CombinedTopologySparseMapOp::new(
            &cells,
            TopologyRelation::CellToNode,
            [Indexable::new(&node_values)],
            [Indexable::new(&cell_bias)],
            [IndexableMut::new(&mut output)],
            Indexable::new(&sparse),
            2,
            AddCellBias,
        )
        .run_host()
        .unwrap();
        assert_eq!(output, [103.0, 206.0]);
    }

    #[test]
    fn accelerator_path_fails_loudly() {
        let cells = CellSet::Structured(RegularStructure::new_2d(2, 2));
        let node_values = [0.0f64; 4];
        let sparse = [0u32];
        let mut output = [0.0f64; 1];
        let err = CombinedTopologySparseMapOp::new(
            &cells,
            TopologyRelation::CellToNode,
            [Indexable::new(&node_values)],
            [],
            [IndexableMut::new(&mut output)],
            Indexable::new(&sparse),
            1,
            NodeAverage,
        )
        .run_accelerator()
        .unwrap_err();
        #[cfg(feature = "wgpu-support")]
        assert_eq!(
            err,
            MeshExecError::AcceleratorKernelMissing {
                op: "combined-topology sparse map"
            }
        );
        #[cfg(not(feature = "wgpu-support"))]
        assert_eq!(
            err,
            MeshExecError::AcceleratorUnsupported {
                op: "combined-topology sparse map"
            }
        );
        // the output must be untouched
        assert_eq!(output, [0.0]);
    }

    #[test]
    fn out_of_range_sparse_index_is_rejected_before_writing() {
        let cells = CellSet::Structured(RegularStructure::new_2d(3, 2));
        let node_values = [0.0f64; 6];
        // only 2 cells and 2 output slots; element 9 is out of range
        let sparse = [0u32, 9];
        let mut output = [5.0f64; 2];
        let err = CombinedTopologySparseMapOp::new(
            &cells,
            TopologyRelation::CellToNode,
            [Indexable::new(&node_values)],
            [],
            [IndexableMut::new(&mut output)],
            Indexable::new(&sparse),
            2,
            NodeAverage,
        )
        .run_host()
        .unwrap_err();
        assert_eq!(
            err,
            MeshExecError::ItemCountMismatch {
                op: "combined-topology sparse map",
                what: "output array",
                expected: 10,
                found: 2
            }
        );
        // validation precedes execution: no partial writes
        assert_eq!(output, [5.0, 5.0]);
    }

    #[test]
    fn sparse_index_beyond_connectivity_is_rejected() {
        // output slots exist for element 49, but the grid has only 2 cells
        let cells = CellSet::Structured(RegularStructure::new_2d(3, 2));
        let node_values = [0.0f64; 6];
        let sparse = [49u32];
        let mut output = [0.0f64; 50];
        let err = CombinedTopologySparseMapOp::new(
            &cells,
            TopologyRelation::CellToNode,
            [Indexable::new(&node_values)],
            [],
            [IndexableMut::new(&mut output)],
            Indexable::new(&sparse),
            1,
            NodeAverage,
        )
        .run_host()
        .unwrap_err();
        assert_eq!(
            err,
            MeshExecError::ItemCountMismatch {
                op: "combined-topology sparse map",
                what: "connectivity",
                expected: 50,
                found: 2
            }
        );
        assert!(output.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn repeated_sparse_index_is_rejected() {
        let cells = CellSet::Structured(RegularStructure::new_2d(3, 2));
        let node_values = [0.0f64; 6];
        let sparse = [1u32, 1];
        let mut output = [0.0f64; 2];
        let err = CombinedTopologySparseMapOp::new(
            &cells,
            TopologyRelation::CellToNode,
            [Indexable::new(&node_values)],
            [],
            [IndexableMut::new(&mut output)],
            Indexable::new(&sparse),
            2,
            NodeAverage,
        )
        .run_host()
        .unwrap_err();
        assert_eq!(
            err,
            MeshExecError::DuplicateSparseIndex {
                op: "combined-topology sparse map",
                index: 1
            }
        );
    }

    #[test]
    fn short_sparse_array_is_rejected() {
        let cells = CellSet::Structured(RegularStructure::new_2d(2, 2));
        let node_values = [0.0f64; 4];
        let sparse: [u32; 0] = [];
        let mut output = [0.0f64; 1];
        let err = CombinedTopologySparseMapOp::new(
            &cells,
            TopologyRelation::CellToNode,
            [Indexable::new(&node_values)],
            [],
            [IndexableMut::new(&mut output)],
            Indexable::new(&sparse),
            1,
            NodeAverage,
        )
        .run_host()
        .unwrap_err();
        assert!(matches!(err, MeshExecError::ItemCountMismatch { .. }));
    }
}
