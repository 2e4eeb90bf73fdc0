//! Threshold selection: the collaborator that feeds sparse-map operations.
//!
//! A `ThresholdSelector` picks the cells of a cell set whose scalar value
//! lies in a closed range, producing the sparse index list consumed by
//! [`CombinedTopologySparseMapOp`](crate::ops::CombinedTopologySparseMapOp)
//! and, optionally, an explicit standalone sub-cell-set of the selected
//! cells.

use crate::exec_error::MeshExecError;
use crate::topology::cell_set::CellSet;
use crate::topology::connectivity::{Connectivity, ElementConnectivity};
use crate::topology::explicit::ExplicitConnectivity;
use crate::topology::regular::TopologyRelation;

const OP_NAME: &str = "threshold";

/// Selects cells whose scalar value lies in `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThresholdSelector {
    min: f64,
    max: f64,
}

impl ThresholdSelector {
    /// Selector over the closed range `[min, max]`.
    pub fn new(min: f64, max: f64) -> Self {
        ThresholdSelector { min, max }
    }

    /// Sparse indices (ascending) of the cells whose value passes the
    /// range test.
    pub fn select(&self, cell_values: &[f64]) -> Vec<u32> {
        cell_values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= self.min && v <= self.max)
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Select cells and build an explicit standalone cell-to-node
    /// connectivity of the selected cells, from either cell-set kind.
    ///
    /// Returns the sub-connectivity and the sparse index list (selected
    /// cell indices in the source cell set, ascending).
    ///
    /// # Errors
    /// `ItemCountMismatch` when `cell_values` does not have one value per
    /// cell; `MissingConnectivity` when an explicit cell set lacks a
    /// cell-to-node table.
    pub fn extract(
        &self,
        cells: &CellSet,
        cell_values: &[f64],
    ) -> Result<(ExplicitConnectivity, Vec<u32>), MeshExecError> {
        if cell_values.len() != cells.num_cells() {
            return Err(MeshExecError::ItemCountMismatch {
                op: OP_NAME,
                what: "cell value array",
                expected: cells.num_cells(),
                found: cell_values.len(),
            });
        }
        let selected = self.select(cell_values);
        log::debug!(
            "{OP_NAME}: selected {}/{} cells in [{}, {}]",
            selected.len(),
            cell_values.len(),
            self.min,
            self.max
        );
        let sub = match cells.connectivity(TopologyRelation::CellToNode)? {
            Connectivity::Explicit(c) => extract_subset(c, &selected)?,
            Connectivity::Regular(c) => extract_subset(&c, &selected)?,
        };
        Ok((sub, selected))
    }
}

fn extract_subset<C: ElementConnectivity>(
    conn: &C,
    selected: &[u32],
) -> Result<ExplicitConnectivity, MeshExecError> {
    let mut sub = ExplicitConnectivity::with_capacity(selected.len(), 4);
    for &cell in selected {
        let components = conn.element_components(cell);
        sub.push_element(components.shape, components.ids())?;
    }
    Ok(sub)
}
