//! Cell sets: the container surface operations consume connectivity from.
//!
//! A cell set is either explicit (it owns adjacency tables) or structured
//! (it stores only grid extents and synthesizes connectivity on demand).
//! Operations perform the explicit-vs-structured capability check exactly
//! once per invocation, before dispatch, and never per element.

use crate::exec_error::MeshExecError;
use crate::topology::connectivity::{Connectivity, ElementConnectivity};
use crate::topology::explicit::ExplicitConnectivity;
use crate::topology::regular::{RegularConnectivity, RegularStructure, TopologyRelation};
use crate::topology::shape::ShapeType;

/// Connectivity tables owned by an explicit cell set.
///
/// The cell-to-node table is mandatory; the node-to-cell table is optional
/// and can be derived with [`ExplicitCells::with_node_to_cell`].
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ExplicitCells {
    cell_to_node: ExplicitConnectivity,
    node_to_cell: Option<ExplicitConnectivity>,
}

impl ExplicitCells {
    /// Cell set from a cell-to-node adjacency table.
    pub fn new(cell_to_node: ExplicitConnectivity) -> Self {
        ExplicitCells {
            cell_to_node,
            node_to_cell: None,
        }
    }

    /// Derive and store the node-to-cell table by inverting cell-to-node.
    ///
    /// `num_nodes` fixes the node id space (nodes unused by any cell get an
    /// empty component list).
    ///
    /// # Errors
    /// Returns `Err(ArityOverflow)` if some node is shared by more than
    /// [`MAX_ELEMENT_ARITY`](crate::topology::MAX_ELEMENT_ARITY) cells.
    pub fn with_node_to_cell(mut self, num_nodes: usize) -> Result<Self, MeshExecError> {
        let mut per_node: Vec<Vec<u32>> = vec![Vec::new(); num_nodes];
        for cell in 0..self.cell_to_node.len() as u32 {
            for &node in self.cell_to_node.element_components(cell).ids() {
                per_node[node as usize].push(cell);
            }
        }
        let mut inverse = ExplicitConnectivity::with_capacity(num_nodes, 4);
        for ids in &per_node {
            inverse.push_element(ShapeType::Vertex, ids)?;
        }
        self.node_to_cell = Some(inverse);
        Ok(self)
    }

    /// The stored cell-to-node table.
    pub fn cell_to_node(&self) -> &ExplicitConnectivity {
        &self.cell_to_node
    }
}

/// A cell set: explicit adjacency tables or a regular grid description.
///
/// The kind is a closed tagged variant, so resolution is a single match
/// rather than a runtime type test.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum CellSet {
    /// Explicit, variable-shape cell set owning its tables long-term.
    Explicit(ExplicitCells),
    /// Fully structured cell set; connectivity is synthesized transiently.
    Structured(RegularStructure),
}

impl CellSet {
    /// Capability query: does this cell set store explicit tables?
    pub fn is_explicit(&self) -> bool {
        matches!(self, CellSet::Explicit(_))
    }

    /// Number of cells.
    pub fn num_cells(&self) -> usize {
        match self {
            CellSet::Explicit(cells) => cells.cell_to_node.len(),
            CellSet::Structured(s) => s.num_cells(),
        }
    }

    /// Connectivity handle for `relation`, resolved once per operation
    /// invocation.
    ///
    /// # Errors
    /// Returns `Err(MissingConnectivity)` when an explicit cell set has no
    /// stored table for `relation` (see [`ExplicitCells::with_node_to_cell`]).
    pub fn connectivity(&self, relation: TopologyRelation) -> Result<Connectivity<'_>, MeshExecError> {
        match self {
            CellSet::Explicit(cells) => match relation {
                TopologyRelation::CellToNode => Ok(Connectivity::Explicit(&cells.cell_to_node)),
                TopologyRelation::NodeToCell => cells
                    .node_to_cell
                    .as_ref()
                    .map(Connectivity::Explicit)
                    .ok_or(MeshExecError::MissingConnectivity {
                        relation: relation.name(),
                    }),
            },
            CellSet::Structured(s) => Ok(Connectivity::Regular(RegularConnectivity::new(
                *s, relation,
            ))),
        }
    }
}
