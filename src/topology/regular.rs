//! Regular connectivity: component indices computed arithmetically from
//! grid extents, with no stored table.
//!
//! A regular (fully structured) cell set stores only its per-axis node
//! counts. Connectivity queries decompose the element index into grid
//! coordinates and synthesize the component list on demand, `O(1)` with a
//! small constant, for either direction of the cell/node relation.

use crate::topology::connectivity::{ElementComponents, ElementConnectivity, MAX_ELEMENT_ARITY};
use crate::topology::shape::ShapeType;

/// Per-axis node counts of a regular grid, dimension 1 to 3.
///
/// Unused axes hold a node count of 1 so products stay well-defined.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegularStructure {
    node_dims: [u32; 3],
    dimension: u8,
}

impl RegularStructure {
    /// 1D grid with `nx` nodes.
    pub fn new_1d(nx: u32) -> Self {
        RegularStructure {
            node_dims: [nx, 1, 1],
            dimension: 1,
        }
    }

    /// 2D grid with `nx * ny` nodes.
    pub fn new_2d(nx: u32, ny: u32) -> Self {
        RegularStructure {
            node_dims: [nx, ny, 1],
            dimension: 2,
        }
    }

    /// 3D grid with `nx * ny * nz` nodes.
    pub fn new_3d(nx: u32, ny: u32, nz: u32) -> Self {
        RegularStructure {
            node_dims: [nx, ny, nz],
            dimension: 3,
        }
    }

    /// Topological dimension of the grid.
    #[inline]
    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Node count along each axis.
    #[inline]
    pub fn node_dims(&self) -> [u32; 3] {
        self.node_dims
    }

    /// Cell count along each axis.
    #[inline]
    pub fn cell_dims(&self) -> [u32; 3] {
        let [nx, ny, nz] = self.node_dims;
        match self.dimension {
            1 => [nx.saturating_sub(1), 1, 1],
            2 => [nx.saturating_sub(1), ny.saturating_sub(1), 1],
            _ => [
                nx.saturating_sub(1),
                ny.saturating_sub(1),
                nz.saturating_sub(1),
            ],
        }
    }

    /// Total number of nodes.
    pub fn num_nodes(&self) -> usize {
        let [nx, ny, nz] = self.node_dims;
        nx as usize * ny as usize * nz as usize
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        let [cx, cy, cz] = self.cell_dims();
        cx as usize * cy as usize * cz as usize
    }

    /// Shape of every cell in the grid.
    pub fn cell_shape(&self) -> ShapeType {
        match self.dimension {
            1 => ShapeType::Segment,
            2 => ShapeType::Quadrilateral,
            _ => ShapeType::Hexahedron,
        }
    }
}

/// Direction of the topology relation a connectivity answers for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TopologyRelation {
    /// Elements are cells; components are their corner nodes.
    CellToNode,
    /// Elements are nodes; components are their incident cells.
    NodeToCell,
}

impl TopologyRelation {
    /// Stable name, used in error reports.
    pub fn name(self) -> &'static str {
        match self {
            TopologyRelation::CellToNode => "cell-to-node",
            TopologyRelation::NodeToCell => "node-to-cell",
        }
    }
}

/// Arithmetic connectivity over a [`RegularStructure`] for one relation.
///
/// Synthesized transiently from grid metadata at each operation invocation
/// and discarded after the call; cheap `Copy` value.
#[derive(Copy, Clone, Debug)]
pub struct RegularConnectivity {
    structure: RegularStructure,
    relation: TopologyRelation,
}

impl RegularConnectivity {
    /// Connectivity for `relation` over `structure`.
    pub fn new(structure: RegularStructure, relation: TopologyRelation) -> Self {
        RegularConnectivity {
            structure,
            relation,
        }
    }

    /// The grid this connectivity was synthesized from.
    pub fn structure(&self) -> &RegularStructure {
        &self.structure
    }

    fn cell_components(&self, cell: u32) -> ElementComponents {
        let [nx, ny, _] = self.structure.node_dims();
        let [cx, cy, _] = self.structure.cell_dims();
        let (nx, ny) = (nx as usize, ny as usize);
        let (cx, cy) = (cx as usize, cy as usize);
        let e = cell as usize;

        let mut indices = [0u32; MAX_ELEMENT_ARITY];
        let count;
        // Corner nodes in raster order: x fastest, then y, then z.
        match self.structure.dimension() {
            1 => {
                let base = e;
                indices[0] = base as u32;
                indices[1] = (base + 1) as u32;
                count = 2;
            }
            2 => {
                let ci = e % cx;
                let cj = e / cx;
                let base = ci + cj * nx;
                indices[0] = base as u32;
                indices[1] = (base + 1) as u32;
                indices[2] = (base + nx) as u32;
                indices[3] = (base + nx + 1) as u32;
                count = 4;
            }
            _ => {
                let ci = e % cx;
                let cj = (e / cx) % cy;
                let ck = e / (cx * cy);
                let base = ci + cj * nx + ck * nx * ny;
                let plane = nx * ny;
                indices[0] = base as u32;
                indices[1] = (base + 1) as u32;
                indices[2] = (base + nx) as u32;
                indices[3] = (base + nx + 1) as u32;
                indices[4] = (base + plane) as u32;
                indices[5] = (base + plane + 1) as u32;
                indices[6] = (base + plane + nx) as u32;
                indices[7] = (base + plane + nx + 1) as u32;
                count = 8;
            }
        }
        ElementComponents {
            shape: self.structure.cell_shape(),
            count,
            indices,
        }
    }

    fn node_components(&self, node: u32) -> ElementComponents {
        let [nx, ny, _] = self.structure.node_dims();
        let [cx, cy, cz] = self.structure.cell_dims();
        let (nx, ny) = (nx as usize, ny as usize);
        let (cx, cy, cz) = (cx as usize, cy as usize, cz as usize);
        let e = node as usize;
        let dim = self.structure.dimension();

        let i = e % nx;
        let j = (e / nx) % ny;
        let k = e / (nx * ny);

        let mut indices = [0u32; MAX_ELEMENT_ARITY];
        let mut count = 0usize;
        // Incident cells clipped at the grid boundary, raster order.
        // Out-of-range candidates wrap to huge values and fail the `< dim`
        // check, which also covers the `coordinate - 1` underflow at 0.
        let ks: [usize; 2] = if dim == 3 { [k.wrapping_sub(1), k] } else { [0, usize::MAX] };
        let js: [usize; 2] = if dim >= 2 { [j.wrapping_sub(1), j] } else { [0, usize::MAX] };
        for ck in ks {
            if ck >= cz {
                continue;
            }
            for cj in js {
                if cj >= cy {
                    continue;
                }
                for ci in [i.wrapping_sub(1), i] {
                    if ci >= cx {
                        continue;
                    }
                    indices[count] = (ci + cj * cx + ck * cx * cy) as u32;
                    count += 1;
                }
            }
        }
        ElementComponents {
            shape: ShapeType::Vertex,
            count,
            indices,
        }
    }
}

impl ElementConnectivity for RegularConnectivity {
    fn len(&self) -> usize {
        match self.relation {
            TopologyRelation::CellToNode => self.structure.num_cells(),
            TopologyRelation::NodeToCell => self.structure.num_nodes(),
        }
    }

    fn element_components(&self, element: u32) -> ElementComponents {
        match self.relation {
            TopologyRelation::CellToNode => self.cell_components(element),
            TopologyRelation::NodeToCell => self.node_components(element),
        }
    }
}
