//! Shape type metadata for mesh elements.

/// Geometric kind of a mesh element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ShapeType {
    /// 0D vertex.
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D tensor-product cell (hex).
    Hexahedron,
    /// 3D wedge/prism.
    Prism,
    /// 3D pyramid.
    Pyramid,
}

impl Default for ShapeType {
    fn default() -> Self {
        ShapeType::Vertex
    }
}

impl ShapeType {
    /// Topological dimension of the shape.
    pub fn dimension(self) -> u8 {
        match self {
            ShapeType::Vertex => 0,
            ShapeType::Segment => 1,
            ShapeType::Triangle | ShapeType::Quadrilateral => 2,
            ShapeType::Tetrahedron | ShapeType::Hexahedron | ShapeType::Prism | ShapeType::Pyramid => 3,
        }
    }

    /// Number of corner nodes, when fixed by the shape.
    pub fn corner_count(self) -> usize {
        match self {
            ShapeType::Vertex => 1,
            ShapeType::Segment => 2,
            ShapeType::Triangle => 3,
            ShapeType::Quadrilateral | ShapeType::Tetrahedron => 4,
            ShapeType::Pyramid => 5,
            ShapeType::Prism => 6,
            ShapeType::Hexahedron => 8,
        }
    }
}
