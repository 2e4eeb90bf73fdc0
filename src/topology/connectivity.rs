//! The element-components query contract shared by every connectivity
//! implementation, and the closed variant that operations resolve once per
//! invocation.

use crate::topology::explicit::ExplicitConnectivity;
use crate::topology::regular::RegularConnectivity;
use crate::topology::shape::ShapeType;
use static_assertions::const_assert;

/// Fixed maximum component (sub-element) count per element, shared across
/// the system. Twelve covers the worst fixed-shape case (hexahedron
/// cell-to-edge).
pub const MAX_ELEMENT_ARITY: usize = 12;

// A hexahedron's corner nodes must fit.
const_assert!(MAX_ELEMENT_ARITY >= 8);

/// Result of an element-components query: the element's shape tag and its
/// component indices, stored inline up to [`MAX_ELEMENT_ARITY`].
#[derive(Copy, Clone, Debug)]
pub struct ElementComponents {
    /// Geometric kind of the element.
    pub shape: ShapeType,
    /// Number of valid entries in `indices`.
    pub count: usize,
    /// Component indices; only the first `count` entries are meaningful.
    pub indices: [u32; MAX_ELEMENT_ARITY],
}

impl ElementComponents {
    /// The valid component indices.
    #[inline]
    pub fn ids(&self) -> &[u32] {
        &self.indices[..self.count]
    }
}

/// The query contract both connectivity variants satisfy.
///
/// Implementations are `O(1)` per query: a table lookup for the explicit
/// variant, pure arithmetic for the regular variant. Downstream operation
/// loops are monomorphized over this trait, so there is no per-element
/// dynamic dispatch.
pub trait ElementConnectivity {
    /// Number of elements on the source side of the relation.
    fn len(&self) -> usize;

    /// Whether the connectivity has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape tag and component indices of `element`.
    fn element_components(&self, element: u32) -> ElementComponents;
}

/// Closed tagged variant over the two connectivity kinds.
///
/// Resolved exactly once per operation invocation (from the cell set's
/// capability query); the two execution paths are match arms over this
/// enum, each monomorphized for its connectivity type. The variants are
/// never mixed within a single invocation.
#[derive(Copy, Clone, Debug)]
pub enum Connectivity<'a> {
    /// Explicit adjacency table, owned by the cell set.
    Explicit(&'a ExplicitConnectivity),
    /// Arithmetic connectivity synthesized from grid extents.
    Regular(RegularConnectivity),
}

impl Connectivity<'_> {
    /// Number of elements on the source side of the relation.
    pub fn len(&self) -> usize {
        match self {
            Connectivity::Explicit(c) => c.len(),
            Connectivity::Regular(c) => c.len(),
        }
    }

    /// Whether the connectivity has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
