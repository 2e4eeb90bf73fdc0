//! Explicit connectivity: a stored adjacency table for variable-shape
//! (unstructured) topologies.
//!
//! Each element carries a shape tag and a variable-length list of component
//! indices, packed into one flat index array with per-element starts. The
//! backing storage is owned by the surrounding cell set.

use crate::exec_error::MeshExecError;
use crate::topology::connectivity::{ElementComponents, ElementConnectivity, MAX_ELEMENT_ARITY};
use crate::topology::shape::ShapeType;

/// Adjacency table mapping each element to a shape tag and a
/// variable-length component-index list.
///
/// # Invariants
/// - `shapes.len() == starts.len()`; `starts` is non-decreasing.
/// - Every element's component count is at most [`MAX_ELEMENT_ARITY`]
///   (enforced on insertion).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExplicitConnectivity {
    shapes: Vec<ShapeType>,
    starts: Vec<u32>,
    indices: Vec<u32>,
}

impl ExplicitConnectivity {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with room for `n_elements` elements of roughly
    /// `arity_hint` components each.
    pub fn with_capacity(n_elements: usize, arity_hint: usize) -> Self {
        ExplicitConnectivity {
            shapes: Vec::with_capacity(n_elements),
            starts: Vec::with_capacity(n_elements),
            indices: Vec::with_capacity(n_elements * arity_hint),
        }
    }

    /// Append one element with its component indices.
    ///
    /// # Errors
    /// Returns `Err(ArityOverflow)` when `ids.len() > MAX_ELEMENT_ARITY`;
    /// exactly `MAX_ELEMENT_ARITY` components is accepted.
    pub fn push_element(&mut self, shape: ShapeType, ids: &[u32]) -> Result<u32, MeshExecError> {
        if ids.len() > MAX_ELEMENT_ARITY {
            return Err(MeshExecError::ArityOverflow {
                count: ids.len(),
                max: MAX_ELEMENT_ARITY,
            });
        }
        let element = self.shapes.len() as u32;
        self.starts.push(self.indices.len() as u32);
        self.indices.extend_from_slice(ids);
        self.shapes.push(shape);
        Ok(element)
    }

    /// Total number of component indices stored across all elements.
    pub fn total_components(&self) -> usize {
        self.indices.len()
    }
}

impl ElementConnectivity for ExplicitConnectivity {
    fn len(&self) -> usize {
        self.shapes.len()
    }

    fn element_components(&self, element: u32) -> ElementComponents {
        let e = element as usize;
        let start = self.starts[e] as usize;
        let end = self
            .starts
            .get(e + 1)
            .map(|&s| s as usize)
            .unwrap_or(self.indices.len());
        let count = end - start;
        let mut indices = [0u32; MAX_ELEMENT_ARITY];
        indices[..count].copy_from_slice(&self.indices[start..end]);
        ElementComponents {
            shape: self.shapes[e],
            count,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_query() {
        let mut conn = ExplicitConnectivity::new();
        conn.push_element(ShapeType::Triangle, &[0, 1, 2]).unwrap();
        conn.push_element(ShapeType::Quadrilateral, &[1, 2, 4, 3]).unwrap();
        assert_eq!(conn.len(), 2);

        let tri = conn.element_components(0);
        assert_eq!(tri.shape, ShapeType::Triangle);
        assert_eq!(tri.ids(), &[0, 1, 2]);

        let quad = conn.element_components(1);
        assert_eq!(quad.shape, ShapeType::Quadrilateral);
        assert_eq!(quad.ids(), &[1, 2, 4, 3]);
    }

    #[test]
    fn arity_bound_is_inclusive() {
        let mut conn = ExplicitConnectivity::new();
        let full: Vec<u32> = (0..MAX_ELEMENT_ARITY as u32).collect();
        conn.push_element(ShapeType::Hexahedron, &full).unwrap();
        assert_eq!(conn.element_components(0).count, MAX_ELEMENT_ARITY);

        let too_many: Vec<u32> = (0..=MAX_ELEMENT_ARITY as u32).collect();
        assert_eq!(
            conn.push_element(ShapeType::Hexahedron, &too_many).unwrap_err(),
            MeshExecError::ArityOverflow {
                count: MAX_ELEMENT_ARITY + 1,
                max: MAX_ELEMENT_ARITY
            }
        );
        // the failed push must not have grown the table
        assert_eq!(conn.len(), 1);
    }

    #[test]
    fn variable_arities_pack_correctly() {
        let mut conn = ExplicitConnectivity::new();
        conn.push_element(ShapeType::Segment, &[5, 6]).unwrap();
        conn.push_element(ShapeType::Tetrahedron, &[0, 1, 2, 3]).unwrap();
        conn.push_element(ShapeType::Vertex, &[9]).unwrap();
        assert_eq!(conn.element_components(0).ids(), &[5, 6]);
        assert_eq!(conn.element_components(1).ids(), &[0, 1, 2, 3]);
        assert_eq!(conn.element_components(2).ids(), &[9]);
        assert_eq!(conn.total_components(), 7);
    }

    #[test]
    fn serde_roundtrip() {
        let mut conn = ExplicitConnectivity::new();
        conn.push_element(ShapeType::Triangle, &[0, 1, 2]).unwrap();
        let s = serde_json::to_string(&conn).unwrap();
        let back: ExplicitConnectivity = serde_json::from_str(&s).unwrap();
        assert_eq!(back, conn);
    }
}
