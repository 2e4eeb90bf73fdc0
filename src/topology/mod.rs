//! Topology module: shape tags, connectivity tables, and cell sets.
//!
//! Two interchangeable connectivity implementations are provided: an
//! explicit variant backed by a stored adjacency table, and a regular
//! variant computed arithmetically from grid extents. Both answer the same
//! element-components query, so operation logic is agnostic to which is in
//! use.
#![warn(missing_docs)]

pub mod cell_set;
pub mod connectivity;
pub mod explicit;
pub mod regular;
pub mod shape;

pub use cell_set::{CellSet, ExplicitCells};
pub use connectivity::{Connectivity, ElementComponents, ElementConnectivity, MAX_ELEMENT_ARITY};
pub use explicit::ExplicitConnectivity;
pub use regular::{RegularConnectivity, RegularStructure, TopologyRelation};
pub use shape::ShapeType;
