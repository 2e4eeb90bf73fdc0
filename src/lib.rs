#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-exec
//!
//! mesh-exec is a data-parallel execution engine for operations over scientific
//! mesh data: it applies a user-supplied functor to every element of a
//! topological structure (nodes, cells) on a chosen execution backend,
//! reading from and writing to strided, possibly multi-component, possibly
//! sparsely-indexed flat arrays. One functor executes identically over
//! structured (regular-grid) and explicit (variable-shape) topologies,
//! on either backend, without the caller writing backend- or
//! topology-specific code.
//!
//! ## Features
//! - [`ArrayIndexer`](array::ArrayIndexer) / [`Indexable`](array::Indexable):
//!   strided, multi-component, and broadcast array access through one pure
//!   arithmetic map
//! - Explicit and regular connectivity behind a single element-components
//!   query, resolved once per operation invocation
//! - [`ScatterOp`](ops::ScatterOp) and
//!   [`CombinedTopologySparseMapOp`](ops::CombinedTopologySparseMapOp),
//!   each with `run_host` and `run_accelerator` entry points
//! - Threshold selection producing the sparse index lists the sparse map
//!   consumes
//!
//! ## Backends
//! Host execution partitions the item range across rayon workers (the
//! `rayon` feature, on by default; without it the loop runs sequentially
//! with identical results). Accelerator execution is a grid-strided wgpu
//! compute kernel behind the `wgpu-support` feature. Invoking an
//! accelerator entry point without that feature is a typed configuration
//! error, never a silent host fallback; see
//! [`backend::accelerator_available`] for the capability query.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-exec = "0.1"
//! # Optional features:
//! # features = ["wgpu-support"]
//! ```
//!
//! ```rust
//! use mesh_exec::prelude::*;
//!
//! let input = [8.0f64, 5.0, 9.0];
//! let indices = [2u32, 1, 4];
//! let mut output = [0.0f64; 5];
//! ScatterOp::new(
//!     [Indexable::new(&input)],
//!     [IndexableMut::new(&mut output)],
//!     Indexable::new(&indices),
//!     3,
//! )
//! .run_host()?;
//! assert_eq!(output, [0.0, 5.0, 8.0, 0.0, 9.0]);
//! # Ok::<(), mesh_exec::exec_error::MeshExecError>(())
//! ```

pub mod algs;
pub mod array;
pub mod backend;
pub mod exec_error;
pub mod ops;
pub mod topology;

/// A convenient prelude importing the most-used traits and types.
pub mod prelude {
    pub use crate::algs::threshold::ThresholdSelector;
    pub use crate::array::indexable::{Indexable, IndexableMut};
    pub use crate::array::indexer::ArrayIndexer;
    pub use crate::backend::accelerator_available;
    pub use crate::exec_error::MeshExecError;
    pub use crate::ops::scatter::ScatterOp;
    pub use crate::ops::sparse_map::{CombinedTopologySparseMapOp, TopologyFunctor};
    pub use crate::topology::cell_set::{CellSet, ExplicitCells};
    pub use crate::topology::connectivity::{
        Connectivity, ElementComponents, ElementConnectivity, MAX_ELEMENT_ARITY,
    };
    pub use crate::topology::explicit::ExplicitConnectivity;
    pub use crate::topology::regular::{RegularConnectivity, RegularStructure, TopologyRelation};
    pub use crate::topology::shape::ShapeType;
}
