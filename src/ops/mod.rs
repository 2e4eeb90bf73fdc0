//! Operations: backend-polymorphic units of data-parallel work.
//!
//! An operation owns its operands (array views, connectivity handle, index
//! array, functor), is constructed per invocation, and exposes exactly two
//! entry points: [`run_host`](scatter::ScatterOp::run_host) and
//! [`run_accelerator`](scatter::ScatterOp::run_accelerator). Backend
//! selection is the caller's choice of entry point; dispatch only resolves
//! the monomorphized execution routine for the operand types.
#![warn(missing_docs)]

pub mod dispatch;
pub mod scatter;
pub mod sparse_map;

pub use scatter::ScatterOp;
pub use sparse_map::{CombinedTopologySparseMapOp, TopologyFunctor};
