//! MeshExecError: unified error type for mesh-exec public APIs.
//!
//! Every fallible operation in the crate reports failures through this enum
//! so callers can match on one type regardless of which backend or component
//! produced the error.

use thiserror::Error;

/// Unified error type for mesh-exec operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshExecError {
    /// The accelerator entry point was invoked in a build compiled without
    /// accelerator support. Never downgraded to host execution.
    #[error(
        "operation `{op}` invoked on the accelerator in a build without accelerator support \
         (enable the `wgpu-support` feature)"
    )]
    AcceleratorUnsupported {
        /// Name of the failing operation.
        op: &'static str,
    },
    /// The operation family has no accelerator kernel; running it on the
    /// device would produce wrong results, so the call fails instead.
    #[error("operation `{op}` has no accelerator kernel; run it on the host")]
    AcceleratorKernelMissing {
        /// Name of the failing operation.
        op: &'static str,
    },
    /// Accelerator device initialization or submission failed.
    #[error("accelerator device error: {0}")]
    AcceleratorDevice(String),
    /// Mapping an accelerator buffer back to host memory failed.
    #[error("failed to map accelerator buffer for readback")]
    GpuMappingFailed,
    /// An operand array is too short for the declared item count under its
    /// indexer. A programmer error; not recovered from.
    #[error("operation `{op}`: {what} too short (needs at least {expected} values, found {found})")]
    ItemCountMismatch {
        /// Name of the failing operation.
        op: &'static str,
        /// Which operand failed the check.
        what: &'static str,
        /// Minimum number of physical values required.
        expected: usize,
        /// Number of physical values actually present.
        found: usize,
    },
    /// An element was declared with more components than the system-wide
    /// maximum arity allows.
    #[error("element has {count} components, exceeding the maximum arity {max}")]
    ArityOverflow {
        /// Declared component count.
        count: usize,
        /// The crate-wide bound, [`MAX_ELEMENT_ARITY`](crate::topology::MAX_ELEMENT_ARITY).
        max: usize,
    },
    /// A sparse index array names the same element twice; the per-element
    /// outputs would collide.
    #[error("operation `{op}`: sparse index {index} selected more than once")]
    DuplicateSparseIndex {
        /// Name of the failing operation.
        op: &'static str,
        /// The repeated element index.
        index: u32,
    },
    /// An indexer was constructed with a zero `divisor` or `modulus`.
    #[error("array indexer field `{field}` must be non-zero")]
    InvalidIndexer {
        /// Name of the offending field.
        field: &'static str,
    },
    /// An explicit cell set has no stored table for the requested relation.
    #[error("explicit cell set has no stored `{relation}` connectivity")]
    MissingConnectivity {
        /// Name of the requested topology relation.
        relation: &'static str,
    },
}
