//! Execution backends.
//!
//! Backend selection happens at the operation entry points (`run_host` /
//! `run_accelerator`); this module only answers the capability question
//! and, when compiled with `wgpu-support`, owns the accelerator device
//! plumbing. A build without the feature reports the accelerator as
//! unavailable and every accelerator entry point fails with a typed
//! configuration error; there is no silent host fallback.
#![warn(missing_docs)]

#[cfg(feature = "wgpu-support")]
pub mod gpu;

/// Whether an accelerator backend can execute operations in this process.
///
/// `false` when compiled without `wgpu-support` or when no suitable device
/// adapter exists at runtime.
pub fn accelerator_available() -> bool {
    #[cfg(feature = "wgpu-support")]
    {
        gpu::GpuContext::global().is_ok()
    }
    #[cfg(not(feature = "wgpu-support"))]
    {
        false
    }
}

#[cfg(all(test, not(feature = "wgpu-support")))]
mod tests {
    #[test]
    fn accelerator_unavailable_without_feature() {
        assert!(!super::accelerator_available());
    }
}
