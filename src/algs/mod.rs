//! Algorithms built on top of the operation core.
#![warn(missing_docs)]

pub mod threshold;

pub use threshold::ThresholdSelector;
