//! Array module: strided indexing and non-owning array views.
#![warn(missing_docs)]

pub mod indexable;
pub mod indexer;

pub use indexable::{Indexable, IndexableMut};
pub use indexer::ArrayIndexer;
