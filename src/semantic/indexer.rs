//! Declaration and cross-reference production.

mod declare;
mod visit;

pub use visit::{index_translation_unit, IndexConfig, Indexer};

#[cfg(test)]
mod tests;
