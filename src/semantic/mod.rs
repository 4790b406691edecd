//! Semantic analysis of a translation unit: canonical contexts, name
//! visibility, and fact production.

pub mod context;
pub mod error;
pub mod indexer;
pub mod memo;
pub mod resolver;

pub use context::{ContextArena, ContextId};
pub use error::{IndexError, IndexResult};
pub use indexer::{index_translation_unit, IndexConfig, Indexer};
pub use resolver::UsingTracker;
