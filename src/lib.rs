//! # cxref
//!
//! Core library for indexing C++ (and message-based-object) translation
//! units: canonical declaration identity, using-aware name visibility, and
//! cross-reference production.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → Contexts, using tracker, visibility walk, fact producers
//!   ↓
//! facts     → Content-addressed output facts and sinks
//!   ↓
//! ast       → Input declaration/reference arena
//!   ↓
//! core      → Primitives (FileId, Name interning, Span)
//! ```

// ============================================================================
// MODULES (dependency order: core → ast → facts → semantic)
// ============================================================================

/// Foundation types: FileId, Name interning, Span
pub mod core;

/// Input model: declaration and reference arena for one translation unit
pub mod ast;

/// Output model: content-addressed facts, cross-references, sinks
pub mod facts;

/// Semantic analysis: contexts, using tracker, fact production
pub mod semantic;

// Re-export foundation types
pub use crate::core::{FileId, Interner, Name, Span};

// Re-export the main entry points
pub use ast::{Ast, AstBuilder, DeclId};
pub use facts::{FactPayload, FactRef, FactSink, MemoryGraph, Via, XRefTarget};
pub use semantic::{
    index_translation_unit, ContextId, IndexConfig, IndexError, IndexResult,
    Indexer, UsingTracker,
};
