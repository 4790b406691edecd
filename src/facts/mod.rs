//! Output model: content-addressed facts about declarations, definitions,
//! and cross-references.

pub mod payload;
pub mod sink;

pub use payload::{
    FactPayload, FactRef, FunctionNameRepr, MethodSignatureRepr,
    ObjcContainerIdRepr, ScopeRepr, Via, VariableKindRepr, XRefTarget,
};
pub use sink::{FactSink, MemoryGraph};
