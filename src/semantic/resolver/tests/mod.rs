mod tests_lookup;
mod tests_retarget;

use crate::ast::Ast;
use crate::facts::{FactPayload, FactRef, FactSink, MemoryGraph};
use crate::semantic::resolver::UsingTracker;

/// Interns a stand-in fact for a using declaration or directive.
pub(super) fn marker(graph: &mut MemoryGraph, label: &str) -> FactRef {
    graph.intern_fact(FactPayload::name(label))
}

pub(super) fn tracker_for(ast: &Ast) -> UsingTracker {
    UsingTracker::new(ast)
}
