mod tests_declarations;

use crate::ast::Ast;
use crate::facts::MemoryGraph;
use crate::semantic::indexer::{index_translation_unit, IndexConfig};

/// Indexes a tree into a fresh graph, failing the test on any error.
pub(super) fn index(ast: &Ast) -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    index_translation_unit(ast, &IndexConfig::default(), &mut graph)
        .expect("indexing failed");
    graph
}
