use thiserror::Error;

use crate::ast::DeclId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A declaration's fact was requested while that same fact was being
    /// computed. The producers are written so this cannot happen; hitting
    /// it means a cycle in the declaration graph.
    #[error("cycle while computing {tag} facts for declaration {decl:?}")]
    MemoCycle { tag: &'static str, decl: DeclId },

    /// The unit carries front-end diagnostics and indexing on error is
    /// disabled.
    #[error("translation unit has compilation errors")]
    CompilationErrors,
}

pub type IndexResult<T> = Result<T, IndexError>;
