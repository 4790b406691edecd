//! Canonical context handles.
//!
//! Resolution never compares declarations directly: every container is
//! first canonicalized (first redeclaration of the entity), then interned
//! here, so `ContextId` equality is entity identity. `namespace A` opened
//! twice is one context.

use rustc_hash::FxHashMap;

use crate::ast::{Ast, DeclId};

/// Interned canonical context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u32);

impl ContextId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct ContextArena {
    by_decl: FxHashMap<DeclId, ContextId>,
    decls: Vec<DeclId>,
    global: ContextId,
}

impl ContextArena {
    pub fn new(ast: &Ast) -> Self {
        let mut arena = ContextArena {
            by_decl: FxHashMap::default(),
            decls: Vec::new(),
            global: ContextId(0),
        };
        arena.global = arena.intern(ast.canonical(ast.root()));
        arena
    }

    /// The translation-unit context.
    pub fn global(&self) -> ContextId {
        self.global
    }

    /// Canonicalizes a container declaration into a context handle. Total:
    /// fails only when the input is absent.
    pub fn canonicalize(&mut self, ast: &Ast, decl: Option<DeclId>) -> Option<ContextId> {
        let decl = decl?;
        debug_assert!(ast.is_container(decl), "not a container: {}", ast.describe(decl));
        Some(self.intern(ast.canonical(decl)))
    }

    /// The context a declaration lives in: its nearest enclosing container,
    /// canonicalized. `None` for the translation unit itself.
    pub fn context_of(&mut self, ast: &Ast, decl: DeclId) -> Option<ContextId> {
        self.canonicalize(ast, ast.enclosing_container(decl))
    }

    /// Canonical declaration backing a context.
    pub fn decl(&self, ctx: ContextId) -> DeclId {
        self.decls[ctx.index()]
    }

    /// The next enclosing context, `None` at the translation unit.
    pub fn parent(&mut self, ast: &Ast, ctx: ContextId) -> Option<ContextId> {
        self.context_of(ast, self.decl(ctx))
    }

    fn intern(&mut self, canonical: DeclId) -> ContextId {
        if let Some(&ctx) = self.by_decl.get(&canonical) {
            return ctx;
        }
        let ctx = ContextId(self.decls.len() as u32);
        self.by_decl.insert(canonical, ctx);
        self.decls.push(canonical);
        ctx
    }
}
