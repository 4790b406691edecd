//! Tracking of using declarations, using directives, and the traversal's
//! current context.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ast::{Ast, DeclId, DeclKind, Qualifier, QualifierKind};
use crate::facts::{FactPayload, FactRef, FactSink, XRefTarget};
use crate::semantic::context::{ContextArena, ContextId};

/// One name-forwarding edge: anything not found in the source context may
/// be found in `nominated`. Written `using namespace` directives carry
/// their fact; edges synthesized for anonymous and inline namespaces carry
/// none.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ForwardEdge {
    pub nominated: ContextId,
    pub fact: Option<FactRef>,
}

/// A recorded `using` declaration shadow: the fact, plus the context its
/// qualifier names (where the search continues after this step).
#[derive(Debug, Clone, Copy)]
pub(crate) struct UsingImport {
    pub fact: FactRef,
    pub qualifier: Option<ContextId>,
}

pub struct UsingTracker {
    pub(crate) contexts: ContextArena,
    pub(crate) current: ContextId,
    /// Context saved on entry to the outermost qualified-name walk; nested
    /// segments resolve relative to it.
    pub(crate) saved: Option<ContextId>,
    pub(crate) forwards: FxHashMap<ContextId, Vec<ForwardEdge>>,
    pub(crate) using_decls: FxHashMap<(ContextId, DeclId), UsingImport>,
}

impl UsingTracker {
    pub fn new(ast: &Ast) -> Self {
        let contexts = ContextArena::new(ast);
        let current = contexts.global();
        UsingTracker {
            contexts,
            current,
            saved: None,
            forwards: FxHashMap::default(),
            using_decls: FxHashMap::default(),
        }
    }

    pub fn current_context(&self) -> ContextId {
        self.current
    }

    /// Canonical context for a container declaration.
    pub fn context_for(&mut self, ast: &Ast, decl: DeclId) -> Option<ContextId> {
        self.contexts.canonicalize(ast, Some(decl))
    }

    /// Registers a namespace. Anonymous and inline namespaces forward
    /// lookups from their parent without a written directive.
    pub fn add_namespace(&mut self, ast: &Ast, decl: DeclId) {
        let info = match &ast.decl(decl).kind {
            DeclKind::Namespace(info) => info,
            _ => return,
        };
        if !(info.anonymous || info.inline) {
            return;
        }
        let Some(parent) = self.contexts.context_of(ast, decl) else {
            return;
        };
        let Some(context) = self.contexts.canonicalize(ast, Some(decl)) else {
            return;
        };
        self.record_forward(parent, context, None);
    }

    /// Registers a `using` declaration's shadow targets. Class-scope using
    /// declarations (base-member imports) take no part in lookup.
    pub fn add_using_decl(&mut self, ast: &Ast, decl: DeclId, fact: FactRef) {
        let info = match &ast.decl(decl).kind {
            DeclKind::UsingDeclaration(info) => info.clone(),
            _ => return,
        };
        if let Some(container) = ast.enclosing_container(decl) {
            if matches!(ast.decl(container).kind, DeclKind::Record(_)) {
                return;
            }
        }
        let Some(context) = self.contexts.context_of(ast, decl) else {
            return;
        };
        let qualifier = self.specifier_context(ast, info.qualifier.as_ref());
        for target in info.targets {
            let canonical = ast.canonical(target);
            self.using_decls
                .insert((context, canonical), UsingImport { fact, qualifier });
        }
    }

    /// Registers a `using namespace` directive as a forwarding edge.
    pub fn add_using_directive(&mut self, ast: &Ast, decl: DeclId, fact: FactRef) {
        let nominated = match &ast.decl(decl).kind {
            DeclKind::UsingDirective(info) => info.nominated,
            _ => return,
        };
        let Some(context) = self.contexts.context_of(ast, decl) else {
            return;
        };
        let Some(nominated) = self.contexts.canonicalize(ast, Some(nominated)) else {
            return;
        };
        self.record_forward(context, nominated, Some(fact));
    }

    fn record_forward(&mut self, source: ContextId, nominated: ContextId, fact: Option<FactRef>) {
        // A context never forwards to itself.
        if source == nominated {
            return;
        }
        self.forwards
            .entry(source)
            .or_default()
            .push(ForwardEdge { nominated, fact });
    }

    /// Context named by a qualifier, if it maps to one. Global `::` is the
    /// translation unit; dependent or type-based qualifiers map to nothing.
    pub fn specifier_context(
        &mut self,
        ast: &Ast,
        qualifier: Option<&Qualifier>,
    ) -> Option<ContextId> {
        match qualifier?.kind {
            QualifierKind::Namespace(ns) => self.contexts.canonicalize(ast, Some(ns)),
            QualifierKind::Record(rec) => self.contexts.canonicalize(ast, Some(rec)),
            QualifierKind::Global => Some(self.contexts.global()),
            QualifierKind::Other => None,
        }
    }

    /// Rewrites a cross-reference target so it records the using chain
    /// that makes `base` visible from the current context. Targets already
    /// visible directly pass through unchanged.
    pub fn retarget<S: FactSink>(
        &mut self,
        ast: &Ast,
        sink: &mut S,
        base: Option<DeclId>,
        target: XRefTarget,
    ) -> XRefTarget {
        let Some(base) = base else {
            return target;
        };
        let decl = ast.canonical(base);
        let Some(decl_context) = self.contexts.context_of(ast, decl) else {
            return target;
        };
        if decl_context == self.current {
            return target;
        }
        // Unscoped enumerators are visible wherever their enum's parent is.
        let mut enum_parent = None;
        let context_decl = self.contexts.decl(decl_context);
        if let DeclKind::Enum(info) = &ast.decl(context_decl).kind {
            if !info.scoped {
                enum_parent = self.contexts.context_of(ast, context_decl);
                if enum_parent == Some(self.current) {
                    return target;
                }
            }
        }
        let via = self.resolve_visibility(ast, self.current, decl, decl_context, enum_parent);
        if via.is_empty() {
            return target;
        }
        trace!(steps = via.len(), "wrapping indirect target");
        // The outermost wrapper is the step closest to the reference, so
        // wrap innermost-first.
        let mut target = target;
        for step in via.into_iter().rev() {
            let fact = sink.intern_fact(FactPayload::XRefIndirectTarget {
                via: step,
                target: target.clone(),
            });
            target = XRefTarget::Indirect(fact);
        }
        target
    }

    pub(crate) fn swap_context(&mut self, context: Option<ContextId>) -> Option<ContextId> {
        context.map(|ctx| std::mem::replace(&mut self.current, ctx))
    }

    pub(crate) fn restore_context(&mut self, saved: Option<ContextId>) {
        if let Some(ctx) = saved {
            self.current = ctx;
        }
    }
}
