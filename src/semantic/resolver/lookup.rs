//! The visibility walk: how a declaration is reachable from a context
//! through enclosing scopes, using declarations, and using directives.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use crate::ast::{Ast, DeclId};
use crate::facts::Via;
use crate::semantic::context::ContextId;
use crate::semantic::resolver::using_tracker::UsingTracker;

/// Outcome of probing one context for the target.
enum Probe {
    /// Target found here.
    Hit,
    /// A using declaration imports the target; resume the walk from its
    /// qualifier's context (`None` when the qualifier names no context).
    Chain(Option<ContextId>),
    Miss,
}

struct LookupState {
    target: DeclId,
    target_context: ContextId,
    /// Second home context for unscoped enumerators.
    enum_parent: Option<ContextId>,
    /// Steps accumulated closest-to-target first.
    via: VecDeque<Via>,
    visited: FxHashSet<ContextId>,
}

impl UsingTracker {
    /// Computes how `target` (canonicalized internally) is visible from
    /// `origin`, as the chain of using steps crossed on the way, ordered
    /// from the step closest to the origin to the step closest to the
    /// target. Empty when the target is visible through plain scope
    /// nesting, and also when no path exists at all.
    pub fn resolve_visibility(
        &mut self,
        ast: &Ast,
        origin: ContextId,
        target: DeclId,
        target_context: ContextId,
        enum_parent: Option<ContextId>,
    ) -> Vec<Via> {
        let mut state = LookupState {
            target: ast.canonical(target),
            target_context,
            enum_parent,
            via: VecDeque::new(),
            visited: FxHashSet::default(),
        };
        let mut found = false;
        let mut context = Some(origin);
        while let Some(ctx) = context {
            match self.probe(ctx, &mut state) {
                Probe::Hit => {
                    found = true;
                    break;
                }
                Probe::Chain(Some(next)) => context = Some(next),
                Probe::Chain(None) => {
                    // The qualifier of the matching using declaration names
                    // no context we can continue from; accept what we have.
                    warn!(
                        target_decl = ?state.target,
                        "using-declaration qualifier has no context; ending walk"
                    );
                    found = true;
                    break;
                }
                Probe::Miss => context = self.contexts.parent(ast, ctx),
            }
        }
        if !found {
            trace!(target_decl = ?state.target, "visibility walk exhausted");
            return Vec::new();
        }
        // Internal order is closest-to-target first; callers want the
        // origin's end first.
        state.via.into_iter().rev().collect()
    }

    /// Searches one context and, depth-first in reverse declaration order,
    /// the contexts its forwarding edges nominate. First success wins.
    fn probe(&mut self, ctx: ContextId, state: &mut LookupState) -> Probe {
        if !state.visited.insert(ctx) {
            return Probe::Miss;
        }
        if ctx == state.target_context || Some(ctx) == state.enum_parent {
            return Probe::Hit;
        }
        if let Some(import) = self.using_decls.get(&(ctx, state.target)) {
            state.via.push_front(Via::UsingDeclaration(import.fact));
            return Probe::Chain(import.qualifier);
        }
        let Some(edges) = self.forwards.get(&ctx).cloned() else {
            return Probe::Miss;
        };
        let mark = state.via.len();
        for edge in edges.iter().rev() {
            match self.probe(edge.nominated, state) {
                Probe::Miss => continue,
                outcome => {
                    // Slot this directive after the steps the recursive
                    // probe prepended and before everything older.
                    let inserted = state.via.len() - mark;
                    state
                        .via
                        .insert(inserted, Via::UsingDirective(edge.fact));
                    return outcome;
                }
            }
        }
        Probe::Miss
    }
}
