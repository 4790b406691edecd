#![allow(clippy::unwrap_used)]

use super::{marker, tracker_for};
use crate::ast::{AstBuilder, Qualifier, QualifierKind};
use crate::facts::{MemoryGraph, Via};

/// A target in the origin context itself needs no using steps.
#[test]
fn test_lookup_direct_visibility_is_empty() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let ast = b.finish();

    let mut tracker = tracker_for(&ast);
    let ctx = tracker.context_for(&ast, n).unwrap();
    let via = tracker.resolve_visibility(&ast, ctx, f, ctx, None);
    assert!(via.is_empty());
}

/// A target visible only through parent scopes also needs no steps.
#[test]
fn test_lookup_through_enclosing_scope_is_empty() {
    let mut b = AstBuilder::new();
    let f = b.function(b.root(), "f");
    let n = b.namespace(b.root(), "N");
    let ast = b.finish();

    let mut tracker = tracker_for(&ast);
    let origin = tracker.context_for(&ast, n).unwrap();
    let target_ctx = tracker.context_for(&ast, ast.root()).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert!(via.is_empty());
}

/// An unreachable target yields an empty chain, same as a direct hit.
#[test]
fn test_lookup_exhausted_is_empty() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let m = b.namespace(b.root(), "M");
    let ast = b.finish();

    let mut tracker = tracker_for(&ast);
    let origin = tracker.context_for(&ast, m).unwrap();
    let target_ctx = tracker.context_for(&ast, n).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert!(via.is_empty());
}

/// A single using declaration shows up as the one step of the chain.
#[test]
fn test_lookup_through_using_declaration() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let m = b.namespace(b.root(), "M");
    let using = b.using_declaration(m, "f", Some(Qualifier::namespace(n)), vec![f]);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact = marker(&mut graph, "using N::f");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_decl(&ast, using, fact);

    let origin = tracker.context_for(&ast, m).unwrap();
    let target_ctx = tracker.context_for(&ast, n).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert_eq!(via, vec![Via::UsingDeclaration(fact)]);
}

/// Chained using declarations list the step closest to the origin first.
#[test]
fn test_lookup_transitive_chain_order() {
    let mut b = AstBuilder::new();
    let a = b.namespace(b.root(), "A");
    let f = b.function(a, "f");
    let n_b = b.namespace(b.root(), "B");
    let using_a = b.using_declaration(n_b, "f", Some(Qualifier::namespace(a)), vec![f]);
    let n_c = b.namespace(b.root(), "C");
    let using_b = b.using_declaration(n_c, "f", Some(Qualifier::namespace(n_b)), vec![f]);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact_a = marker(&mut graph, "using A::f");
    let fact_b = marker(&mut graph, "using B::f");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_decl(&ast, using_a, fact_a);
    tracker.add_using_decl(&ast, using_b, fact_b);

    let origin = tracker.context_for(&ast, n_c).unwrap();
    let target_ctx = tracker.context_for(&ast, a).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert_eq!(
        via,
        vec![Via::UsingDeclaration(fact_b), Via::UsingDeclaration(fact_a)]
    );
}

/// A class-scope using declaration is not a lookup step.
#[test]
fn test_lookup_ignores_class_scope_using() {
    let mut b = AstBuilder::new();
    let base = b.record(b.root(), "Base", crate::ast::RecordKind::Class);
    let f = b.function(base, "f");
    let derived = b.record(b.root(), "Derived", crate::ast::RecordKind::Class);
    let using = b.using_declaration(derived, "f", Some(Qualifier::record(base)), vec![f]);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact = marker(&mut graph, "using Base::f");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_decl(&ast, using, fact);

    let origin = tracker.context_for(&ast, derived).unwrap();
    let target_ctx = tracker.context_for(&ast, base).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert!(via.is_empty());
}

/// A using directive contributes a forwarding edge with its fact.
#[test]
fn test_lookup_through_using_directive() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let directive = b.using_directive(b.root(), n, None);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact = marker(&mut graph, "using namespace N");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_directive(&ast, directive, fact);

    let origin = tracker.context_for(&ast, ast.root()).unwrap();
    let target_ctx = tracker.context_for(&ast, n).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert_eq!(via, vec![Via::UsingDirective(Some(fact))]);
}

/// When several directives reach the target, the latest one wins.
#[test]
fn test_lookup_prefers_later_directive() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let a = b.namespace(b.root(), "A");
    let using_in_a = b.using_declaration(a, "f", Some(Qualifier::namespace(n)), vec![f]);
    let d1 = b.using_directive(b.root(), a, None);
    let d2 = b.using_directive(b.root(), n, None);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact_import = marker(&mut graph, "using N::f");
    let fact_d1 = marker(&mut graph, "using namespace A");
    let fact_d2 = marker(&mut graph, "using namespace N");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_decl(&ast, using_in_a, fact_import);
    tracker.add_using_directive(&ast, d1, fact_d1);
    tracker.add_using_directive(&ast, d2, fact_d2);

    let origin = tracker.context_for(&ast, ast.root()).unwrap();
    let target_ctx = tracker.context_for(&ast, n).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert_eq!(via, vec![Via::UsingDirective(Some(fact_d2))]);
}

/// Mutually nominating directives terminate and simply fail.
#[test]
fn test_lookup_directive_cycle_terminates() {
    let mut b = AstBuilder::new();
    let a = b.namespace(b.root(), "A");
    let n_b = b.namespace(b.root(), "B");
    let d_ab = b.using_directive(a, n_b, None);
    let d_ba = b.using_directive(n_b, a, None);
    let c = b.namespace(b.root(), "C");
    let f = b.function(c, "f");
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact_ab = marker(&mut graph, "a: using namespace B");
    let fact_ba = marker(&mut graph, "b: using namespace A");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_directive(&ast, d_ab, fact_ab);
    tracker.add_using_directive(&ast, d_ba, fact_ba);

    let origin = tracker.context_for(&ast, a).unwrap();
    let target_ctx = tracker.context_for(&ast, c).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert!(via.is_empty());
}

/// Anonymous namespaces forward without a backing fact.
#[test]
fn test_lookup_through_anonymous_namespace() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let anon = b.anonymous_namespace(n);
    let f = b.function(anon, "f");
    let ast = b.finish();

    let mut tracker = tracker_for(&ast);
    tracker.add_namespace(&ast, anon);

    let origin = tracker.context_for(&ast, n).unwrap();
    let target_ctx = tracker.context_for(&ast, anon).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert_eq!(via, vec![Via::UsingDirective(None)]);
}

/// Inline namespaces behave like anonymous ones for lookup.
#[test]
fn test_lookup_through_inline_namespace() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let v1 = b.inline_namespace(n, "v1");
    let f = b.function(v1, "f");
    let ast = b.finish();

    let mut tracker = tracker_for(&ast);
    tracker.add_namespace(&ast, v1);

    let origin = tracker.context_for(&ast, n).unwrap();
    let target_ctx = tracker.context_for(&ast, v1).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert_eq!(via, vec![Via::UsingDirective(None)]);
}

/// A using declaration whose qualifier names no context still counts as
/// found, ending the walk with the steps collected so far.
#[test]
fn test_lookup_unresolvable_qualifier_ends_walk() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let m = b.namespace(b.root(), "M");
    let qualifier = Qualifier {
        kind: QualifierKind::Other,
        prefix: None,
        range: None,
    };
    let using = b.using_declaration(m, "f", Some(qualifier), vec![f]);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact = marker(&mut graph, "using <dependent>::f");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_decl(&ast, using, fact);

    let origin = tracker.context_for(&ast, m).unwrap();
    let target_ctx = tracker.context_for(&ast, n).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert_eq!(via, vec![Via::UsingDeclaration(fact)]);
}

/// A directive nominating its own namespace records no edge.
#[test]
fn test_lookup_self_directive_records_no_edge() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let directive = b.using_directive(n, n, None);
    let m = b.namespace(b.root(), "M");
    let f = b.function(m, "f");
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let fact = marker(&mut graph, "using namespace N");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_directive(&ast, directive, fact);
    assert!(tracker.forwards.is_empty());

    let origin = tracker.context_for(&ast, n).unwrap();
    let target_ctx = tracker.context_for(&ast, m).unwrap();
    let via = tracker.resolve_visibility(&ast, origin, f, target_ctx, None);
    assert!(via.is_empty());
}
