#![allow(clippy::unwrap_used)]

use super::{marker, tracker_for};
use crate::ast::{AstBuilder, Qualifier};
use crate::facts::{FactPayload, MemoryGraph, Via, XRefTarget};

/// A target in the current context passes through untouched.
#[test]
fn test_retarget_same_context_unchanged() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let raw = XRefTarget::Declaration(marker(&mut graph, "decl f"));
    let mut tracker = tracker_for(&ast);
    let ctx = tracker.context_for(&ast, n).unwrap();
    tracker.swap_context(Some(ctx));

    let target = tracker.retarget(&ast, &mut graph, Some(f), raw.clone());
    assert_eq!(target, raw);
}

/// An unreachable target also passes through untouched.
#[test]
fn test_retarget_unreachable_unchanged() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let f = b.function(n, "f");
    let m = b.namespace(b.root(), "M");
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let raw = XRefTarget::Declaration(marker(&mut graph, "decl f"));
    let mut tracker = tracker_for(&ast);
    let ctx = tracker.context_for(&ast, m).unwrap();
    tracker.swap_context(Some(ctx));

    let target = tracker.retarget(&ast, &mut graph, Some(f), raw.clone());
    assert_eq!(target, raw);
}

/// A chain of two using declarations wraps the target twice, with the
/// outermost wrapper holding the step closest to the reference.
#[test]
fn test_retarget_wraps_outermost_first() {
    let mut b = AstBuilder::new();
    let a = b.namespace(b.root(), "A");
    let f = b.function(a, "f");
    let n_b = b.namespace(b.root(), "B");
    let using_a = b.using_declaration(n_b, "f", Some(Qualifier::namespace(a)), vec![f]);
    let n_c = b.namespace(b.root(), "C");
    let using_b = b.using_declaration(n_c, "f", Some(Qualifier::namespace(n_b)), vec![f]);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let decl_f = marker(&mut graph, "decl f");
    let fact_a = marker(&mut graph, "using A::f");
    let fact_b = marker(&mut graph, "using B::f");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_decl(&ast, using_a, fact_a);
    tracker.add_using_decl(&ast, using_b, fact_b);
    let ctx = tracker.context_for(&ast, n_c).unwrap();
    tracker.swap_context(Some(ctx));

    let target = tracker.retarget(&ast, &mut graph, Some(f), XRefTarget::Declaration(decl_f));
    let XRefTarget::Indirect(outer) = target else {
        panic!("expected an indirect target, got {target:?}");
    };
    let FactPayload::XRefIndirectTarget { via, target } = graph.fact(outer).unwrap().clone() else {
        panic!("expected an indirect-target fact");
    };
    assert_eq!(via, Via::UsingDeclaration(fact_b));
    let XRefTarget::Indirect(inner) = target else {
        panic!("expected a nested indirect target, got {target:?}");
    };
    let FactPayload::XRefIndirectTarget { via, target } = graph.fact(inner).unwrap().clone() else {
        panic!("expected an indirect-target fact");
    };
    assert_eq!(via, Via::UsingDeclaration(fact_a));
    assert_eq!(target, XRefTarget::Declaration(decl_f));
}

/// An unscoped enumerator is as visible as its enum's parent: no wrapping
/// when referenced from that parent.
#[test]
fn test_retarget_unscoped_enumerator_in_enum_parent() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let e = b.enum_(n, "E", false);
    let x = b.enumerator(e, "X");
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let raw = XRefTarget::Enumerator(marker(&mut graph, "enumerator X"));
    let mut tracker = tracker_for(&ast);
    let ctx = tracker.context_for(&ast, n).unwrap();
    tracker.swap_context(Some(ctx));

    let target = tracker.retarget(&ast, &mut graph, Some(x), raw.clone());
    assert_eq!(target, raw);
}

/// Reaching an unscoped enumerator through a directive to the enum's
/// parent records the directive; a scoped enumerator stays unreachable.
#[test]
fn test_retarget_enumerator_scoping() {
    let mut b = AstBuilder::new();
    let n = b.namespace(b.root(), "N");
    let unscoped = b.enum_(n, "E", false);
    let x = b.enumerator(unscoped, "X");
    let scoped = b.enum_(n, "S", true);
    let y = b.enumerator(scoped, "Y");
    let directive = b.using_directive(b.root(), n, None);
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let raw_x = XRefTarget::Enumerator(marker(&mut graph, "enumerator X"));
    let raw_y = XRefTarget::Enumerator(marker(&mut graph, "enumerator Y"));
    let fact = marker(&mut graph, "using namespace N");
    let mut tracker = tracker_for(&ast);
    tracker.add_using_directive(&ast, directive, fact);

    let target = tracker.retarget(&ast, &mut graph, Some(x), raw_x);
    let XRefTarget::Indirect(wrapper) = target else {
        panic!("expected an indirect target, got {target:?}");
    };
    let FactPayload::XRefIndirectTarget { via, .. } = graph.fact(wrapper).unwrap().clone() else {
        panic!("expected an indirect-target fact");
    };
    assert_eq!(via, Via::UsingDirective(Some(fact)));

    // `N::S::Y` is only visible through its enum, which the directive does
    // not open.
    let target = tracker.retarget(&ast, &mut graph, Some(y), raw_y.clone());
    assert_eq!(target, raw_y);
}
