#![allow(clippy::unwrap_used)]

use smol_str::SmolStr;

use super::index;
use crate::ast::{AstBuilder, RecordKind};
use crate::facts::{FactPayload, MemoryGraph, ObjcContainerIdRepr, ScopeRepr};
use crate::semantic::indexer::{index_translation_unit, IndexConfig};
use crate::semantic::IndexError;

/// Nested namespaces produce a chain of qualified names.
#[test]
fn test_namespace_qname_chain() {
    let mut b = AstBuilder::new();
    let a = b.namespace(b.root(), "A");
    b.namespace(a, "B");
    let ast = b.finish();

    let graph = index(&ast);
    let name_a = graph.find(&FactPayload::name("A")).unwrap();
    let qname_a = graph
        .find(&FactPayload::NamespaceQName {
            name: Some(name_a),
            parent: None,
        })
        .unwrap();
    let name_b = graph.find(&FactPayload::name("B")).unwrap();
    let qname_b = graph.find(&FactPayload::NamespaceQName {
        name: Some(name_b),
        parent: Some(qname_a),
    });
    assert!(qname_b.is_some(), "inner namespace should name its parent");
}

/// An anonymous namespace has a nameless qualified name.
#[test]
fn test_anonymous_namespace_qname() {
    let mut b = AstBuilder::new();
    b.anonymous_namespace(b.root());
    let ast = b.finish();

    let graph = index(&ast);
    assert!(graph
        .find(&FactPayload::NamespaceQName {
            name: None,
            parent: None,
        })
        .is_some());
}

/// Every namespace occurrence contributes a definition fact.
#[test]
fn test_namespace_definition_emitted() {
    let mut b = AstBuilder::new();
    b.namespace(b.root(), "A");
    let ast = b.finish();

    let graph = index(&ast);
    assert!(graph
        .facts()
        .any(|(_, p)| matches!(p, FactPayload::NamespaceDefinition { .. })));
}

/// A record definition lists its members in document order.
#[test]
fn test_record_definition_members() {
    let mut b = AstBuilder::new();
    let s = b.record(b.root(), "S", RecordKind::Struct);
    b.field(s, "x", "int");
    b.field(s, "y", "int");
    let ast = b.finish();

    let graph = index(&ast);
    let definition = graph
        .facts()
        .find_map(|(_, p)| match p {
            FactPayload::RecordDefinition { members, .. } => Some(members.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(definition.len(), 2);
    let first = graph.fact(definition[0]).unwrap();
    let name_x = graph.find(&FactPayload::name("x")).unwrap();
    match first {
        FactPayload::VariableDeclaration { qname, .. } => {
            let FactPayload::QName { name, .. } = graph.fact(*qname).unwrap() else {
                panic!("expected a qualified name");
            };
            assert_eq!(*name, name_x);
        }
        other => panic!("expected a variable declaration, got {other:?}"),
    }
}

/// A forward declaration and its later definition are linked exactly once.
#[test]
fn test_forward_declaration_linked_to_definition() {
    let mut b = AstBuilder::new();
    let fwd = b.record_forward(b.root(), "S", RecordKind::Struct);
    let def = b.record_forward(b.root(), "S", RecordKind::Struct);
    b.set_canonical(def, fwd);
    b.set_definition(&[fwd, def], def);
    let ast = b.finish();

    let graph = index(&ast);
    assert_eq!(graph.same_as().len(), 1, "one link between the two facts");
    let (decl, same_as) = graph.same_as()[0];
    assert!(matches!(
        graph.fact(decl).unwrap(),
        FactPayload::RecordDeclaration { .. }
    ));
    assert!(matches!(
        graph.fact(same_as).unwrap(),
        FactPayload::RecordDeclaration { .. }
    ));
    assert_ne!(decl, same_as);
}

/// Redeclarations of an entity share one qualified name fact.
#[test]
fn test_redeclarations_share_qname() {
    let mut b = AstBuilder::new();
    let first = b.function(b.root(), "f");
    let second = b.function(b.root(), "f");
    b.set_canonical(second, first);
    b.set_definition(&[first, second], second);
    let ast = b.finish();

    let graph = index(&ast);
    let qnames = graph
        .facts()
        .filter(|(_, p)| matches!(p, FactPayload::FunctionQName { .. }))
        .count();
    assert_eq!(qnames, 1);
    assert_eq!(graph.same_as().len(), 1);
}

/// An enum definition collects its enumerators.
#[test]
fn test_enum_definition_enumerators() {
    let mut b = AstBuilder::new();
    let e = b.enum_(b.root(), "E", false);
    b.enumerator(e, "X");
    b.enumerator(e, "Y");
    let ast = b.finish();

    let graph = index(&ast);
    let enumerators = graph
        .facts()
        .find_map(|(_, p)| match p {
            FactPayload::EnumDefinition { enumerators, .. } => Some(enumerators.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(enumerators.len(), 2);
    assert!(matches!(
        graph.fact(enumerators[0]).unwrap(),
        FactPayload::Enumerator { .. }
    ));
}

/// Containers without facts are skipped when computing a scope: a record
/// local to a deleted function scopes to the next level up.
#[test]
fn test_scope_skips_factless_containers() {
    let mut b = AstBuilder::new();
    let f = b.function(b.root(), "f");
    b.set_deleted(f);
    let s = b.decl(
        f,
        Some("S"),
        crate::ast::DeclKind::Record(crate::ast::RecordInfo {
            kind: RecordKind::Struct,
            definition: None,
            instantiated_from: None,
            specialized_from: None,
            injected: false,
            bases: Vec::new(),
        }),
    );
    b.set_definition(&[s], s);
    let ast = b.finish();

    let graph = index(&ast);
    let name_s = graph.find(&FactPayload::name("S")).unwrap();
    let qname = graph.find(&FactPayload::QName {
        name: name_s,
        scope: ScopeRepr::Global,
    });
    assert!(qname.is_some(), "scope should fall back to the global scope");
}

/// Units with front-end errors are rejected unless indexing on error is
/// enabled.
#[test]
fn test_compilation_errors_respect_config() {
    let mut b = AstBuilder::new();
    b.namespace(b.root(), "A");
    b.mark_errors();
    let ast = b.finish();

    let mut graph = MemoryGraph::new();
    let result = index_translation_unit(&ast, &IndexConfig::default(), &mut graph);
    assert_eq!(result, Err(IndexError::CompilationErrors));
    assert_eq!(graph.fact_count(), 0);

    let config = IndexConfig {
        index_on_error: true,
    };
    index_translation_unit(&ast, &config, &mut graph).unwrap();
    assert!(graph.fact_count() > 0);
}

/// Injected class names produce no facts.
#[test]
fn test_injected_record_has_no_fact() {
    let mut b = AstBuilder::new();
    let s = b.record(b.root(), "S", RecordKind::Class);
    let injected = b.decl(
        s,
        Some("S"),
        crate::ast::DeclKind::Record(crate::ast::RecordInfo {
            kind: RecordKind::Class,
            definition: None,
            instantiated_from: None,
            specialized_from: None,
            injected: true,
            bases: Vec::new(),
        }),
    );
    let _ = injected;
    let ast = b.finish();

    let graph = index(&ast);
    let records = graph
        .facts()
        .filter(|(_, p)| matches!(p, FactPayload::RecordDeclaration { .. }))
        .count();
    assert_eq!(records, 1);
}

/// A derived class definition records its bases.
#[test]
fn test_record_definition_bases() {
    let mut b = AstBuilder::new();
    let base = b.record(b.root(), "Base", RecordKind::Class);
    let derived = b.record(b.root(), "Derived", RecordKind::Class);
    b.add_base(derived, base);
    let ast = b.finish();

    let graph = index(&ast);
    let with_base = graph.facts().any(|(_, p)| {
        matches!(p, FactPayload::RecordDefinition { bases, .. } if bases.len() == 1)
    });
    assert!(with_base, "derived definition should list its base");
}

/// An interface block lists its methods and properties as members.
#[test]
fn test_objc_interface_members() {
    let mut b = AstBuilder::new();
    let iface = b.objc_interface(b.root(), "Window");
    b.objc_method(iface, &["close"], true);
    b.objc_property(iface, "title", "NSString *");
    let ast = b.finish();

    let graph = index(&ast);
    let members = graph
        .facts()
        .find_map(|(_, p)| match p {
            FactPayload::ObjcContainerDefinition { members, .. } => Some(members.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(members.len(), 2);
    assert!(matches!(
        graph.fact(members[0]).unwrap(),
        FactPayload::ObjcMethodDeclaration { .. }
    ));
    assert!(matches!(
        graph.fact(members[1]).unwrap(),
        FactPayload::ObjcPropertyDeclaration { .. }
    ));
}

/// A multi-part selector keeps its parts in order.
#[test]
fn test_objc_method_selector_parts() {
    let mut b = AstBuilder::new();
    let iface = b.objc_interface(b.root(), "Window");
    b.objc_method(iface, &["resizeTo", "animated"], true);
    let ast = b.finish();

    let graph = index(&ast);
    assert!(graph
        .find(&FactPayload::ObjcSelector {
            parts: vec![SmolStr::new("resizeTo"), SmolStr::new("animated")],
        })
        .is_some());
}

/// An implementation block is its own definition, with no explicit link.
#[test]
fn test_objc_implementation_defines_itself() {
    let mut b = AstBuilder::new();
    let imp = b.objc_implementation(b.root(), "Window");
    let close = b.objc_method(imp, &["close"], true);
    b.set_objc_method_definition(close);
    let ast = b.finish();

    let graph = index(&ast);
    assert!(graph
        .facts()
        .any(|(_, p)| matches!(p, FactPayload::ObjcContainerDefinition { .. })));
    assert!(graph
        .facts()
        .any(|(_, p)| matches!(p, FactPayload::ObjcMethodDefinition { .. })));
}

/// A protocol is declared under a protocol identity.
#[test]
fn test_objc_protocol_declaration() {
    let mut b = AstBuilder::new();
    b.objc_protocol(b.root(), "Printable");
    let ast = b.finish();

    let graph = index(&ast);
    assert!(graph.facts().any(|(_, p)| matches!(
        p,
        FactPayload::ObjcContainerDeclaration {
            id: ObjcContainerIdRepr::Protocol(_),
            ..
        }
    )));
}

/// A defined override links back to the base method's declaration fact.
#[test]
fn test_method_overrides_recorded() {
    let mut b = AstBuilder::new();
    let base = b.record(b.root(), "Base", RecordKind::Class);
    let base_f = b.function(base, "f");
    b.set_method(base_f, &[]);
    let derived = b.record(b.root(), "Derived", RecordKind::Class);
    b.add_base(derived, base);
    let derived_f = b.function_definition(derived, "f");
    b.set_method(derived_f, &[base_f]);
    let ast = b.finish();

    let graph = index(&ast);
    assert!(graph
        .facts()
        .any(|(_, p)| matches!(p, FactPayload::MethodOverrides { .. })));
}

/// Function attributes each get their own fact tied to the declaration.
#[test]
fn test_function_attribute_emitted() {
    let mut b = AstBuilder::new();
    let f = b.function(b.root(), "f");
    b.add_attribute(f, "noreturn");
    let ast = b.finish();

    let graph = index(&ast);
    assert!(graph.facts().any(|(_, p)| matches!(
        p,
        FactPayload::FunctionAttribute { attr, .. } if attr.as_str() == "noreturn"
    )));
}
