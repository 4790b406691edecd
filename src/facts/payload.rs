//! Fact payloads.
//!
//! Facts are content-addressed: interning the same payload twice yields the
//! same [`FactRef`], so payloads double as the dedup key. Structural
//! payloads refer to other facts by `FactRef` only.

use smol_str::SmolStr;

use crate::ast::{Access, RecordKind, RefQualifier, TypeAliasKind};
use crate::core::Span;

/// Handle to an interned fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactRef(pub u32);

impl FactRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scope a qualified name lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRepr {
    Global,
    Namespace { qname: FactRef },
    Record { qname: FactRef, access: Access },
    Local { qname: FactRef },
}

/// How a function is named, in fact form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionNameRepr {
    Ident(FactRef),
    Operator(SmolStr),
    LiteralOperator(SmolStr),
    Constructor,
    Destructor,
    Conversion(FactRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodSignatureRepr {
    pub is_virtual: bool,
    pub is_const: bool,
    pub is_volatile: bool,
    pub ref_qualifier: RefQualifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableKindRepr {
    Global {
        kind: crate::ast::GlobalVariableKind,
        attribute: crate::ast::GlobalVariableAttribute,
        definition: bool,
    },
    Field {
        is_mutable: bool,
        bit_size: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjcContainerIdRepr {
    Protocol(FactRef),
    Interface(FactRef),
    CategoryInterface { class: FactRef, category: FactRef },
    ExtensionInterface(FactRef),
    Implementation(FactRef),
    CategoryImplementation { class: FactRef, category: FactRef },
}

/// What a cross-reference ultimately points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum XRefTarget {
    Declaration(FactRef),
    Enumerator(FactRef),
    /// Target reached through a using step; points at an
    /// [`FactPayload::XRefIndirectTarget`] fact.
    Indirect(FactRef),
    /// No fact could be produced; carries the declaration's position.
    Unknown(Span),
}

/// One step of a using chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Via {
    UsingDeclaration(FactRef),
    /// `None` for forwarding edges with no written directive (anonymous and
    /// inline namespaces).
    UsingDirective(Option<FactRef>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactPayload {
    Name {
        text: SmolStr,
    },
    Type {
        text: SmolStr,
    },
    FunctionName {
        name: FunctionNameRepr,
    },
    NamespaceQName {
        name: Option<FactRef>,
        parent: Option<FactRef>,
    },
    QName {
        name: FactRef,
        scope: ScopeRepr,
    },
    FunctionQName {
        name: FactRef,
        scope: ScopeRepr,
    },
    NamespaceDeclaration {
        qname: FactRef,
        range: Span,
    },
    NamespaceDefinition {
        decl: FactRef,
    },
    RecordDeclaration {
        qname: FactRef,
        kind: RecordKind,
        range: Span,
    },
    RecordDefinition {
        decl: FactRef,
        bases: Vec<FactRef>,
        members: Vec<FactRef>,
    },
    EnumDeclaration {
        qname: FactRef,
        scoped: bool,
        underlying: Option<FactRef>,
        range: Span,
    },
    EnumDefinition {
        decl: FactRef,
        enumerators: Vec<FactRef>,
    },
    Enumerator {
        name: FactRef,
        enum_decl: FactRef,
        range: Span,
    },
    TypeAliasDeclaration {
        qname: FactRef,
        ty: FactRef,
        kind: TypeAliasKind,
        range: Span,
    },
    Signature {
        result: FactRef,
        params: Vec<(FactRef, FactRef)>,
    },
    FunctionDeclaration {
        qname: FactRef,
        signature: FactRef,
        method: Option<MethodSignatureRepr>,
        range: Span,
    },
    FunctionDefinition {
        decl: FactRef,
        is_inline: bool,
    },
    FunctionAttribute {
        attr: SmolStr,
        decl: FactRef,
    },
    MethodOverrides {
        derived: FactRef,
        base: FactRef,
    },
    VariableDeclaration {
        qname: FactRef,
        ty: FactRef,
        kind: VariableKindRepr,
        range: Span,
    },
    ObjcContainerDeclaration {
        id: ObjcContainerIdRepr,
        range: Span,
    },
    ObjcContainerDefinition {
        decl: FactRef,
        members: Vec<FactRef>,
    },
    ObjcSelector {
        parts: Vec<SmolStr>,
    },
    ObjcMethodDeclaration {
        selector: FactRef,
        container: FactRef,
        signature: FactRef,
        instance: bool,
        range: Span,
    },
    ObjcMethodDefinition {
        decl: FactRef,
    },
    ObjcPropertyDeclaration {
        name: FactRef,
        container: FactRef,
        ty: FactRef,
        instance: bool,
        range: Span,
    },
    UsingDeclaration {
        qname: FactRef,
        range: Span,
    },
    UsingDirective {
        qname: FactRef,
        range: Span,
    },
    XRefIndirectTarget {
        via: Via,
        target: XRefTarget,
    },
}

impl FactPayload {
    pub fn name(text: &str) -> Self {
        FactPayload::Name {
            text: SmolStr::new(text),
        }
    }

    pub fn ty(text: &str) -> Self {
        FactPayload::Type {
            text: SmolStr::new(text),
        }
    }
}
