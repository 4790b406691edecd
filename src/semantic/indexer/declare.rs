//! Per-kind fact producers.
//!
//! Each declaration kind has a memoized producer returning the facts other
//! parts of the engine need to refer to that declaration, or `None` when
//! the declaration yields no fact (injected class names, deleted
//! functions, implicit instantiations, locals). Producers recurse into
//! parents through the scope computation; the memos turn any accidental
//! cycle into an error instead of a hang.

use tracing::warn;

use crate::ast::{
    Access, DeclId, DeclKind, FunctionId, Item, MethodInfo, ObjcContainerId,
    Param, VariableKind,
};
use crate::facts::{
    FactPayload, FactRef, FactSink, FunctionNameRepr, MethodSignatureRepr,
    ObjcContainerIdRepr, ScopeRepr, VariableKindRepr,
};
use crate::semantic::error::IndexResult;
use crate::semantic::indexer::visit::Indexer;
use crate::semantic::memo::{FactMemo, Memoized};

/// Scope a declaration's name lives in, before access is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Global,
    Namespace(FactRef),
    Record(FactRef),
    Local(FactRef),
}

pub(crate) fn scope_repr(scope: Scope, access: Access) -> ScopeRepr {
    match scope {
        Scope::Global => ScopeRepr::Global,
        Scope::Namespace(qname) => ScopeRepr::Namespace { qname },
        Scope::Record(qname) => ScopeRepr::Record { qname, access },
        Scope::Local(qname) => ScopeRepr::Local { qname },
    }
}

/// Facts a producer hands back for one declaration.
pub(crate) trait DeclarationFacts: Clone {
    fn declaration(&self) -> FactRef;
}

macro_rules! declaration_facts {
    ($($ty:ident),* $(,)?) => {
        $(impl DeclarationFacts for $ty {
            fn declaration(&self) -> FactRef {
                self.decl
            }
        })*
    };
}

#[derive(Debug, Clone)]
pub(crate) struct NamespaceFacts {
    pub qname: FactRef,
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordFacts {
    pub qname: FactRef,
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct EnumFacts {
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct EnumeratorFacts {
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeAliasFacts {
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct FunctionFacts {
    pub qname: FactRef,
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct VariableFacts {
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct ObjcContainerFacts {
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct ObjcMethodFacts {
    pub decl: FactRef,
}

#[derive(Debug, Clone)]
pub(crate) struct ObjcPropertyFacts {
    pub decl: FactRef,
}

declaration_facts!(
    NamespaceFacts,
    RecordFacts,
    EnumFacts,
    EnumeratorFacts,
    TypeAliasFacts,
    FunctionFacts,
    VariableFacts,
    ObjcContainerFacts,
    ObjcMethodFacts,
    ObjcPropertyFacts,
);

pub(crate) struct Memos {
    pub namespaces: FactMemo<NamespaceFacts>,
    pub records: FactMemo<RecordFacts>,
    pub enums: FactMemo<EnumFacts>,
    pub enumerators: FactMemo<EnumeratorFacts>,
    pub type_aliases: FactMemo<TypeAliasFacts>,
    pub functions: FactMemo<FunctionFacts>,
    pub variables: FactMemo<VariableFacts>,
    pub objc_containers: FactMemo<ObjcContainerFacts>,
    pub objc_methods: FactMemo<ObjcMethodFacts>,
    pub objc_properties: FactMemo<ObjcPropertyFacts>,
}

impl Memos {
    pub fn new() -> Self {
        Memos {
            namespaces: FactMemo::new("namespace"),
            records: FactMemo::new("record"),
            enums: FactMemo::new("enum"),
            enumerators: FactMemo::new("enumerator"),
            type_aliases: FactMemo::new("type alias"),
            functions: FactMemo::new("function"),
            variables: FactMemo::new("variable"),
            objc_containers: FactMemo::new("container"),
            objc_methods: FactMemo::new("method"),
            objc_properties: FactMemo::new("property"),
        }
    }
}

macro_rules! memoized {
    ($self:ident, $memo:ident, $compute:ident, $decl:ident) => {
        match $self.memos.$memo.lookup($decl)? {
            Memoized::Hit(value) => Ok(Some(value)),
            Memoized::Miss => {
                let value = $self.$compute($decl)?;
                Ok($self.memos.$memo.complete($decl, value))
            }
        }
    };
}

impl<'a, S: FactSink> Indexer<'a, S> {
    pub(crate) fn namespace_facts(&mut self, decl: DeclId) -> IndexResult<Option<NamespaceFacts>> {
        memoized!(self, namespaces, declare_namespace, decl)
    }

    pub(crate) fn record_facts(&mut self, decl: DeclId) -> IndexResult<Option<RecordFacts>> {
        memoized!(self, records, declare_record, decl)
    }

    pub(crate) fn enum_facts(&mut self, decl: DeclId) -> IndexResult<Option<EnumFacts>> {
        memoized!(self, enums, declare_enum, decl)
    }

    pub(crate) fn enumerator_facts(&mut self, decl: DeclId) -> IndexResult<Option<EnumeratorFacts>> {
        memoized!(self, enumerators, declare_enumerator, decl)
    }

    pub(crate) fn type_alias_facts(&mut self, decl: DeclId) -> IndexResult<Option<TypeAliasFacts>> {
        memoized!(self, type_aliases, declare_type_alias, decl)
    }

    pub(crate) fn function_facts(&mut self, decl: DeclId) -> IndexResult<Option<FunctionFacts>> {
        memoized!(self, functions, declare_function, decl)
    }

    pub(crate) fn variable_facts(&mut self, decl: DeclId) -> IndexResult<Option<VariableFacts>> {
        memoized!(self, variables, declare_variable, decl)
    }

    pub(crate) fn objc_container_facts(
        &mut self,
        decl: DeclId,
    ) -> IndexResult<Option<ObjcContainerFacts>> {
        memoized!(self, objc_containers, declare_objc_container, decl)
    }

    pub(crate) fn objc_method_facts(
        &mut self,
        decl: DeclId,
    ) -> IndexResult<Option<ObjcMethodFacts>> {
        memoized!(self, objc_methods, declare_objc_method, decl)
    }

    pub(crate) fn objc_property_facts(
        &mut self,
        decl: DeclId,
    ) -> IndexResult<Option<ObjcPropertyFacts>> {
        memoized!(self, objc_properties, declare_objc_property, decl)
    }

    // ---- scopes ----------------------------------------------------------

    /// Scope represented by a container declaration. Total per entity: the
    /// result is cached under the canonical declaration.
    pub(crate) fn scope_of(&mut self, container: DeclId) -> IndexResult<Scope> {
        let key = self.ast.canonical(container);
        if let Some(scope) = self.scopes.get(&key) {
            return Ok(*scope);
        }
        let scope = self.compute_scope(key)?;
        self.scopes.insert(key, scope);
        Ok(scope)
    }

    /// Walks outward until a namespace, record, or function with a fact is
    /// found; containers without facts are skipped.
    fn compute_scope(&mut self, decl: DeclId) -> IndexResult<Scope> {
        let ast = self.ast;
        let mut current = Some(decl);
        while let Some(d) = current {
            match &ast.decl(d).kind {
                DeclKind::TranslationUnit => return Ok(Scope::Global),
                DeclKind::Namespace(_) => {
                    if let Some(ns) = self.namespace_facts(d)? {
                        return Ok(Scope::Namespace(ns.qname));
                    }
                }
                DeclKind::Record(_) => {
                    if let Some(rec) = self.record_facts(d)? {
                        return Ok(Scope::Record(rec.qname));
                    }
                }
                DeclKind::Function(_) => {
                    if let Some(f) = self.function_facts(d)? {
                        return Ok(Scope::Local(f.qname));
                    }
                }
                _ => {}
            }
            current = ast.parent(d);
        }
        Ok(Scope::Global)
    }

    pub(crate) fn parent_scope(&mut self, decl: DeclId) -> IndexResult<Scope> {
        match self.ast.enclosing_container(decl) {
            Some(container) => self.scope_of(container),
            None => Ok(Scope::Global),
        }
    }

    pub(crate) fn parent_scope_repr(&mut self, decl: DeclId) -> IndexResult<ScopeRepr> {
        let scope = self.parent_scope(decl)?;
        Ok(scope_repr(scope, self.ast.decl(decl).access))
    }

    // ---- shared fact helpers ---------------------------------------------

    pub(crate) fn name_fact(&mut self, name: crate::core::Name) -> FactRef {
        let text = self.ast.name_text(name);
        self.sink.intern_fact(FactPayload::name(text))
    }

    pub(crate) fn name_fact_or_empty(&mut self, decl: DeclId) -> FactRef {
        match self.ast.decl(decl).name {
            Some(name) => self.name_fact(name),
            None => self.sink.intern_fact(FactPayload::name("")),
        }
    }

    fn type_fact(&mut self, text: &str) -> FactRef {
        self.sink.intern_fact(FactPayload::ty(text))
    }

    fn signature_fact(&mut self, result: &str, params: &[Param]) -> FactRef {
        let result = self.type_fact(result);
        let params = params
            .iter()
            .map(|p| {
                let name = self.sink.intern_fact(FactPayload::name(&p.name));
                let ty = self.type_fact(&p.ty);
                (name, ty)
            })
            .collect();
        self.sink.intern_fact(FactPayload::Signature { result, params })
    }

    fn function_name_fact(&mut self, id: &FunctionId) -> FactRef {
        let name = match id {
            FunctionId::Ident(name) => FunctionNameRepr::Ident(self.name_fact(*name)),
            FunctionId::Operator(op) => FunctionNameRepr::Operator(op.clone()),
            FunctionId::LiteralOperator(op) => FunctionNameRepr::LiteralOperator(op.clone()),
            FunctionId::Constructor => FunctionNameRepr::Constructor,
            FunctionId::Destructor => FunctionNameRepr::Destructor,
            FunctionId::Conversion(ty) => FunctionNameRepr::Conversion(self.type_fact(ty)),
        };
        self.sink.intern_fact(FactPayload::FunctionName { name })
    }

    // ---- producers -------------------------------------------------------

    fn declare_namespace(&mut self, decl: DeclId) -> IndexResult<Option<NamespaceFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::Namespace(info) => info,
            _ => return Ok(None),
        };
        let name = if info.anonymous {
            None
        } else {
            Some(self.name_fact_or_empty(decl))
        };
        let parent = match self.parent_scope(decl)? {
            Scope::Global => None,
            Scope::Namespace(qname) => Some(qname),
            Scope::Record(_) | Scope::Local(_) => {
                warn!(decl = %ast.describe(decl), "namespace in a non-namespace scope");
                None
            }
        };
        let qname = self
            .sink
            .intern_fact(FactPayload::NamespaceQName { name, parent });
        let fact = self.sink.intern_fact(FactPayload::NamespaceDeclaration {
            qname,
            range: ast.decl(decl).range,
        });
        Ok(Some(NamespaceFacts { qname, decl: fact }))
    }

    pub(crate) fn define_namespace(
        &mut self,
        _decl: DeclId,
        me: &NamespaceFacts,
    ) -> IndexResult<()> {
        self.sink
            .intern_fact(FactPayload::NamespaceDefinition { decl: me.decl });
        Ok(())
    }

    fn declare_record(&mut self, decl: DeclId) -> IndexResult<Option<RecordFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::Record(info) => info,
            _ => return Ok(None),
        };
        if info.injected {
            return Ok(None);
        }
        let name = self.name_fact_or_empty(decl);
        let scope = self.parent_scope_repr(decl)?;
        let qname = self.sink.intern_fact(FactPayload::QName { name, scope });
        let fact = self.sink.intern_fact(FactPayload::RecordDeclaration {
            qname,
            kind: info.kind,
            range: ast.decl(decl).range,
        });
        Ok(Some(RecordFacts { qname, decl: fact }))
    }

    pub(crate) fn define_record(&mut self, decl: DeclId, me: &RecordFacts) -> IndexResult<()> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::Record(info) => info,
            _ => return Ok(()),
        };
        let mut bases = Vec::new();
        for &base in &info.bases {
            if let Some(b) = self.record_facts(base)? {
                bases.push(b.decl);
            }
        }
        let members = self.member_facts(decl)?;
        self.sink.intern_fact(FactPayload::RecordDefinition {
            decl: me.decl,
            bases,
            members,
        });
        Ok(())
    }

    /// Declaration facts of a container's direct members, in document
    /// order. Compiler-generated members are skipped.
    fn member_facts(&mut self, decl: DeclId) -> IndexResult<Vec<FactRef>> {
        let ast = self.ast;
        let mut members = Vec::new();
        for item in &ast.decl(decl).children {
            let Item::Decl(child) = *item else { continue };
            let fact = match &ast.decl(child).kind {
                DeclKind::Record(_) => self.record_facts(child)?.map(|v| v.decl),
                DeclKind::Enum(_) => self.enum_facts(child)?.map(|v| v.decl),
                DeclKind::TypeAlias(_) => self.type_alias_facts(child)?.map(|v| v.decl),
                DeclKind::Variable(_) => self.variable_facts(child)?.map(|v| v.decl),
                DeclKind::Function(info) if !info.implicit => {
                    self.function_facts(child)?.map(|v| v.decl)
                }
                DeclKind::ObjcMethod(_) => self.objc_method_facts(child)?.map(|v| v.decl),
                DeclKind::ObjcProperty(_) => self.objc_property_facts(child)?.map(|v| v.decl),
                _ => None,
            };
            members.extend(fact);
        }
        Ok(members)
    }

    fn declare_enum(&mut self, decl: DeclId) -> IndexResult<Option<EnumFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::Enum(info) => info,
            _ => return Ok(None),
        };
        let name = self.name_fact_or_empty(decl);
        let scope = self.parent_scope_repr(decl)?;
        let qname = self.sink.intern_fact(FactPayload::QName { name, scope });
        let underlying = info.underlying.as_deref().map(|ty| self.type_fact(ty));
        let fact = self.sink.intern_fact(FactPayload::EnumDeclaration {
            qname,
            scoped: info.scoped,
            underlying,
            range: ast.decl(decl).range,
        });
        Ok(Some(EnumFacts { decl: fact }))
    }

    pub(crate) fn define_enum(&mut self, decl: DeclId, me: &EnumFacts) -> IndexResult<()> {
        let ast = self.ast;
        let mut enumerators = Vec::new();
        for item in &ast.decl(decl).children {
            let Item::Decl(child) = *item else { continue };
            if matches!(ast.decl(child).kind, DeclKind::Enumerator) {
                if let Some(e) = self.enumerator_facts(child)? {
                    enumerators.push(e.decl);
                }
            }
        }
        self.sink.intern_fact(FactPayload::EnumDefinition {
            decl: me.decl,
            enumerators,
        });
        Ok(())
    }

    fn declare_enumerator(&mut self, decl: DeclId) -> IndexResult<Option<EnumeratorFacts>> {
        let ast = self.ast;
        if !matches!(ast.decl(decl).kind, DeclKind::Enumerator) {
            return Ok(None);
        }
        let Some(enum_decl) = ast.enclosing_container(decl) else {
            return Ok(None);
        };
        let Some(enum_facts) = self.enum_facts(enum_decl)? else {
            return Ok(None);
        };
        let name = self.name_fact_or_empty(decl);
        let fact = self.sink.intern_fact(FactPayload::Enumerator {
            name,
            enum_decl: enum_facts.decl,
            range: ast.decl(decl).range,
        });
        Ok(Some(EnumeratorFacts { decl: fact }))
    }

    fn declare_type_alias(&mut self, decl: DeclId) -> IndexResult<Option<TypeAliasFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::TypeAlias(info) => info,
            _ => return Ok(None),
        };
        let name = self.name_fact_or_empty(decl);
        let scope = self.parent_scope_repr(decl)?;
        let qname = self.sink.intern_fact(FactPayload::QName { name, scope });
        let ty = self.type_fact(&info.aliased);
        let fact = self.sink.intern_fact(FactPayload::TypeAliasDeclaration {
            qname,
            ty,
            kind: info.kind,
            range: ast.decl(decl).range,
        });
        Ok(Some(TypeAliasFacts { decl: fact }))
    }

    fn declare_function(&mut self, decl: DeclId) -> IndexResult<Option<FunctionFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::Function(info) => info,
            _ => return Ok(None),
        };
        // Deleted functions and implicit instantiations have no fact; a
        // reference to them becomes an unknown target.
        if info.deleted || info.implicit_instantiation {
            return Ok(None);
        }
        let name = self.function_name_fact(&info.id);
        let scope = self.parent_scope_repr(decl)?;
        let qname = self
            .sink
            .intern_fact(FactPayload::FunctionQName { name, scope });
        let signature = self.signature_fact(&info.result, &info.params);
        let method = info.method.as_ref().map(method_signature);
        let fact = self.sink.intern_fact(FactPayload::FunctionDeclaration {
            qname,
            signature,
            method,
            range: ast.decl(decl).range,
        });
        for attr in &info.attributes {
            self.sink.intern_fact(FactPayload::FunctionAttribute {
                attr: attr.clone(),
                decl: fact,
            });
        }
        Ok(Some(FunctionFacts { qname, decl: fact }))
    }

    pub(crate) fn define_function(&mut self, decl: DeclId, me: &FunctionFacts) -> IndexResult<()> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::Function(info) => info,
            _ => return Ok(()),
        };
        self.sink.intern_fact(FactPayload::FunctionDefinition {
            decl: me.decl,
            is_inline: info.is_inline,
        });
        if let Some(method) = &info.method {
            for &base in &method.overrides {
                if let Some(b) = self.function_facts(base)? {
                    self.sink.intern_fact(FactPayload::MethodOverrides {
                        derived: me.decl,
                        base: b.decl,
                    });
                }
            }
        }
        Ok(())
    }

    fn declare_variable(&mut self, decl: DeclId) -> IndexResult<Option<VariableFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::Variable(info) => info,
            _ => return Ok(None),
        };
        let kind = match &info.kind {
            VariableKind::Local => return Ok(None),
            VariableKind::Global { kind, attribute } => VariableKindRepr::Global {
                kind: *kind,
                attribute: *attribute,
                definition: ast.definition_of(decl) == Some(decl),
            },
            VariableKind::Field {
                is_mutable,
                bit_size,
            } => VariableKindRepr::Field {
                is_mutable: *is_mutable,
                bit_size: *bit_size,
            },
        };
        let name = self.name_fact_or_empty(decl);
        let scope = self.parent_scope_repr(decl)?;
        let qname = self.sink.intern_fact(FactPayload::QName { name, scope });
        let ty = self.type_fact(&info.ty);
        let fact = self.sink.intern_fact(FactPayload::VariableDeclaration {
            qname,
            ty,
            kind,
            range: ast.decl(decl).range,
        });
        Ok(Some(VariableFacts { decl: fact }))
    }

    fn declare_objc_container(
        &mut self,
        decl: DeclId,
    ) -> IndexResult<Option<ObjcContainerFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::ObjcContainer(info) => info,
            _ => return Ok(None),
        };
        let id = self.objc_container_id(&info.id);
        let fact = self.sink.intern_fact(FactPayload::ObjcContainerDeclaration {
            id,
            range: ast.decl(decl).range,
        });
        Ok(Some(ObjcContainerFacts { decl: fact }))
    }

    fn objc_container_id(&mut self, id: &ObjcContainerId) -> ObjcContainerIdRepr {
        match *id {
            ObjcContainerId::Protocol(name) => {
                ObjcContainerIdRepr::Protocol(self.name_fact(name))
            }
            ObjcContainerId::Interface(name) => {
                ObjcContainerIdRepr::Interface(self.name_fact(name))
            }
            ObjcContainerId::CategoryInterface { class, category } => {
                ObjcContainerIdRepr::CategoryInterface {
                    class: self.name_fact(class),
                    category: self.name_fact(category),
                }
            }
            ObjcContainerId::ExtensionInterface(name) => {
                ObjcContainerIdRepr::ExtensionInterface(self.name_fact(name))
            }
            ObjcContainerId::Implementation(name) => {
                ObjcContainerIdRepr::Implementation(self.name_fact(name))
            }
            ObjcContainerId::CategoryImplementation { class, category } => {
                ObjcContainerIdRepr::CategoryImplementation {
                    class: self.name_fact(class),
                    category: self.name_fact(category),
                }
            }
        }
    }

    pub(crate) fn define_objc_container(
        &mut self,
        decl: DeclId,
        me: &ObjcContainerFacts,
    ) -> IndexResult<()> {
        let members = self.member_facts(decl)?;
        self.sink.intern_fact(FactPayload::ObjcContainerDefinition {
            decl: me.decl,
            members,
        });
        Ok(())
    }

    fn declare_objc_method(&mut self, decl: DeclId) -> IndexResult<Option<ObjcMethodFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::ObjcMethod(info) => info,
            _ => return Ok(None),
        };
        let Some(container) = self.objc_parent_container(decl)? else {
            return Ok(None);
        };
        let selector = self.sink.intern_fact(FactPayload::ObjcSelector {
            parts: info.selector.clone(),
        });
        let signature = self.signature_fact(&info.result, &info.params);
        let fact = self.sink.intern_fact(FactPayload::ObjcMethodDeclaration {
            selector,
            container,
            signature,
            instance: info.instance,
            range: ast.decl(decl).range,
        });
        Ok(Some(ObjcMethodFacts { decl: fact }))
    }

    pub(crate) fn define_objc_method(
        &mut self,
        _decl: DeclId,
        me: &ObjcMethodFacts,
    ) -> IndexResult<()> {
        self.sink
            .intern_fact(FactPayload::ObjcMethodDefinition { decl: me.decl });
        Ok(())
    }

    fn declare_objc_property(&mut self, decl: DeclId) -> IndexResult<Option<ObjcPropertyFacts>> {
        let ast = self.ast;
        let info = match &ast.decl(decl).kind {
            DeclKind::ObjcProperty(info) => info,
            _ => return Ok(None),
        };
        let Some(container) = self.objc_parent_container(decl)? else {
            return Ok(None);
        };
        let name = self.name_fact_or_empty(decl);
        let ty = self.type_fact(&info.ty);
        let fact = self.sink.intern_fact(FactPayload::ObjcPropertyDeclaration {
            name,
            container,
            ty,
            instance: info.instance,
            range: ast.decl(decl).range,
        });
        Ok(Some(ObjcPropertyFacts { decl: fact }))
    }

    fn objc_parent_container(&mut self, decl: DeclId) -> IndexResult<Option<FactRef>> {
        let ast = self.ast;
        let Some(container) = ast.enclosing_container(decl) else {
            return Ok(None);
        };
        if !matches!(ast.decl(container).kind, DeclKind::ObjcContainer(_)) {
            return Ok(None);
        }
        Ok(self.objc_container_facts(container)?.map(|v| v.decl))
    }

    /// No associated definition fact.
    pub(crate) fn define_nothing<V>(&mut self, _decl: DeclId, _me: &V) -> IndexResult<()> {
        Ok(())
    }
}

fn method_signature(method: &MethodInfo) -> MethodSignatureRepr {
    MethodSignatureRepr {
        is_virtual: method.is_virtual,
        is_const: method.is_const,
        is_volatile: method.is_volatile,
        ref_qualifier: method.ref_qualifier,
    }
}
