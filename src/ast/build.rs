//! Construction of [`Ast`] arenas.
//!
//! Front ends (and tests) assemble trees through [`AstBuilder`]; the
//! builder keeps document order by appending each new node to its lexical
//! parent's child list, and hands out monotonically increasing source
//! ranges when the caller does not care about exact positions.

use smol_str::SmolStr;

use crate::ast::decl::{
    Access, Decl, DeclId, DeclKind, EnumInfo, FunctionId, FunctionInfo, Item,
    MethodInfo, NamespaceInfo, ObjcContainerId, ObjcContainerInfo,
    ObjcMethodInfo, ObjcPropertyInfo, Param, Qualifier, RecordInfo, RecordKind,
    RefId, RefTarget, Reference, TypeAliasInfo, TypeAliasKind, UsingDeclInfo,
    UsingDirectiveInfo, VariableInfo, VariableKind,
};
use crate::ast::tree::Ast;
use crate::core::{FileId, Interner, Name, Span};

pub struct AstBuilder {
    decls: Vec<Decl>,
    refs: Vec<Reference>,
    names: Interner,
    has_errors: bool,
    next_offset: u32,
}

impl AstBuilder {
    /// Starts a tree with its translation-unit root at declaration 0.
    pub fn new() -> Self {
        let mut builder = AstBuilder {
            decls: Vec::new(),
            refs: Vec::new(),
            names: Interner::new(),
            has_errors: false,
            next_offset: 0,
        };
        let range = builder.next_range();
        builder.decls.push(Decl {
            name: None,
            kind: DeclKind::TranslationUnit,
            parent: None,
            canonical: DeclId(0),
            access: Access::Public,
            range,
            children: Vec::new(),
        });
        builder
    }

    pub fn root(&self) -> DeclId {
        DeclId(0)
    }

    /// Marks the unit as carrying front-end diagnostics.
    pub fn mark_errors(&mut self) {
        self.has_errors = true;
    }

    pub fn name(&mut self, text: &str) -> Name {
        self.names.intern(text)
    }

    fn next_range(&mut self) -> Span {
        let start = self.next_offset;
        self.next_offset += 10;
        Span::of(FileId(0), start, start + 5)
    }

    /// Adds a declaration whose lexical position and semantic context
    /// coincide.
    pub fn decl(&mut self, parent: DeclId, name: Option<&str>, kind: DeclKind) -> DeclId {
        self.decl_in(parent, parent, name, kind)
    }

    /// Adds a declaration appearing lexically under `lexical` but belonging
    /// to the context `semantic` (out-of-line definitions).
    pub fn decl_in(
        &mut self,
        lexical: DeclId,
        semantic: DeclId,
        name: Option<&str>,
        kind: DeclKind,
    ) -> DeclId {
        let id = DeclId::new(self.decls.len());
        let name = name.map(|n| self.names.intern(n));
        let range = self.next_range();
        self.decls.push(Decl {
            name,
            kind,
            parent: Some(semantic),
            canonical: id,
            access: Access::Public,
            range,
            children: Vec::new(),
        });
        self.decls[lexical.index()].children.push(Item::Decl(id));
        id
    }

    /// Links `decl` to an earlier redeclaration of the same entity.
    pub fn set_canonical(&mut self, decl: DeclId, canonical: DeclId) {
        self.decls[decl.index()].canonical = canonical;
    }

    pub fn set_access(&mut self, decl: DeclId, access: Access) {
        self.decls[decl.index()].access = access;
    }

    /// Marks `definition` as the defining occurrence of every given
    /// redeclaration (including itself).
    pub fn set_definition(&mut self, decls: &[DeclId], definition: DeclId) {
        for &d in decls {
            match &mut self.decls[d.index()].kind {
                DeclKind::Record(info) => info.definition = Some(definition),
                DeclKind::Enum(info) => info.definition = Some(definition),
                DeclKind::Function(info) => info.definition = Some(definition),
                DeclKind::Variable(info) => info.definition = Some(definition),
                DeclKind::ObjcContainer(info) => info.definition = Some(definition),
                _ => {}
            }
        }
    }

    pub fn namespace(&mut self, parent: DeclId, name: &str) -> DeclId {
        self.decl(
            parent,
            Some(name),
            DeclKind::Namespace(NamespaceInfo {
                anonymous: false,
                inline: false,
            }),
        )
    }

    pub fn anonymous_namespace(&mut self, parent: DeclId) -> DeclId {
        self.decl(
            parent,
            None,
            DeclKind::Namespace(NamespaceInfo {
                anonymous: true,
                inline: false,
            }),
        )
    }

    pub fn inline_namespace(&mut self, parent: DeclId, name: &str) -> DeclId {
        self.decl(
            parent,
            Some(name),
            DeclKind::Namespace(NamespaceInfo {
                anonymous: false,
                inline: true,
            }),
        )
    }

    /// Adds a record declaration that is its own definition.
    pub fn record(&mut self, parent: DeclId, name: &str, kind: RecordKind) -> DeclId {
        let id = self.record_forward(parent, name, kind);
        self.set_definition(&[id], id);
        id
    }

    pub fn record_forward(&mut self, parent: DeclId, name: &str, kind: RecordKind) -> DeclId {
        self.decl(
            parent,
            Some(name),
            DeclKind::Record(RecordInfo {
                kind,
                definition: None,
                instantiated_from: None,
                specialized_from: None,
                injected: false,
                bases: Vec::new(),
            }),
        )
    }

    pub fn enum_(&mut self, parent: DeclId, name: &str, scoped: bool) -> DeclId {
        let id = self.decl(
            parent,
            Some(name),
            DeclKind::Enum(EnumInfo {
                scoped,
                underlying: None,
                definition: None,
            }),
        );
        self.set_definition(&[id], id);
        id
    }

    pub fn enumerator(&mut self, enum_: DeclId, name: &str) -> DeclId {
        self.decl(enum_, Some(name), DeclKind::Enumerator)
    }

    pub fn type_alias(&mut self, parent: DeclId, name: &str, aliased: &str) -> DeclId {
        self.decl(
            parent,
            Some(name),
            DeclKind::TypeAlias(TypeAliasInfo {
                kind: TypeAliasKind::Using,
                aliased: SmolStr::new(aliased),
            }),
        )
    }

    /// Adds a free function declaration (not a definition).
    pub fn function(&mut self, parent: DeclId, name: &str) -> DeclId {
        let id = self.names.intern(name);
        self.function_with(parent, Some(name), FunctionId::Ident(id))
    }

    pub fn function_definition(&mut self, parent: DeclId, name: &str) -> DeclId {
        let id = self.function(parent, name);
        self.set_definition(&[id], id);
        id
    }

    pub fn function_with(
        &mut self,
        parent: DeclId,
        name: Option<&str>,
        id: FunctionId,
    ) -> DeclId {
        self.decl(
            parent,
            name,
            DeclKind::Function(FunctionInfo {
                id,
                result: SmolStr::new("void"),
                params: Vec::new(),
                method: None,
                definition: None,
                deleted: false,
                implicit_instantiation: false,
                implicit: false,
                is_inline: false,
                instantiated_from: None,
                specialized_from: None,
                attributes: Vec::new(),
                body: Vec::new(),
            }),
        )
    }

    /// Marks a function as an instance method, listing the base methods it
    /// overrides.
    pub fn set_method(&mut self, decl: DeclId, overrides: &[DeclId]) {
        if let DeclKind::Function(info) = &mut self.decls[decl.index()].kind {
            info.method = Some(MethodInfo {
                is_virtual: !overrides.is_empty(),
                overrides: overrides.to_vec(),
                ..MethodInfo::default()
            });
        }
    }

    pub fn add_attribute(&mut self, decl: DeclId, attr: &str) {
        if let DeclKind::Function(info) = &mut self.decls[decl.index()].kind {
            info.attributes.push(SmolStr::new(attr));
        }
    }

    pub fn add_base(&mut self, record: DeclId, base: DeclId) {
        if let DeclKind::Record(info) = &mut self.decls[record.index()].kind {
            info.bases.push(base);
        }
    }

    pub fn set_specialized_from(&mut self, decl: DeclId, template: DeclId) {
        match &mut self.decls[decl.index()].kind {
            DeclKind::Record(info) => info.specialized_from = Some(template),
            DeclKind::Function(info) => info.specialized_from = Some(template),
            DeclKind::Variable(info) => info.specialized_from = Some(template),
            _ => {}
        }
    }

    pub fn set_instantiated_from(&mut self, decl: DeclId, member: DeclId) {
        match &mut self.decls[decl.index()].kind {
            DeclKind::Record(info) => info.instantiated_from = Some(member),
            DeclKind::Function(info) => info.instantiated_from = Some(member),
            DeclKind::Variable(info) => info.instantiated_from = Some(member),
            _ => {}
        }
    }

    pub fn set_implicit_instantiation(&mut self, decl: DeclId) {
        if let DeclKind::Function(info) = &mut self.decls[decl.index()].kind {
            info.implicit_instantiation = true;
        }
    }

    pub fn set_deleted(&mut self, decl: DeclId) {
        if let DeclKind::Function(info) = &mut self.decls[decl.index()].kind {
            info.deleted = true;
        }
    }

    pub fn set_params(&mut self, decl: DeclId, result: &str, params: &[(&str, &str)]) {
        let params = params
            .iter()
            .map(|&(name, ty)| Param {
                name: SmolStr::new(name),
                ty: SmolStr::new(ty),
            })
            .collect();
        match &mut self.decls[decl.index()].kind {
            DeclKind::Function(info) => {
                info.result = SmolStr::new(result);
                info.params = params;
            }
            DeclKind::ObjcMethod(info) => {
                info.result = SmolStr::new(result);
                info.params = params;
            }
            _ => {}
        }
    }

    pub fn global_variable(&mut self, parent: DeclId, name: &str, ty: &str) -> DeclId {
        use crate::ast::decl::{GlobalVariableAttribute, GlobalVariableKind};
        let id = self.decl(
            parent,
            Some(name),
            DeclKind::Variable(VariableInfo {
                kind: VariableKind::Global {
                    kind: GlobalVariableKind::SimpleVariable,
                    attribute: GlobalVariableAttribute::Plain,
                },
                ty: SmolStr::new(ty),
                definition: None,
                instantiated_from: None,
                specialized_from: None,
            }),
        );
        self.set_definition(&[id], id);
        id
    }

    pub fn field(&mut self, parent: DeclId, name: &str, ty: &str) -> DeclId {
        self.decl(
            parent,
            Some(name),
            DeclKind::Variable(VariableInfo {
                kind: VariableKind::Field {
                    is_mutable: false,
                    bit_size: None,
                },
                ty: SmolStr::new(ty),
                definition: None,
                instantiated_from: None,
                specialized_from: None,
            }),
        )
    }

    pub fn local_variable(&mut self, function: DeclId, name: &str, ty: &str) -> DeclId {
        let id = self.decl_detached(
            function,
            Some(name),
            DeclKind::Variable(VariableInfo {
                kind: VariableKind::Local,
                ty: SmolStr::new(ty),
                definition: None,
                instantiated_from: None,
                specialized_from: None,
            }),
        );
        self.push_body_item(function, Item::Decl(id));
        id
    }

    /// Adds an interface block; the block is the container's definition.
    pub fn objc_interface(&mut self, parent: DeclId, name: &str) -> DeclId {
        let interned = self.names.intern(name);
        self.objc_container(parent, Some(name), ObjcContainerId::Interface(interned))
    }

    pub fn objc_protocol(&mut self, parent: DeclId, name: &str) -> DeclId {
        let interned = self.names.intern(name);
        self.objc_container(parent, Some(name), ObjcContainerId::Protocol(interned))
    }

    /// Adds an implementation block, which counts as its own definition
    /// without an explicit link.
    pub fn objc_implementation(&mut self, parent: DeclId, name: &str) -> DeclId {
        let interned = self.names.intern(name);
        self.decl(
            parent,
            Some(name),
            DeclKind::ObjcContainer(ObjcContainerInfo {
                id: ObjcContainerId::Implementation(interned),
                definition: None,
            }),
        )
    }

    fn objc_container(
        &mut self,
        parent: DeclId,
        name: Option<&str>,
        id: ObjcContainerId,
    ) -> DeclId {
        let decl = self.decl(
            parent,
            name,
            DeclKind::ObjcContainer(ObjcContainerInfo {
                id,
                definition: None,
            }),
        );
        self.set_definition(&[decl], decl);
        decl
    }

    pub fn objc_method(
        &mut self,
        container: DeclId,
        selector: &[&str],
        instance: bool,
    ) -> DeclId {
        self.decl(
            container,
            selector.first().copied(),
            DeclKind::ObjcMethod(ObjcMethodInfo {
                selector: selector.iter().map(|s| SmolStr::new(s)).collect(),
                result: SmolStr::new("void"),
                params: Vec::new(),
                instance,
                is_definition: false,
            }),
        )
    }

    pub fn set_objc_method_definition(&mut self, decl: DeclId) {
        if let DeclKind::ObjcMethod(info) = &mut self.decls[decl.index()].kind {
            info.is_definition = true;
        }
    }

    pub fn objc_property(&mut self, container: DeclId, name: &str, ty: &str) -> DeclId {
        self.decl(
            container,
            Some(name),
            DeclKind::ObjcProperty(ObjcPropertyInfo {
                ty: SmolStr::new(ty),
                instance: true,
            }),
        )
    }

    pub fn using_declaration(
        &mut self,
        parent: DeclId,
        name: &str,
        qualifier: Option<Qualifier>,
        targets: Vec<DeclId>,
    ) -> DeclId {
        self.decl(
            parent,
            Some(name),
            DeclKind::UsingDeclaration(UsingDeclInfo { qualifier, targets }),
        )
    }

    pub fn using_directive(
        &mut self,
        parent: DeclId,
        nominated: DeclId,
        qualifier: Option<Qualifier>,
    ) -> DeclId {
        self.decl(
            parent,
            None,
            DeclKind::UsingDirective(UsingDirectiveInfo {
                nominated,
                qualifier,
            }),
        )
    }

    /// Adds a reference lexically inside `container`.
    pub fn reference(
        &mut self,
        container: DeclId,
        target: DeclId,
        qualifier: Option<Qualifier>,
    ) -> RefId {
        let id = self.push_ref(target, qualifier);
        self.decls[container.index()].children.push(Item::Ref(id));
        id
    }

    /// Adds a reference inside the body of `function`.
    pub fn body_ref(
        &mut self,
        function: DeclId,
        target: DeclId,
        qualifier: Option<Qualifier>,
    ) -> RefId {
        let id = self.push_ref(target, qualifier);
        self.push_body_item(function, Item::Ref(id));
        id
    }

    pub fn overload_ref(&mut self, container: DeclId, targets: Vec<DeclId>) -> RefId {
        let id = RefId::new(self.refs.len());
        let range = self.next_range();
        self.refs.push(Reference {
            target: RefTarget::Overloads(targets),
            qualifier: None,
            range,
        });
        self.decls[container.index()].children.push(Item::Ref(id));
        id
    }

    /// Range the most recently added reference was given.
    pub fn range_of(&self, id: RefId) -> Span {
        self.refs[id.index()].range
    }

    pub fn finish(self) -> Ast {
        Ast {
            decls: self.decls,
            refs: self.refs,
            root: DeclId(0),
            names: self.names,
            has_errors: self.has_errors,
        }
    }

    fn push_ref(&mut self, target: DeclId, qualifier: Option<Qualifier>) -> RefId {
        let id = RefId::new(self.refs.len());
        let range = self.next_range();
        self.refs.push(Reference {
            target: RefTarget::Decl(target),
            qualifier,
            range,
        });
        id
    }

    fn decl_detached(
        &mut self,
        semantic: DeclId,
        name: Option<&str>,
        kind: DeclKind,
    ) -> DeclId {
        let id = DeclId::new(self.decls.len());
        let name = name.map(|n| self.names.intern(n));
        let range = self.next_range();
        self.decls.push(Decl {
            name,
            kind,
            parent: Some(semantic),
            canonical: id,
            access: Access::Public,
            range,
            children: Vec::new(),
        });
        id
    }

    fn push_body_item(&mut self, function: DeclId, item: Item) {
        if let DeclKind::Function(info) = &mut self.decls[function.index()].kind {
            info.body.push(item);
        }
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
