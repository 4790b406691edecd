//! Declaration nodes of the input tree.
//!
//! The tree arrives already parsed and type-checked: every node carries its
//! resolved identity (canonical redeclaration, definition, template origin)
//! so the resolution engine never has to look at source text.

use smol_str::SmolStr;

use crate::core::{Name, Span};

/// Unique identifier for a declaration in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

impl DeclId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier for a reference in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefId(pub u32);

impl RefId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One entry of a container's body, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Decl(DeclId),
    Ref(RefId),
}

/// C++ access specifier, recorded on member declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Struct,
    Class,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeAliasKind {
    Using,
    Typedef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

/// How a function is named. Plain identifiers also appear as `Decl::name`;
/// the other variants have no single identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionId {
    Ident(Name),
    Operator(SmolStr),
    LiteralOperator(SmolStr),
    Constructor,
    Destructor,
    /// Conversion operator; carries the rendered target type.
    Conversion(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceInfo {
    pub anonymous: bool,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    pub kind: RecordKind,
    /// The defining occurrence, if any redeclaration of this record is one.
    pub definition: Option<DeclId>,
    /// Member of a class template this was instantiated from.
    pub instantiated_from: Option<DeclId>,
    /// Template (or partial specialization) this specializes.
    pub specialized_from: Option<DeclId>,
    /// Injected-class-name occurrences produce no fact.
    pub injected: bool,
    pub bases: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    pub scoped: bool,
    /// Rendered underlying type, when spelled out.
    pub underlying: Option<SmolStr>,
    pub definition: Option<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasInfo {
    pub kind: TypeAliasKind,
    /// Rendered aliased type.
    pub aliased: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: SmolStr,
    pub ty: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodInfo {
    pub is_virtual: bool,
    pub is_const: bool,
    pub is_volatile: bool,
    pub ref_qualifier: RefQualifier,
    pub overrides: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub id: FunctionId,
    /// Rendered result type.
    pub result: SmolStr,
    pub params: Vec<Param>,
    /// Present iff this is an instance method.
    pub method: Option<MethodInfo>,
    pub definition: Option<DeclId>,
    pub deleted: bool,
    /// Implicit template instantiations produce no fact.
    pub implicit_instantiation: bool,
    /// Compiler-generated members are skipped as record members.
    pub implicit: bool,
    pub is_inline: bool,
    pub instantiated_from: Option<DeclId>,
    pub specialized_from: Option<DeclId>,
    pub attributes: Vec<SmolStr>,
    /// Items of the function body, traversed in the function's context.
    /// Non-body children (signature references) stay in `Decl::children`.
    pub body: Vec<Item>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalVariableKind {
    SimpleVariable,
    StaticVariable,
    StaticMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalVariableAttribute {
    Plain,
    Inline,
    Constexpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableKind {
    Global {
        kind: GlobalVariableKind,
        attribute: GlobalVariableAttribute,
    },
    Field {
        is_mutable: bool,
        /// Bit-field width; value-dependent widths are recorded as 0.
        bit_size: Option<u64>,
    },
    /// Local variables and parameters: no fact, no cross-references.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub kind: VariableKind,
    /// Rendered type.
    pub ty: SmolStr,
    pub definition: Option<DeclId>,
    pub instantiated_from: Option<DeclId>,
    pub specialized_from: Option<DeclId>,
}

/// Identity of a message-based-object container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjcContainerId {
    Protocol(Name),
    Interface(Name),
    CategoryInterface { class: Name, category: Name },
    ExtensionInterface(Name),
    Implementation(Name),
    CategoryImplementation { class: Name, category: Name },
}

impl ObjcContainerId {
    /// Implementations and categories count as their own definition.
    pub fn is_implementation_like(&self) -> bool {
        matches!(
            self,
            ObjcContainerId::CategoryInterface { .. }
                | ObjcContainerId::Implementation(_)
                | ObjcContainerId::CategoryImplementation { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjcContainerInfo {
    pub id: ObjcContainerId,
    pub definition: Option<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjcMethodInfo {
    pub selector: Vec<SmolStr>,
    pub result: SmolStr,
    pub params: Vec<Param>,
    pub instance: bool,
    pub is_definition: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjcPropertyInfo {
    pub ty: SmolStr,
    pub instance: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDeclInfo {
    pub qualifier: Option<Qualifier>,
    /// Shadow targets: one per member of the imported overload set.
    pub targets: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirectiveInfo {
    pub nominated: DeclId,
    pub qualifier: Option<Qualifier>,
}

/// One segment of a qualified name (`A::B::`), innermost last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    pub kind: QualifierKind,
    pub prefix: Option<Box<Qualifier>>,
    /// Range of this segment's token, when a cross-reference should be
    /// emitted for it.
    pub range: Option<Span>,
}

impl Qualifier {
    pub fn namespace(ns: DeclId) -> Self {
        Qualifier {
            kind: QualifierKind::Namespace(ns),
            prefix: None,
            range: None,
        }
    }

    pub fn record(rec: DeclId) -> Self {
        Qualifier {
            kind: QualifierKind::Record(rec),
            prefix: None,
            range: None,
        }
    }

    pub fn with_prefix(mut self, prefix: Qualifier) -> Self {
        self.prefix = Some(Box::new(prefix));
        self
    }

    pub fn with_range(mut self, range: Span) -> Self {
        self.range = Some(range);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierKind {
    Namespace(DeclId),
    Record(DeclId),
    Global,
    /// Dependent or type-based specifiers the engine cannot map to a
    /// context.
    Other,
}

/// The declaration-kind sum. Each variant carries only the fields its
/// producer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    TranslationUnit,
    Namespace(NamespaceInfo),
    Record(RecordInfo),
    Enum(EnumInfo),
    Enumerator,
    TypeAlias(TypeAliasInfo),
    Function(FunctionInfo),
    Variable(VariableInfo),
    ObjcContainer(ObjcContainerInfo),
    ObjcMethod(ObjcMethodInfo),
    ObjcProperty(ObjcPropertyInfo),
    UsingDeclaration(UsingDeclInfo),
    UsingDirective(UsingDirectiveInfo),
}

/// A declaration node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub name: Option<Name>,
    pub kind: DeclKind,
    /// Semantic enclosing declaration (the decl context). `None` only for
    /// the translation unit. For out-of-line definitions this differs from
    /// the lexical position in the parent's `children`.
    pub parent: Option<DeclId>,
    /// First redeclaration of the same entity; self if this is the first.
    pub canonical: DeclId,
    pub access: Access,
    pub range: Span,
    /// Nested declarations and references, in document order.
    pub children: Vec<Item>,
}

/// What a reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    Decl(DeclId),
    /// Unresolved overload set: one cross-reference per candidate.
    Overloads(Vec<DeclId>),
}

/// A symbol reference found in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub target: RefTarget,
    pub qualifier: Option<Qualifier>,
    pub range: Span,
}
