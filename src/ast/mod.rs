//! Input model: an arena of declarations and references describing one
//! translation unit, with identity queries (canonical redeclaration,
//! definitions, template origins) resolved up front.

pub mod build;
pub mod decl;
pub mod tree;

pub use build::AstBuilder;
pub use decl::{
    Access, Decl, DeclId, DeclKind, EnumInfo, FunctionId, FunctionInfo,
    GlobalVariableAttribute, GlobalVariableKind, Item, MethodInfo, NamespaceInfo,
    ObjcContainerId, ObjcContainerInfo, ObjcMethodInfo, ObjcPropertyInfo, Param,
    Qualifier, QualifierKind, RecordInfo, RecordKind, RefId, RefQualifier,
    RefTarget, Reference, TypeAliasInfo, TypeAliasKind, UsingDeclInfo,
    UsingDirectiveInfo, VariableInfo, VariableKind,
};
pub use tree::Ast;
