//! The declaration arena and the identity queries the resolution engine
//! relies on.

use crate::ast::decl::{Decl, DeclId, DeclKind, RefId, Reference, VariableKind};
use crate::core::{Interner, Name};

/// An indexed translation unit: declarations and references in one arena,
/// rooted at the translation-unit declaration.
#[derive(Debug)]
pub struct Ast {
    pub(crate) decls: Vec<Decl>,
    pub(crate) refs: Vec<Reference>,
    pub(crate) root: DeclId,
    pub(crate) names: Interner,
    pub(crate) has_errors: bool,
}

impl Ast {
    pub fn root(&self) -> DeclId {
        self.root
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    pub fn reference(&self, id: RefId) -> &Reference {
        &self.refs[id.index()]
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Resolves an interned name back to its text.
    pub fn name_text(&self, name: Name) -> &str {
        self.names.lookup(name).unwrap_or("")
    }

    /// Whether the front end reported compilation errors for this unit.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// First redeclaration of the entity `id` declares.
    pub fn canonical(&self, id: DeclId) -> DeclId {
        self.decl(id).canonical
    }

    pub fn parent(&self, id: DeclId) -> Option<DeclId> {
        self.decl(id).parent
    }

    /// Whether this declaration kind forms a scope other declarations and
    /// references can live in.
    pub fn is_container(&self, id: DeclId) -> bool {
        matches!(
            self.decl(id).kind,
            DeclKind::TranslationUnit
                | DeclKind::Namespace(_)
                | DeclKind::Record(_)
                | DeclKind::Enum(_)
                | DeclKind::Function(_)
                | DeclKind::ObjcContainer(_)
        )
    }

    /// Nearest enclosing container of `id`, not counting `id` itself.
    pub fn enclosing_container(&self, id: DeclId) -> Option<DeclId> {
        let mut cur = self.parent(id);
        while let Some(d) = cur {
            if self.is_container(d) {
                return Some(d);
            }
            cur = self.parent(d);
        }
        None
    }

    /// The defining occurrence of the entity, per the kind's definition
    /// rule. Kinds with no separate definition return `None`.
    pub fn definition_of(&self, id: DeclId) -> Option<DeclId> {
        match &self.decl(id).kind {
            DeclKind::Record(info) => info.definition,
            DeclKind::Enum(info) => info.definition,
            DeclKind::Function(info) => info.definition,
            DeclKind::Variable(info) => match info.kind {
                VariableKind::Global { .. } => info.definition,
                _ => None,
            },
            DeclKind::ObjcContainer(info) => {
                if info.id.is_implementation_like() {
                    Some(id)
                } else {
                    info.definition
                }
            }
            _ => None,
        }
    }

    /// Whether this occurrence is a definition, for the purpose of emitting
    /// definition facts.
    pub fn is_definition(&self, id: DeclId) -> bool {
        match &self.decl(id).kind {
            // Every namespace occurrence contributes a definition fact.
            DeclKind::Namespace(_) => true,
            DeclKind::ObjcMethod(info) => info.is_definition,
            _ => self.definition_of(id) == Some(id),
        }
    }

    /// Whether the kind never has a definition occurrence distinct from the
    /// declaration itself. Such declarations are always their own
    /// representative.
    pub fn has_no_separate_definition(&self, id: DeclId) -> bool {
        match &self.decl(id).kind {
            DeclKind::Namespace(_)
            | DeclKind::TypeAlias(_)
            | DeclKind::Enumerator
            | DeclKind::ObjcMethod(_)
            | DeclKind::ObjcProperty(_) => true,
            DeclKind::Variable(info) => {
                !matches!(info.kind, VariableKind::Global { .. })
            }
            _ => false,
        }
    }

    /// The class-template member this declaration was instantiated from.
    pub fn instantiated_from_member_of(&self, id: DeclId) -> Option<DeclId> {
        match &self.decl(id).kind {
            DeclKind::Record(info) => info.instantiated_from,
            DeclKind::Function(info) => info.instantiated_from,
            DeclKind::Variable(info) => info.instantiated_from,
            _ => None,
        }
    }

    /// The template (or partial specialization) this declaration
    /// specializes.
    pub fn specialized_from_template_of(&self, id: DeclId) -> Option<DeclId> {
        match &self.decl(id).kind {
            DeclKind::Record(info) => info.specialized_from,
            DeclKind::Function(info) => info.specialized_from,
            DeclKind::Variable(info) => info.specialized_from,
            _ => None,
        }
    }

    /// Whether references to this declaration are skipped because it is
    /// local to a function.
    pub fn is_local_variable(&self, id: DeclId) -> bool {
        let local_kind = match &self.decl(id).kind {
            DeclKind::Variable(info) => matches!(info.kind, VariableKind::Local),
            _ => return false,
        };
        local_kind || self.in_function(id)
    }

    fn in_function(&self, id: DeclId) -> bool {
        let mut cur = self.parent(id);
        while let Some(d) = cur {
            if matches!(self.decl(d).kind, DeclKind::Function(_)) {
                return true;
            }
            cur = self.parent(d);
        }
        false
    }
}

/// Debug helper for tests and logs.
impl Ast {
    pub fn describe(&self, id: DeclId) -> String {
        let decl = self.decl(id);
        let name = decl
            .name
            .map(|n| self.name_text(n).to_owned())
            .unwrap_or_else(|| "<anon>".to_owned());
        let kind = match &decl.kind {
            DeclKind::TranslationUnit => "translation unit",
            DeclKind::Namespace(_) => "namespace",
            DeclKind::Record(_) => "record",
            DeclKind::Enum(_) => "enum",
            DeclKind::Enumerator => "enumerator",
            DeclKind::TypeAlias(_) => "type alias",
            DeclKind::Function(_) => "function",
            DeclKind::Variable(_) => "variable",
            DeclKind::ObjcContainer(_) => "container",
            DeclKind::ObjcMethod(_) => "method",
            DeclKind::ObjcProperty(_) => "property",
            DeclKind::UsingDeclaration(_) => "using declaration",
            DeclKind::UsingDirective(_) => "using directive",
        };
        format!("{kind} `{name}` (#{})", id.0)
    }
}
