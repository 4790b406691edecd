//! The traversal: walks the declaration tree in document order, produces
//! declaration and definition facts, links redeclarations, and emits
//! cross-references rewritten through the using tracker.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::ast::{Ast, DeclId, DeclKind, Item, Qualifier, RefId, RefTarget};
use crate::core::Span;
use crate::facts::{FactSink, XRefTarget};
use crate::semantic::context::ContextId;
use crate::semantic::error::{IndexError, IndexResult};
use crate::semantic::indexer::declare::{scope_repr, DeclarationFacts, Memos, Scope};
use crate::semantic::resolver::UsingTracker;

#[derive(Debug, Clone, Default)]
pub struct IndexConfig {
    /// Index translation units that carry front-end diagnostics instead of
    /// rejecting them.
    pub index_on_error: bool,
}

/// Indexes one translation unit into `sink`.
pub fn index_translation_unit<S: FactSink>(
    ast: &Ast,
    config: &IndexConfig,
    sink: &mut S,
) -> IndexResult<()> {
    if ast.has_errors() {
        if !config.index_on_error {
            return Err(IndexError::CompilationErrors);
        }
        warn!("translation unit has errors, indexing anyway");
    }
    Indexer::new(ast, sink).run()
}

pub struct Indexer<'a, S: FactSink> {
    pub(crate) ast: &'a Ast,
    pub(crate) sink: &'a mut S,
    pub(crate) tracker: UsingTracker,
    pub(crate) scopes: FxHashMap<DeclId, Scope>,
    pub(crate) memos: Memos,
}

/// A resolved reference before retargeting: the declaration whose context
/// drives visibility (`primary`), the declaration whose fact is used
/// (`decl`), and the raw target if one exists.
struct XRef {
    primary: DeclId,
    decl: DeclId,
    target: Option<XRefTarget>,
}

impl XRef {
    fn unknown(decl: DeclId) -> Self {
        XRef {
            primary: decl,
            decl,
            target: None,
        }
    }
}

impl<'a, S: FactSink> Indexer<'a, S> {
    pub fn new(ast: &'a Ast, sink: &'a mut S) -> Self {
        Indexer {
            ast,
            sink,
            tracker: UsingTracker::new(ast),
            scopes: FxHashMap::default(),
            memos: Memos::new(),
        }
    }

    pub fn run(&mut self) -> IndexResult<()> {
        debug!(decls = self.ast.decl_count(), "indexing translation unit");
        self.traverse_decl(self.ast.root())
    }

    // ---- context stack ---------------------------------------------------

    /// Runs `f` with `context` as the current lookup context. `None`
    /// leaves the context unchanged.
    pub fn in_context<R>(
        &mut self,
        context: Option<ContextId>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = self.tracker.swap_context(context);
        let result = f(self);
        self.tracker.restore_context(saved);
        result
    }

    /// Runs `f` in the context of `function`, as its body is.
    pub fn in_function<R>(&mut self, function: DeclId, f: impl FnOnce(&mut Self) -> R) -> R {
        let context = self.tracker.context_for(self.ast, function);
        self.in_context(context, f)
    }

    /// Runs `f` in the context a qualified-name segment resolves in: the
    /// qualifier's context when given, otherwise the context saved when
    /// the outermost segment of the name was entered.
    pub fn in_name_context<R>(
        &mut self,
        qualifier: Option<&Qualifier>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let ast = self.ast;
        let outer_saved = self.tracker.saved;
        if self.tracker.saved.is_none() {
            self.tracker.saved = Some(self.tracker.current_context());
        }
        let context = match qualifier {
            Some(q) => self.tracker.specifier_context(ast, Some(q)),
            None => self.tracker.saved,
        };
        let result = self.in_context(context, f);
        self.tracker.saved = outer_saved;
        result
    }

    // ---- traversal -------------------------------------------------------

    pub fn traverse_decl(&mut self, decl: DeclId) -> IndexResult<()> {
        let ast = self.ast;
        match &ast.decl(decl).kind {
            DeclKind::TranslationUnit => {
                let context = self.tracker.context_for(ast, decl);
                self.in_context(context, |ix| ix.traverse_children(decl))
            }
            DeclKind::Namespace(_) | DeclKind::Record(_) | DeclKind::Enum(_) => {
                let context = self.tracker.context_for(ast, decl);
                self.in_context(context, |ix| {
                    ix.visit_declaration(decl)?;
                    ix.traverse_children(decl)
                })
            }
            DeclKind::Function(info) => {
                // The signature resolves in the enclosing context; only
                // the body sees the function's own scope.
                self.visit_declaration(decl)?;
                self.traverse_children(decl)?;
                if info.body.is_empty() {
                    return Ok(());
                }
                self.in_function(decl, |ix| {
                    for &item in &info.body {
                        ix.traverse(item)?;
                    }
                    Ok(())
                })
            }
            _ => {
                self.visit_declaration(decl)?;
                self.traverse_children(decl)
            }
        }
    }

    fn traverse_children(&mut self, decl: DeclId) -> IndexResult<()> {
        for &item in &self.ast.decl(decl).children {
            self.traverse(item)?;
        }
        Ok(())
    }

    fn traverse(&mut self, item: Item) -> IndexResult<()> {
        match item {
            Item::Decl(decl) => self.traverse_decl(decl),
            Item::Ref(r) => self.visit_reference(r),
        }
    }

    // ---- declarations ----------------------------------------------------

    fn visit_declaration(&mut self, decl: DeclId) -> IndexResult<()> {
        match &self.ast.decl(decl).kind {
            DeclKind::TranslationUnit | DeclKind::Enumerator => Ok(()),
            DeclKind::Namespace(_) => {
                self.visit_decl_with(Self::namespace_facts, Self::define_namespace, decl)?;
                self.tracker.add_namespace(self.ast, decl);
                Ok(())
            }
            DeclKind::Record(_) => {
                self.visit_decl_with(Self::record_facts, Self::define_record, decl)
            }
            DeclKind::Enum(_) => self.visit_decl_with(Self::enum_facts, Self::define_enum, decl),
            DeclKind::TypeAlias(_) => {
                self.visit_decl_with(Self::type_alias_facts, Self::define_nothing, decl)
            }
            DeclKind::Function(_) => {
                self.visit_decl_with(Self::function_facts, Self::define_function, decl)
            }
            DeclKind::Variable(_) => {
                self.visit_decl_with(Self::variable_facts, Self::define_nothing, decl)
            }
            DeclKind::ObjcContainer(_) => self.visit_decl_with(
                Self::objc_container_facts,
                Self::define_objc_container,
                decl,
            ),
            DeclKind::ObjcMethod(_) => {
                self.visit_decl_with(Self::objc_method_facts, Self::define_objc_method, decl)
            }
            DeclKind::ObjcProperty(_) => {
                self.visit_decl_with(Self::objc_property_facts, Self::define_nothing, decl)
            }
            DeclKind::UsingDeclaration(_) => self.visit_using_declaration(decl),
            DeclKind::UsingDirective(_) => self.visit_using_directive(decl),
        }
    }

    /// Declare, define when this occurrence is a definition, and link the
    /// occurrence's fact to its representative's fact when they differ.
    fn visit_decl_with<V: DeclarationFacts>(
        &mut self,
        facts: fn(&mut Self, DeclId) -> IndexResult<Option<V>>,
        define: fn(&mut Self, DeclId, &V) -> IndexResult<()>,
        decl: DeclId,
    ) -> IndexResult<()> {
        let Some(me) = facts(self, decl)? else {
            return Ok(());
        };
        if self.ast.is_definition(decl) {
            define(self, decl, &me)?;
        }
        let same = self.representative(facts, decl, me.clone())?;
        if same.declaration() != me.declaration() {
            self.sink
                .record_same_as(me.declaration(), same.declaration());
        }
        Ok(())
    }

    /// The declaration whose facts stand for this entity everywhere:
    /// the definition when one exists, else the declaration a template
    /// occurrence was instantiated or specialized from, else the canonical
    /// redeclaration, else the occurrence itself.
    fn representative<V: DeclarationFacts>(
        &mut self,
        facts: fn(&mut Self, DeclId) -> IndexResult<Option<V>>,
        decl: DeclId,
        me: V,
    ) -> IndexResult<V> {
        let ast = self.ast;
        if ast.has_no_separate_definition(decl) || ast.definition_of(decl) == Some(decl) {
            return Ok(me);
        }
        if let Some(definition) = ast.definition_of(decl) {
            if let Some(facts) = facts(self, definition)? {
                return Ok(facts);
            }
        }
        if let Some(member) = ast.instantiated_from_member_of(decl) {
            if let Some(facts) = facts(self, member)? {
                return Ok(facts);
            }
        } else {
            let mut d = decl;
            while let Some(template) = ast.specialized_from_template_of(d) {
                d = template;
                if let Some(facts) = facts(self, d)? {
                    return Ok(facts);
                }
            }
        }
        let canonical = ast.canonical(decl);
        if canonical != decl {
            if let Some(facts) = facts(self, canonical)? {
                return Ok(facts);
            }
        }
        Ok(me)
    }

    // ---- using declarations and directives -------------------------------

    fn visit_using_declaration(&mut self, decl: DeclId) -> IndexResult<()> {
        let ast = self.ast;
        let DeclKind::UsingDeclaration(info) = &ast.decl(decl).kind else {
            return Ok(());
        };
        if let Some(qualifier) = &info.qualifier {
            self.traverse_qualifier(qualifier)?;
        }
        let Some(name) = ast.decl(decl).name else {
            return Ok(());
        };
        let Some(context) = self.tracker.specifier_context(ast, info.qualifier.as_ref()) else {
            return Ok(());
        };
        let name = self.name_fact(name);
        let name = self
            .sink
            .intern_fact(crate::facts::FactPayload::FunctionName {
                name: crate::facts::FunctionNameRepr::Ident(name),
            });
        let scope = self.scope_of(self.tracker.contexts.decl(context))?;
        let scope = scope_repr(scope, ast.decl(decl).access);
        let qname = self
            .sink
            .intern_fact(crate::facts::FactPayload::FunctionQName { name, scope });
        let fact = self
            .sink
            .intern_fact(crate::facts::FactPayload::UsingDeclaration {
                qname,
                range: ast.decl(decl).range,
            });
        self.tracker.add_using_decl(ast, decl, fact);
        Ok(())
    }

    fn visit_using_directive(&mut self, decl: DeclId) -> IndexResult<()> {
        let ast = self.ast;
        let DeclKind::UsingDirective(info) = &ast.decl(decl).kind else {
            return Ok(());
        };
        let nominated = info.nominated;
        // Cross-reference the nominated namespace relative to the
        // directive's qualifier, before the directive takes effect.
        let range = ast.decl(decl).range;
        self.in_name_context(info.qualifier.as_ref(), |ix| {
            let xref = ix.to_decl(Self::namespace_facts, nominated)?;
            ix.xref_target(range, xref)
        })?;
        if let Some(qualifier) = &info.qualifier {
            self.traverse_qualifier(qualifier)?;
        }
        let name = self.name_fact_or_empty(nominated);
        let scope = self.parent_scope_repr(nominated)?;
        let qname = self
            .sink
            .intern_fact(crate::facts::FactPayload::QName { name, scope });
        let fact = self
            .sink
            .intern_fact(crate::facts::FactPayload::UsingDirective { qname, range });
        self.tracker.add_using_directive(ast, decl, fact);
        Ok(())
    }

    // ---- references ------------------------------------------------------

    fn visit_reference(&mut self, r: RefId) -> IndexResult<()> {
        let ast = self.ast;
        let reference = ast.reference(r);
        if let Some(qualifier) = &reference.qualifier {
            self.traverse_qualifier(qualifier)?;
        }
        match &reference.target {
            RefTarget::Decl(decl) => {
                self.xref_expr(*decl, reference.qualifier.as_ref(), reference.range)
            }
            RefTarget::Overloads(decls) => {
                for &decl in decls {
                    self.xref_expr(decl, reference.qualifier.as_ref(), reference.range)?;
                }
                Ok(())
            }
        }
    }

    /// Emits the cross-references of a qualified-name prefix: one per
    /// namespace segment, each resolved in the context of the segment to
    /// its left.
    fn traverse_qualifier(&mut self, qualifier: &Qualifier) -> IndexResult<()> {
        self.in_name_context(qualifier.prefix.as_deref(), |ix| {
            if let crate::ast::QualifierKind::Namespace(ns) = qualifier.kind {
                if let Some(range) = qualifier.range {
                    let xref = ix.to_decl(Self::namespace_facts, ns)?;
                    ix.xref_target(range, xref)?;
                }
            }
            if let Some(prefix) = qualifier.prefix.as_deref() {
                ix.traverse_qualifier(prefix)?;
            }
            Ok(())
        })
    }

    fn xref_expr(
        &mut self,
        decl: DeclId,
        qualifier: Option<&Qualifier>,
        range: Span,
    ) -> IndexResult<()> {
        let ast = self.ast;
        if ast.is_local_variable(decl) {
            return Ok(());
        }
        let xref = match &ast.decl(decl).kind {
            DeclKind::Function(_) => self.to_templatable(Self::function_facts, decl)?,
            DeclKind::Variable(_) => self.to_templatable(Self::variable_facts, decl)?,
            DeclKind::Record(_) => self.to_templatable(Self::record_facts, decl)?,
            DeclKind::Enum(_) => self.to_decl(Self::enum_facts, decl)?,
            DeclKind::Enumerator => self.to_enumerator(decl)?,
            DeclKind::TypeAlias(_) => self.to_decl(Self::type_alias_facts, decl)?,
            DeclKind::Namespace(_) => self.to_decl(Self::namespace_facts, decl)?,
            DeclKind::ObjcContainer(_) => self.to_decl(Self::objc_container_facts, decl)?,
            DeclKind::ObjcMethod(_) => self.to_decl(Self::objc_method_facts, decl)?,
            DeclKind::ObjcProperty(_) => self.to_decl(Self::objc_property_facts, decl)?,
            _ => XRef::unknown(decl),
        };
        self.in_name_context(qualifier, |ix| ix.xref_target(range, xref))
    }

    fn to_decl<V: DeclarationFacts>(
        &mut self,
        facts: fn(&mut Self, DeclId) -> IndexResult<Option<V>>,
        decl: DeclId,
    ) -> IndexResult<XRef> {
        let target = facts(self, decl)?.map(|v| XRefTarget::Declaration(v.declaration()));
        Ok(XRef {
            primary: decl,
            decl,
            target,
        })
    }

    fn to_enumerator(&mut self, decl: DeclId) -> IndexResult<XRef> {
        let target = self
            .enumerator_facts(decl)?
            .map(|v| XRefTarget::Enumerator(v.declaration()));
        Ok(XRef {
            primary: decl,
            decl,
            target,
        })
    }

    /// Like [`Self::to_decl`], but a template occurrence without a fact of
    /// its own falls back to the declaration it was instantiated or
    /// specialized from. Visibility is always judged at the end of the
    /// template chain.
    fn to_templatable<V: DeclarationFacts>(
        &mut self,
        facts: fn(&mut Self, DeclId) -> IndexResult<Option<V>>,
        decl: DeclId,
    ) -> IndexResult<XRef> {
        let ast = self.ast;
        let mut xref = self.to_decl(facts, decl)?;
        if let Some(member) = ast.instantiated_from_member_of(decl) {
            self.suggest(facts, member, &mut xref)?;
            xref.primary = member;
        } else {
            let mut d = decl;
            while let Some(template) = ast.specialized_from_template_of(d) {
                d = template;
                self.suggest(facts, d, &mut xref)?;
            }
            xref.primary = d;
        }
        Ok(xref)
    }

    fn suggest<V: DeclarationFacts>(
        &mut self,
        facts: fn(&mut Self, DeclId) -> IndexResult<Option<V>>,
        decl: DeclId,
        xref: &mut XRef,
    ) -> IndexResult<()> {
        if xref.target.is_none() {
            if let Some(v) = facts(self, decl)? {
                xref.target = Some(XRefTarget::Declaration(v.declaration()));
                xref.decl = decl;
            }
        }
        Ok(())
    }

    fn xref_target(&mut self, range: Span, xref: XRef) -> IndexResult<()> {
        let ast = self.ast;
        // A declaration without facts is still referenced, as an unknown
        // target at its position.
        let raw = xref
            .target
            .unwrap_or_else(|| XRefTarget::Unknown(ast.decl(xref.decl).range.start()));
        let target = self
            .tracker
            .retarget(ast, &mut *self.sink, Some(xref.primary), raw);
        self.sink.record_xref(range, target);
        Ok(())
    }
}
