//! Completion candidate assembly.
//!
//! One `Completer` serves one query: it dispatches on the classified
//! cursor context and assembles candidates from the lexical scope,
//! inherited members, static imports, the class catalogs and the
//! sourcepath. Assembly order is the result order; ranking belongs to the
//! editor. Every per-source failure is recovered locally: one unreadable
//! sourcepath file never empties the rest of the list.

use std::collections::HashSet;
use std::path::Path;

use javelin_core::{
    last_name, matches_partial_name, most_name, CancelToken, Cancelled, LineIndex, Name, Position,
};
use javelin_syntax::search::{self, Import};
use javelin_syntax::{
    receiver_before, switch_subject_end, CompletionContext, ContextKind, PartialExpr,
};
use javelin_vfs::FileStore;

use crate::catalog::ClassCatalog;
use crate::check::{cant_check, Check};
use crate::semantics::{
    print_method, Element, ElementKind, FocusSession, Scope, Semantics, Type, TypeName,
};

/// One entry in a completion result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A resolved program element.
    Element(Element),
    /// An expansion template.
    Snippet { label: String, body: String },
    Keyword(&'static str),
    /// A class known by qualified name only.
    ClassName { qualified: String, imported: bool },
    /// A package name prefix inferred from the class lists.
    PackagePart { qualified: String, last: Name },
}

impl Candidate {
    /// The text the editor matches against what the user typed.
    pub fn filter_text(&self) -> &str {
        match self {
            Candidate::Element(element) => element.name.as_str(),
            Candidate::Snippet { label, .. } => label,
            Candidate::Keyword(word) => word,
            Candidate::ClassName { qualified, .. } => last_name(qualified),
            Candidate::PackagePart { last, .. } => last.as_str(),
        }
    }
}

pub const TOP_LEVEL_KEYWORDS: &[&str] = &[
    "package",
    "import",
    "public",
    "private",
    "protected",
    "abstract",
    "class",
    "interface",
    "extends",
    "implements",
];

const CLASS_BODY_KEYWORDS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "final",
    "native",
    "synchronized",
    "abstract",
    "default",
    "class",
    "interface",
    "void",
    "boolean",
    "int",
    "long",
    "float",
    "double",
];

const METHOD_BODY_KEYWORDS: &[&str] = &[
    "new",
    "assert",
    "try",
    "catch",
    "finally",
    "throw",
    "return",
    "break",
    "case",
    "continue",
    "default",
    "do",
    "while",
    "for",
    "switch",
    "if",
    "else",
    "instanceof",
    "var",
    "final",
    "class",
    "void",
    "boolean",
    "int",
    "long",
    "float",
    "double",
];

/// Assembles the candidate list for one completion query.
pub struct Completer<'a> {
    semantics: &'a dyn Semantics,
    focus: &'a dyn FocusSession,
    catalog: &'a ClassCatalog,
    store: &'a FileStore,
    token: &'a CancelToken,
    max_items: usize,
    file: &'a Path,
    text: &'a str,
    ctx: &'a CompletionContext,
    scope: Scope,
    imports: Vec<Import>,
    result: Vec<Candidate>,
    seen: HashSet<String>,
    warned: bool,
}

impl<'a> Completer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        semantics: &'a dyn Semantics,
        focus: &'a dyn FocusSession,
        catalog: &'a ClassCatalog,
        store: &'a FileStore,
        token: &'a CancelToken,
        max_items: usize,
        file: &'a Path,
        text: &'a str,
        ctx: &'a CompletionContext,
        scope: Scope,
    ) -> Self {
        Self {
            semantics,
            focus,
            catalog,
            store,
            token,
            max_items,
            file,
            text,
            ctx,
            scope,
            imports: search::imports(text),
            result: Vec::new(),
            seen: HashSet::new(),
            warned: false,
        }
    }

    /// Runs the query and returns the assembled candidates.
    pub fn complete(mut self) -> Result<Vec<Candidate>, Cancelled> {
        match self.ctx.kind {
            ContextKind::CaseLabel => self.complete_cases()?,
            ContextKind::Annotation => self.complete_annotations()?,
            ContextKind::Import => self.complete_import()?,
            ContextKind::MemberSelect => self.complete_members(false)?,
            ContextKind::MemberReference => self.complete_members(true)?,
            ContextKind::Identifier => self.complete_identifiers()?,
        }
        Ok(self.result)
    }

    // --- shared plumbing -------------------------------------------------

    /// Byte offset where the partial identifier begins.
    fn anchor(&self) -> u32 {
        let index = LineIndex::new(self.text);
        let offset = index.offset_of_position(
            self.text,
            Position::new(self.ctx.line, self.ctx.character),
        );
        (offset - self.ctx.partial_name.as_str().len()) as u32
    }

    fn partial(&self) -> &str {
        self.ctx.partial_name.as_str()
    }

    /// Whether the cap has been reached; warns once per query.
    fn too_many_items(&mut self) -> bool {
        if self.result.len() < self.max_items {
            return false;
        }
        if !self.warned {
            tracing::warn!(
                target: "javelin.ide",
                max = self.max_items,
                "completion item cap reached, truncating"
            );
            self.warned = true;
        }
        true
    }

    /// Adds a candidate unless it duplicates an earlier one. Returns
    /// whether assembly should continue.
    fn add(&mut self, key: String, candidate: Candidate) -> Result<bool, Cancelled> {
        self.token.check()?;
        if self.too_many_items() {
            return Ok(false);
        }
        if self.seen.insert(key) {
            self.result.push(candidate);
        }
        Ok(true)
    }

    fn add_element(&mut self, element: Element) -> Result<bool, Cancelled> {
        let key = element.string_form();
        self.add(key, Candidate::Element(element))
    }

    fn add_keyword(&mut self, word: &'static str) -> Result<bool, Cancelled> {
        self.add(word.to_string(), Candidate::Keyword(word))
    }

    /// Resolves the receiver's type, re-entering the facade for the
    /// deepest subtree the partial grammar cannot check.
    fn type_of_receiver(&self, expr: &PartialExpr) -> Option<Type> {
        if let Some(ty) = Check::new(self.semantics, &self.scope).check(expr) {
            return Some(ty);
        }
        let residue = cant_check(expr)?;
        let retained = self.focus.type_of(residue)?;
        Check::new(self.semantics, &self.scope)
            .with_retained_type(residue.kind(), retained)
            .check(expr)
    }

    fn is_imported(&self, qualified: &str) -> bool {
        let package_name = most_name(qualified);
        let class_name = last_name(qualified);
        self.imports.iter().any(|import| {
            if import.is_static {
                return false;
            }
            if import.is_star {
                import.qualified == package_name
            } else {
                most_name(&import.qualified) == package_name
                    && last_name(&import.qualified) == class_name
            }
        })
    }

    /// Resolves a (possibly qualified) type name written in source.
    fn resolve_type_name(&self, written: &str) -> Option<TypeName> {
        let validate = |qualified: String| -> Option<TypeName> {
            if self.semantics.type_element(&qualified).is_some() || self.catalog.contains(&qualified)
            {
                Some(TypeName::new(qualified))
            } else {
                None
            }
        };

        if written.contains('.') {
            return validate(written.to_string());
        }

        // Explicit imports.
        for import in &self.imports {
            if !import.is_static && !import.is_star && last_name(&import.qualified) == written {
                if let Some(found) = validate(import.qualified.clone()) {
                    return Some(found);
                }
            }
        }
        // Same package.
        let package = search::package_name(self.text);
        if !package.is_empty() {
            if let Some(found) = validate(format!("{package}.{written}")) {
                return Some(found);
            }
        }
        // java.lang is always in scope.
        if let Some(found) = validate(format!("java.lang.{written}")) {
            return Some(found);
        }
        // Star imports.
        for import in &self.imports {
            if !import.is_static && import.is_star {
                if let Some(found) = validate(format!("{}.{written}", import.qualified)) {
                    return Some(found);
                }
            }
        }
        None
    }

    // --- dispatch targets ------------------------------------------------

    /// Enum constants of the switched expression's type; falls back to
    /// identifier completion when the type has no definition.
    fn complete_cases(&mut self) -> Result<(), Cancelled> {
        self.token.check()?;
        let subject_ty = switch_subject_end(self.text, self.ctx.line, self.ctx.character)
            .and_then(|end| javelin_syntax::expression_ending_at(self.text, end))
            .and_then(|expr| self.type_of_receiver(&expr));

        let definition = subject_ty
            .as_ref()
            .and_then(Type::as_declared)
            .and_then(|name| {
                self.semantics
                    .type_element(name.as_str())
                    .map(|_| name.clone())
            });
        let Some(type_name) = definition else {
            tracing::debug!(
                target: "javelin.ide",
                "switched type has no definition, completing identifiers instead"
            );
            return self.complete_identifiers();
        };

        for member in self.semantics.enclosed_elements(&type_name) {
            if member.kind == ElementKind::EnumConstant && !self.add_element(member)? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// The `@Override` snippet plus scope-visible names.
    fn complete_annotations(&mut self) -> Result<(), Cancelled> {
        self.token.check()?;
        if matches_partial_name("Override", self.partial()) {
            let mut shown = HashSet::new();
            for method in self.super_methods() {
                if method.modifiers.is_static || method.modifiers.is_private {
                    continue;
                }
                let Some(printed) = print_method(&method) else {
                    continue;
                };
                let label = format!("@Override {printed}");
                if !shown.insert(label.clone()) {
                    continue;
                }
                let body = format!("Override\n{printed} {{\n    $0\n}}");
                if !self.add(label.clone(), Candidate::Snippet { label, body })? {
                    return Ok(());
                }
            }
        }
        self.complete_scope_identifiers()
    }

    /// Methods inherited from every transitive supertype of the enclosing
    /// class.
    fn super_methods(&self) -> Vec<Element> {
        let Some(this_type) = self.scope.this_type().cloned() else {
            return Vec::new();
        };
        let mut result = Vec::new();
        let mut pending = self
            .semantics
            .direct_supertypes(&Type::Declared(this_type));
        while let Some(super_ty) = pending.pop() {
            let Some(name) = super_ty.as_declared() else {
                continue;
            };
            for member in self.semantics.enclosed_elements(name) {
                if member.kind == ElementKind::Method && !member.modifiers.is_synthetic {
                    result.push(member);
                }
            }
            pending.extend(self.semantics.direct_supertypes(&super_ty));
        }
        result
    }

    /// Import paths complete as members of packages.
    fn complete_import(&mut self) -> Result<(), Cancelled> {
        self.token.check()?;
        let qualifier = receiver_before(self.text, self.anchor())
            .and_then(|expr| expr_to_dotted(&expr))
            .unwrap_or_default();
        self.complete_package_members(&qualifier)
    }

    /// Members of the expression left of `.` or `::`.
    fn complete_members(&mut self, is_reference: bool) -> Result<(), Cancelled> {
        self.token.check()?;
        let Some(receiver) = receiver_before(self.text, self.anchor()) else {
            return Ok(());
        };

        if let Some(dotted) = expr_to_dotted(&receiver) {
            // A dotted name is a value if its head resolves in scope;
            // otherwise try type and package interpretations.
            let head = leading_identifier(&receiver);
            let head_is_value = head.is_some_and(|h| {
                Check::new(self.semantics, &self.scope).check(h).is_some()
            });
            if !head_is_value {
                if let Some(type_name) = self.resolve_type_name(&dotted) {
                    return self.complete_type_members(&type_name, is_reference);
                }
                if self.catalog.has_package(&dotted) || !self.store.list(&dotted).is_empty() {
                    return self.complete_package_members(&dotted);
                }
            }
        }

        self.complete_value_members(&receiver)
    }

    /// Visible type members of a package, plus inferred sub-packages.
    fn complete_package_members(&mut self, package: &str) -> Result<(), Cancelled> {
        self.token.check()?;
        let partial = self.partial().to_string();

        for qualified in self.catalog.classes_in_package(package) {
            let qualified = qualified.to_string();
            if !matches_partial_name(last_name(&qualified), &partial) {
                continue;
            }
            let candidate = match self.semantics.type_element(&qualified) {
                Some(element) => {
                    if !self.semantics.is_accessible(&self.scope, &element, None) {
                        continue;
                    }
                    Candidate::Element(element)
                }
                None => Candidate::ClassName {
                    imported: self.is_imported(&qualified),
                    qualified: qualified.clone(),
                },
            };
            if !self.add(qualified, candidate)? {
                return Ok(());
            }
        }

        // Sourcepath types in this package.
        for file in self.store.list(package) {
            let file = file.to_path_buf();
            let Ok(text) = self.store.contents(&file) else {
                continue;
            };
            for decl in search::type_declarations(&text) {
                if !decl.is_public || !matches_partial_name(decl.name.as_str(), &partial) {
                    continue;
                }
                let qualified = if package.is_empty() {
                    decl.name.to_string()
                } else {
                    format!("{package}.{}", decl.name)
                };
                let candidate = Candidate::ClassName {
                    imported: self.is_imported(&qualified),
                    qualified: qualified.clone(),
                };
                if !self.add(qualified, candidate)? {
                    return Ok(());
                }
            }
        }

        for sub in self.catalog.sub_packages(package) {
            if !matches_partial_name(last_name(&sub), &partial) {
                continue;
            }
            let candidate = Candidate::PackagePart {
                last: Name::new(last_name(&sub)),
                qualified: sub.clone(),
            };
            if !self.add(sub, candidate)? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Static members (value position) or methods plus `new` (reference
    /// position) of a type.
    fn complete_type_members(
        &mut self,
        type_name: &TypeName,
        is_reference: bool,
    ) -> Result<(), Cancelled> {
        self.token.check()?;
        let members = self.semantics.enclosed_elements(type_name);
        if is_reference {
            for member in members {
                if member.kind == ElementKind::Method
                    && self
                        .semantics
                        .is_accessible(&self.scope, &member, Some(type_name))
                    && !self.add_element(member)?
                {
                    return Ok(());
                }
            }
            self.add_keyword("new")?;
            return Ok(());
        }

        for member in members {
            if member.modifiers.is_static
                && self
                    .semantics
                    .is_accessible(&self.scope, &member, Some(type_name))
                && !self.add_element(member)?
            {
                return Ok(());
            }
        }
        self.add_keyword("class")?;
        self.add_keyword("this")?;
        self.add_keyword("super")?;
        Ok(())
    }

    /// Instance members of a value, across its transitive supertypes.
    fn complete_value_members(&mut self, receiver: &PartialExpr) -> Result<(), Cancelled> {
        self.token.check()?;
        let Some(ty) = self.type_of_receiver(receiver) else {
            tracing::debug!(target: "javelin.ide", "receiver has no type");
            return Ok(());
        };
        match &ty {
            Type::Primitive(_) | Type::Executable(_) => {
                tracing::warn!(
                    target: "javelin.ide",
                    receiver = %ty,
                    "type has no completable members"
                );
                return Ok(());
            }
            Type::Array(_) => {
                self.add_keyword("length")?;
                return Ok(());
            }
            Type::Declared(_) | Type::TypeVar(_) => {}
        }

        let receiver_name = ty.as_declared().cloned();
        for super_ty in self.supers_with_self(&ty) {
            let Some(name) = super_ty.as_declared() else {
                continue;
            };
            for member in self.semantics.enclosed_elements(name) {
                if member.modifiers.is_static || member.modifiers.is_synthetic {
                    continue;
                }
                if member.kind == ElementKind::Constructor {
                    continue;
                }
                // Accessibility is checked against the receiver type when
                // one is declared; otherwise everything is assumed
                // accessible.
                if let Some(receiver_name) = &receiver_name {
                    if !self
                        .semantics
                        .is_accessible(&self.scope, &member, Some(receiver_name))
                    {
                        continue;
                    }
                }
                if !self.add_element(member)? {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// The type with its transitive supertypes, root class included.
    fn supers_with_self(&self, ty: &Type) -> Vec<Type> {
        let mut result = Vec::new();
        let mut pending = vec![ty.clone()];
        while let Some(current) = pending.pop() {
            if result.contains(&current) {
                continue;
            }
            pending.extend(self.semantics.direct_supertypes(&current));
            result.push(current);
        }
        // The root type is not always reported as a supertype, but its
        // members (equals, hashCode, ...) belong in every list.
        let object = Type::declared("java.lang.Object");
        if !result.contains(&object) {
            result.push(object);
        }
        result
    }

    /// Default completion: snippets, scope identifiers and keywords.
    fn complete_identifiers(&mut self) -> Result<(), Cancelled> {
        self.token.check()?;

        if !self.ctx.in_class {
            if search::package_name(self.text).is_empty() {
                let suggested = self.store.suggested_package_name(self.file);
                let label = format!("package {suggested}");
                let body = format!("package {suggested};\n\n");
                if !self.add(label.clone(), Candidate::Snippet { label, body })? {
                    return Ok(());
                }
            }
            if search::type_declarations(self.text).is_empty() {
                let name = self
                    .file
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let label = format!("class {name}");
                let body = format!("class {name} {{\n    $0\n}}");
                if !self.add(label.clone(), Candidate::Snippet { label, body })? {
                    return Ok(());
                }
            }
        }

        self.complete_scope_identifiers()?;

        let keywords = if !self.ctx.in_class {
            TOP_LEVEL_KEYWORDS
        } else if !self.ctx.in_method {
            CLASS_BODY_KEYWORDS
        } else {
            METHOD_BODY_KEYWORDS
        };
        let partial = self.partial().to_string();
        for word in keywords {
            if matches_partial_name(word, &partial) && !self.add_keyword(word)? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Locals (with `this`/`super` members inlined), static imports and
    /// matching class names.
    fn complete_scope_identifiers(&mut self) -> Result<(), Cancelled> {
        let partial = self.partial().to_string();

        self.token.check()?;
        self.walk_scope(&partial)?;

        self.token.check()?;
        self.add_static_imports(&partial)?;

        // Class names only once the prefix looks like one.
        let starts_upper = partial.chars().next().is_some_and(char::is_uppercase);
        if starts_upper {
            self.token.check()?;
            self.add_catalog_classes(&partial)?;
        }
        Ok(())
    }

    fn walk_scope(&mut self, partial: &str) -> Result<(), Cancelled> {
        let static_start = self.scope.in_static_context();
        let frames: Vec<_> = self.scope.frames().to_vec();
        for frame in &frames {
            for element in &frame.locals {
                if matches_partial_name(element.name.as_str(), partial) {
                    let keep_going = if element.kind.is_type_like() {
                        if self.semantics.is_accessible(&self.scope, element, None) {
                            self.add_element(element.clone())?
                        } else {
                            true
                        }
                    } else if element.is_this_or_super() {
                        if frame.static_context {
                            true
                        } else {
                            self.add_element(element.clone())?
                        }
                    } else {
                        self.add_element(element.clone())?
                    };
                    if !keep_going {
                        return Ok(());
                    }
                }
                if element.is_this_or_super()
                    && !self.unwrap_this_super(element, static_start, partial)?
                {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Places each member of `this`/`super` directly into the result.
    fn unwrap_this_super(
        &mut self,
        pseudo: &Element,
        static_start: bool,
        partial: &str,
    ) -> Result<bool, Cancelled> {
        let Some(type_name) = pseudo.ty.as_declared().cloned() else {
            tracing::warn!(
                target: "javelin.ide",
                name = %pseudo.name,
                "pseudo-variable has no declared type"
            );
            return Ok(true);
        };
        for member in self.semantics.enclosed_elements(&type_name) {
            if static_start && !member.modifiers.is_static {
                continue;
            }
            if member.kind == ElementKind::Constructor || member.modifiers.is_synthetic {
                continue;
            }
            if !matches_partial_name(member.name.as_str(), partial) {
                continue;
            }
            if !self
                .semantics
                .is_accessible(&self.scope, &member, Some(&type_name))
            {
                continue;
            }
            if !self.add_element(member)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn add_static_imports(&mut self, partial: &str) -> Result<(), Cancelled> {
        let static_imports: Vec<Import> = self
            .imports
            .iter()
            .filter(|i| i.is_static)
            .cloned()
            .collect();
        for import in static_imports {
            let (owner, member_name) = if import.is_star {
                (import.qualified.clone(), None)
            } else {
                (
                    most_name(&import.qualified).to_string(),
                    Some(last_name(&import.qualified).to_string()),
                )
            };
            if self.semantics.type_element(&owner).is_none() {
                continue;
            }
            for member in self.semantics.enclosed_elements(&TypeName::new(&owner)) {
                if !member.modifiers.is_static {
                    continue;
                }
                if let Some(only) = &member_name {
                    if member.name.as_str() != only {
                        continue;
                    }
                }
                if !matches_partial_name(member.name.as_str(), partial) {
                    continue;
                }
                if !self.add_element(member)? {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Class names from the JDK list, the classpath list and the
    /// sourcepath.
    fn add_catalog_classes(&mut self, partial: &str) -> Result<(), Cancelled> {
        let my_package = search::package_name(self.text);

        let jdk: Vec<String> = self.catalog.jdk_classes().map(String::from).collect();
        for qualified in jdk {
            if !matches_partial_name(last_name(&qualified), partial) {
                continue;
            }
            let candidate = Candidate::ClassName {
                imported: self.is_imported(&qualified),
                qualified: qualified.clone(),
            };
            if !self.add(qualified, candidate)? {
                return Ok(());
            }
        }

        let mut classpath_names: HashSet<String> = HashSet::new();
        let classpath: Vec<String> = self.catalog.classpath_classes().map(String::from).collect();
        for qualified in classpath {
            if !matches_partial_name(last_name(&qualified), partial) {
                continue;
            }
            classpath_names.insert(qualified.clone());
            let candidate = Candidate::ClassName {
                imported: self.is_imported(&qualified),
                qualified: qualified.clone(),
            };
            if !self.add(qualified, candidate)? {
                return Ok(());
            }
        }

        // Sourcepath: in the same package anything goes; across packages
        // only a public class in the file of the same name is reachable.
        let files: Vec<_> = self.store.all().map(Path::to_path_buf).collect();
        for file in files {
            self.token.check()?;
            let file_package = self
                .store
                .stored_package_name(&file)
                .unwrap_or_default()
                .to_string();
            let same_package = file_package == my_package || file_package.is_empty();
            let maybe_public = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .is_some_and(|n| matches_partial_name(&n, partial));
            if !same_package && !maybe_public {
                continue;
            }
            let Ok(text) = self.store.contents(&file) else {
                // One unreadable file never aborts the assembly.
                continue;
            };
            for decl in search::type_declarations(&text) {
                if !same_package && !decl.is_public {
                    continue;
                }
                if !matches_partial_name(decl.name.as_str(), partial) {
                    continue;
                }
                let qualified = if file_package.is_empty() {
                    decl.name.to_string()
                } else {
                    format!("{file_package}.{}", decl.name)
                };
                if classpath_names.contains(&qualified) {
                    continue;
                }
                let candidate = Candidate::ClassName {
                    imported: self.is_imported(&qualified),
                    qualified: qualified.clone(),
                };
                if !self.add(qualified, candidate)? {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// Renders a pure identifier chain (`a.b.c`) as a dotted string.
fn expr_to_dotted(expr: &PartialExpr) -> Option<String> {
    match expr {
        PartialExpr::Identifier { name, .. } => Some(name.to_string()),
        PartialExpr::Select { receiver, name, .. } => {
            let mut prefix = expr_to_dotted(receiver)?;
            prefix.push('.');
            prefix.push_str(name.as_str());
            Some(prefix)
        }
        _ => None,
    }
}

/// The leftmost identifier of a chain.
fn leading_identifier(expr: &PartialExpr) -> Option<&PartialExpr> {
    match expr {
        PartialExpr::Identifier { .. } => Some(expr),
        PartialExpr::Select { receiver, .. } => leading_identifier(receiver),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dotted_chains() {
        let expr = javelin_syntax::expression_ending_at("java.util.List", 14).unwrap();
        assert_eq!(expr_to_dotted(&expr).as_deref(), Some("java.util.List"));

        let call = javelin_syntax::expression_ending_at("f().x", 5).unwrap();
        assert_eq!(expr_to_dotted(&call), None);
    }

    #[test]
    fn filter_text_is_the_simple_name() {
        let candidate = Candidate::ClassName {
            qualified: "java.util.List".into(),
            imported: false,
        };
        assert_eq!(candidate.filter_text(), "List");
    }
}
